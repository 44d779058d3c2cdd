//! Browser LocalStorage adapter

use web_sys::Storage;

use super::KeyValueStore;

pub struct LocalStorageStore {
    storage: Storage,
}

impl LocalStorageStore {
    /// `None` when the page has no LocalStorage (privacy mode, sandboxed iframe)
    pub fn new() -> Option<Self> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()?;
        Some(Self { storage })
    }
}

impl KeyValueStore for LocalStorageStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) {
        if self.storage.set_item(key, value).is_err() {
            log::warn!("LocalStorage write failed for {}", key);
        }
    }
}
