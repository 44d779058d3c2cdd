//! Key-value persistence port
//!
//! The game only ever needs string keys and string values, so storage is a
//! tiny trait with three adapters:
//! - `MemoryStore`: in-process map (tests, headless runs)
//! - `FileStore`: one JSON file on disk (native only)
//! - `LocalStorageStore`: browser LocalStorage (wasm only)
//!
//! Typed values go through `load_json`/`save_json`. Missing or malformed
//! values fall back to defaults; failed writes are logged and dropped.

use std::collections::BTreeMap;

use serde::Serialize;
use serde::de::DeserializeOwned;

#[cfg(not(target_arch = "wasm32"))]
pub mod file;
#[cfg(target_arch = "wasm32")]
pub mod local_storage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;

/// Storage keys
pub mod keys {
    pub const COINS: &str = "cyber_serpent_coins";
    pub const UPGRADES: &str = "cyber_serpent_upgrades";
    pub const EFFECT_LEVELS: &str = "cyber_serpent_powerup_levels";
    pub const EXPLOSION_BOOST: &str = "cyber_serpent_explosion_boost";
    pub const SKIN: &str = "cyber_serpent_skin";
    pub const STATS: &str = "cyber_serpent_stats";
    pub const MISSIONS: &str = "cyber_serpent_missions";
    pub const UNLOCKED_SKINS: &str = "cyber_serpent_unlocked_skins";
    pub const MAX_LEVEL: &str = "cyber_serpent_max_level";
}

/// String key-value storage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;

    /// Fire-and-forget write
    fn set(&mut self, key: &str, value: &str);
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }
}

/// Load a typed value, falling back to `T::default()`
pub fn load_json<T, S>(store: &S, key: &str) -> T
where
    T: DeserializeOwned + Default,
    S: KeyValueStore + ?Sized,
{
    let Some(raw) = store.get(key) else {
        return T::default();
    };
    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("Ignoring malformed value for {}: {}", key, e);
            T::default()
        }
    }
}

/// Save a typed value as JSON
pub fn save_json<T, S>(store: &mut S, key: &str, value: &T)
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    match serde_json::to_string(value) {
        Ok(json) => store.set(key, &json),
        Err(e) => log::warn!("Failed to serialize {}: {}", key, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert!(store.get("a").is_none());
        store.set("a", "1");
        store.set("a", "2");
        assert_eq!(store.get("a").as_deref(), Some("2"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_load_missing_uses_default() {
        let store = MemoryStore::new();
        let coins: u64 = load_json(&store, keys::COINS);
        assert_eq!(coins, 0);
    }

    #[test]
    fn test_load_malformed_uses_default() {
        let mut store = MemoryStore::new();
        store.set(keys::COINS, "lots");
        let coins: u64 = load_json(&store, keys::COINS);
        assert_eq!(coins, 0);

        store.set(keys::UNLOCKED_SKINS, "{\"oops\"");
        let skins: Vec<String> = load_json(&store, keys::UNLOCKED_SKINS);
        assert!(skins.is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let mut store = MemoryStore::new();
        save_json(&mut store, keys::COINS, &250u64);
        assert_eq!(store.get(keys::COINS).as_deref(), Some("250"));
        let coins: u64 = load_json(&store, keys::COINS);
        assert_eq!(coins, 250);
    }
}
