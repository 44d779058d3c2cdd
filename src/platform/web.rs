//! Browser bindings
//!
//! `WebArena` is the handle the page's JavaScript drives from its
//! `requestAnimationFrame` loop and key listeners. Rendering stays on the JS
//! side; it pulls a JSON snapshot after each frame.

use wasm_bindgen::prelude::*;

use crate::config::GameConfig;
use crate::game::Session;
use crate::persistence::{KeyValueStore, LocalStorageStore, MemoryStore};
use crate::shop::{ShopError, Upgrade};
use crate::sim::EffectLevels;

/// LocalStorage when the page has it, otherwise a throwaway map
enum BrowserStore {
    Local(LocalStorageStore),
    Memory(MemoryStore),
}

impl KeyValueStore for BrowserStore {
    fn get(&self, key: &str) -> Option<String> {
        match self {
            BrowserStore::Local(s) => s.get(key),
            BrowserStore::Memory(s) => s.get(key),
        }
    }

    fn set(&mut self, key: &str, value: &str) {
        match self {
            BrowserStore::Local(s) => s.set(key, value),
            BrowserStore::Memory(s) => s.set(key, value),
        }
    }
}

fn js_error(err: ShopError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        log::warn!("Snapshot serialization failed: {}", e);
        String::from("null")
    })
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&format!("Logger init failed: {}", e).into());
    }
    log::info!("Cyber Serpent starting...");
}

#[wasm_bindgen]
pub struct WebArena {
    session: Session<BrowserStore>,
}

#[wasm_bindgen]
impl WebArena {
    /// Optional JSON config overrides; missing fields use defaults
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> WebArena {
        let config = config_json
            .as_deref()
            .map(GameConfig::from_json)
            .unwrap_or_default();
        let store = match LocalStorageStore::new() {
            Some(local) => BrowserStore::Local(local),
            None => {
                log::warn!("LocalStorage unavailable, progress will not be saved");
                BrowserStore::Memory(MemoryStore::new())
            }
        };
        WebArena {
            session: Session::new(config, store),
        }
    }

    pub fn start_run(&mut self) {
        let seed = js_sys::Date::now() as u64;
        self.session.start_run(seed);
    }

    /// Advance to `now_ms` (the rAF timestamp); returns the frame's events as JSON
    pub fn frame(&mut self, now_ms: f64) -> String {
        to_json(&self.session.frame(now_ms))
    }

    pub fn pause(&mut self) {
        self.session.pause();
    }

    pub fn resume(&mut self) {
        self.session.resume();
    }

    pub fn is_paused(&self) -> bool {
        self.session.is_paused()
    }

    /// Forward a `KeyboardEvent.key`; returns true if it was a game key
    pub fn key(&mut self, key: &str, down: bool) -> bool {
        self.session.key(key, down)
    }

    pub fn snapshot_json(&self) -> Option<String> {
        self.session.snapshot().map(|s| to_json(&s))
    }

    pub fn coins(&self) -> f64 {
        self.session.shop().coins() as f64
    }

    pub fn skin(&self) -> String {
        self.session.skin().to_string()
    }

    pub fn missions_json(&self) -> String {
        to_json(&self.session.ledger().mission_progress())
    }

    pub fn stats_json(&self) -> String {
        to_json(self.session.ledger().stats())
    }

    pub fn buy_upgrade(&mut self, id: &str) -> Result<(), JsValue> {
        let upgrade = Upgrade::ALL
            .into_iter()
            .find(|u| u.as_str() == id)
            .ok_or_else(|| JsValue::from_str(&format!("unknown upgrade {:?}", id)))?;
        self.session.buy_upgrade(upgrade).map_err(js_error)
    }

    pub fn upgrade_effect(&mut self, id: &str) -> Result<u8, JsValue> {
        let kind = EffectLevels::UPGRADABLE
            .into_iter()
            .find(|k| k.as_str() == id)
            .ok_or_else(|| JsValue::from_str(&format!("unknown effect {:?}", id)))?;
        self.session.upgrade_effect(kind).map_err(js_error)
    }

    pub fn upgrade_explosion_boost(&mut self) -> Result<u8, JsValue> {
        self.session.upgrade_explosion_boost().map_err(js_error)
    }

    pub fn equip_skin(&mut self, id: &str) -> Result<(), JsValue> {
        self.session.equip_skin(id).map_err(js_error)
    }

    /// Returns the unlocked skin's id
    pub fn redeem_code(&mut self, code: &str) -> Result<String, JsValue> {
        self.session
            .redeem_code(code)
            .map(|skin| skin.id.to_string())
            .map_err(js_error)
    }
}
