//! Game session
//!
//! Owns everything that outlives a single run:
//! - the key-value store and what is loaded from it (ledger, shop, skin)
//! - the frame clock and the raw control state
//! - the current run, if any
//!
//! Run events are folded back into the persistent side as they are drained:
//! coins are banked immediately, best level is raised live, and a finished
//! run is recorded into the ledger.

use serde::Serialize;

use crate::config::GameConfig;
use crate::ledger::{Ledger, MissionUnlock, RunSummary};
use crate::persistence::{self, KeyValueStore, keys};
use crate::platform::{FrameClock, RawInput};
use crate::shop::{Shop, ShopError, Upgrade};
use crate::sim::{EffectKind, GameEvent, GameState, tick};
use crate::skins::{self, DEFAULT_SKIN, Skin};
use crate::snapshot::RenderSnapshot;

/// What one frame produced
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FrameReport {
    pub events: Vec<GameEvent>,
    /// Coins banked this frame
    pub coins: u64,
    /// Missions completed by a run that ended this frame
    pub unlocks: Vec<MissionUnlock>,
}

impl FrameReport {
    pub fn is_game_over(&self) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, GameEvent::GameOver { .. }))
    }
}

pub struct Session<S: KeyValueStore> {
    config: GameConfig,
    store: S,
    ledger: Ledger,
    shop: Shop,
    skin: String,
    clock: FrameClock,
    input: RawInput,
    run: Option<GameState>,
}

impl<S: KeyValueStore> Session<S> {
    /// Load the persistent state from `store`
    pub fn new(config: GameConfig, store: S) -> Self {
        let config = config.sanitized();
        let ledger = Ledger::load(&store);
        let shop = Shop::load(&config, &store);

        let mut skin: String = persistence::load_json(&store, keys::SKIN);
        if skins::find(&skin).is_none() || !ledger.is_skin_unlocked(&skin) {
            skin = DEFAULT_SKIN.to_string();
        }

        log::info!(
            "Session ready: {} coins, skin {}, best level {}",
            shop.coins(),
            skin,
            ledger.max_level_reached()
        );

        Self {
            clock: FrameClock::new(config.max_frame_delta_ms),
            config,
            store,
            ledger,
            shop,
            skin,
            input: RawInput::default(),
            run: None,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn shop(&self) -> &Shop {
        &self.shop
    }

    pub fn skin(&self) -> &str {
        &self.skin
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Current (or last finished) run
    pub fn state(&self) -> Option<&GameState> {
        self.run.as_ref()
    }

    pub fn state_mut(&mut self) -> Option<&mut GameState> {
        self.run.as_mut()
    }

    // ---- Run control ----

    /// Start a fresh run with the current shop loadout
    pub fn start_run(&mut self, seed: u64) {
        let loadout = self.shop.loadout(self.ledger.max_level_reached());
        self.run = Some(GameState::new(self.config.clone(), loadout, seed));
        self.clock.resume();
        self.input = RawInput::default();
        log::info!("Run started (seed {})", seed);
    }

    /// Advance by the time since the previous frame
    pub fn frame(&mut self, now_ms: f64) -> FrameReport {
        match self.clock.frame(now_ms) {
            Some(dt_ms) => self.step(dt_ms),
            None => FrameReport::default(),
        }
    }

    /// Advance by an explicit delta
    pub fn step(&mut self, dt_ms: f32) -> FrameReport {
        let Some(state) = self.run.as_mut() else {
            return FrameReport::default();
        };

        let input = self.input.resolve(state.run.controls_inverted());
        tick(state, &input, dt_ms);

        let mut report = FrameReport {
            coins: state.run.take_pending_coins(),
            events: state.drain_events(),
            unlocks: Vec::new(),
        };

        if report.coins > 0 {
            self.shop.add_coins(report.coins);
            self.shop.save_coins(&mut self.store);
        }

        let mut ledger_dirty = false;
        for event in &report.events {
            match *event {
                GameEvent::NewBestLevel { level, .. }
                | GameEvent::HardModeEntered { level, .. } => {
                    ledger_dirty |= self.ledger.raise_max_level(level);
                }
                GameEvent::GameOver { .. } => {
                    let run = &state.run;
                    report.unlocks = self.ledger.record_run(RunSummary {
                        level: run.level,
                        score: run.score,
                        duration_ms: run.elapsed_ms as u64,
                        coins_earned: run.coins_earned,
                        kills: run.kills,
                    });
                    ledger_dirty = true;
                }
                _ => {}
            }
        }
        if ledger_dirty {
            self.ledger.save(&mut self.store);
        }

        report
    }

    pub fn pause(&mut self) {
        if let Some(state) = self.run.as_mut() {
            state.pause();
        }
        self.clock.pause();
    }

    pub fn resume(&mut self) {
        if let Some(state) = self.run.as_mut() {
            state.resume();
        }
        self.clock.resume();
    }

    pub fn is_paused(&self) -> bool {
        self.clock.is_paused()
    }

    // ---- Input ----

    /// Apply a key event; returns false for unbound keys
    pub fn key(&mut self, key: &str, down: bool) -> bool {
        self.input.key(key, down)
    }

    pub fn set_input(&mut self, input: RawInput) {
        self.input = input;
    }

    pub fn input(&self) -> RawInput {
        self.input
    }

    // ---- Shop ----

    pub fn buy_upgrade(&mut self, upgrade: Upgrade) -> Result<(), ShopError> {
        self.shop.buy_upgrade(upgrade, &mut self.ledger)?;
        self.shop.save(&mut self.store);
        self.ledger.save(&mut self.store);
        Ok(())
    }

    pub fn upgrade_effect(&mut self, kind: EffectKind) -> Result<u8, ShopError> {
        let tier = self.shop.upgrade_effect(kind)?;
        self.shop.save(&mut self.store);
        Ok(tier)
    }

    pub fn upgrade_explosion_boost(&mut self) -> Result<u8, ShopError> {
        let level = self.shop.upgrade_explosion_boost()?;
        self.shop.save(&mut self.store);
        Ok(level)
    }

    // ---- Skins ----

    pub fn equip_skin(&mut self, id: &str) -> Result<(), ShopError> {
        let skin = skins::find(id).ok_or_else(|| ShopError::UnknownSkin(id.to_string()))?;
        if !self.ledger.is_skin_unlocked(skin.id) {
            return Err(ShopError::SkinLocked(id.to_string()));
        }
        self.skin = skin.id.to_string();
        persistence::save_json(&mut self.store, keys::SKIN, &self.skin);
        Ok(())
    }

    /// Unlock the skin behind a secret code
    pub fn redeem_code(&mut self, code: &str) -> Result<&'static Skin, ShopError> {
        let skin = skins::skin_for_code(code).ok_or(ShopError::InvalidCode)?;
        if !self.ledger.unlock_skin(skin.id) {
            return Err(ShopError::AlreadyUnlocked(skin.id.to_string()));
        }
        self.ledger.save(&mut self.store);
        log::info!("Code redeemed: unlocked {}", skin.id);
        Ok(skin)
    }

    /// Render view of the current run
    pub fn snapshot(&self) -> Option<RenderSnapshot> {
        self.run
            .as_ref()
            .map(|state| RenderSnapshot::capture(state, &self.skin))
    }
}
