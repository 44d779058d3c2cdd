//! Cyber Serpent - A wrap-around arena survival game
//!
//! Core modules:
//! - `sim`: Simulation core (runner, entities, spawner, collisions, progression)
//! - `config`: Data-driven game balance
//! - `ledger`: Cross-run statistics, missions and unlocked skins
//! - `shop`: Coins, upgrades and power-up tiers
//! - `skins`: Skin catalog and secret codes
//! - `persistence`: Key-value store port and adapters
//! - `platform`: Input translation, frame clock, browser bindings
//! - `game`: Session tying a run to the persistent ledger and shop
//! - `snapshot`: Read-only render views
//! - `autopilot`: Demo controls for attract mode and headless runs

pub mod autopilot;
pub mod config;
pub mod game;
pub mod ledger;
pub mod persistence;
pub mod platform;
pub mod shop;
pub mod sim;
pub mod skins;
pub mod snapshot;

pub use config::GameConfig;
pub use game::Session;
pub use ledger::Ledger;
pub use shop::{Shop, ShopError};

/// Fixed game constants (not data-driven)
pub mod consts {
    /// Minimum body length of the runner
    pub const MIN_BODY_LENGTH: u32 = 5;
    /// Maximum (and required-to-dash) dash energy
    pub const DASH_ENERGY_MAX: f32 = 100.0;
    /// Segments nearest the head that never count for self-collision
    pub const NECK_EXEMPT_SEGMENTS: usize = 10;
    /// Highest power-up upgrade tier
    pub const MAX_EFFECT_TIER: u8 = 3;
    /// Highest explosion boost level
    pub const MAX_EXPLOSION_BOOST: u8 = 3;
}
