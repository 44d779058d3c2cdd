//! Arena simulation module
//!
//! All gameplay logic lives here. This module stays free of platform code:
//! - Seeded RNG only (one `Pcg32` per run)
//! - Every timed state is a countdown advanced by the tick delta
//! - Stable iteration order (entity registry in spawn order)
//! - No rendering, storage or input-device dependencies

pub mod collision;
pub mod entity;
pub mod geom;
pub mod progression;
pub mod runner;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod world;

pub use entity::{Entity, EntityKind, EntityTag, PowerUpKind, Projectile};
pub use progression::Difficulty;
pub use runner::{EffectKind, EffectTimer, Effects, Runner, RunnerUpgrades};
pub use state::{
    EffectLevels, GameEvent, GameOverCause, GamePhase, GameState, RunLoadout, RunState,
};
pub use tick::{TickInput, tick};
pub use world::World;
