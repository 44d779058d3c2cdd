//! Game state and core simulation types
//!
//! Everything scoped to a single run lives here. A new run is a new
//! `GameState`; nothing survives from the previous one.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityKind, EntityTag, PowerUpKind, Projectile};
use super::geom;
use super::progression::Difficulty;
use super::runner::{EffectKind, Runner, RunnerUpgrades};
use super::spawner::SpawnTimers;
use super::world::World;
use crate::config::GameConfig;

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// No ticks are processed
    Paused,
    /// Run ended
    GameOver,
}

/// What ended the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverCause {
    SelfCollision,
    HunterContact,
    TurretShot,
    TurretContact,
}

/// Notable things that happened during a tick, drained by the caller
/// (particles, notifications, audio, persistence).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    FoodEaten { x: f32, y: f32 },
    LevelUp { level: u32 },
    HardModeEntered { level: u32, bonus: u64 },
    NewBestLevel { level: u32, bonus: u64 },
    PowerUpCollected { kind: PowerUpKind },
    /// Cosmetic, from the cut-tail pickup
    ScreenShake,
    EnemyKilled { tag: EntityTag, x: f32, y: f32 },
    ControlsInverted { duration_ms: f32 },
    VisionImpaired { duration_ms: f32 },
    GameOver { cause: GameOverCause },
}

/// Upgrade tier (1..=3) of each upgradable effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectLevels {
    pub ghost: u8,
    pub time_warp: u8,
    pub magneto: u8,
    pub tail_gun: u8,
    pub shield: u8,
}

impl Default for EffectLevels {
    fn default() -> Self {
        Self {
            ghost: 1,
            time_warp: 1,
            magneto: 1,
            tail_gun: 1,
            shield: 1,
        }
    }
}

impl EffectLevels {
    /// Kinds that can be upgraded in the shop
    pub const UPGRADABLE: [EffectKind; 5] = [
        EffectKind::Ghost,
        EffectKind::TimeWarp,
        EffectKind::Magneto,
        EffectKind::TailGun,
        EffectKind::Shield,
    ];

    pub fn get(&self, kind: EffectKind) -> u8 {
        match kind {
            EffectKind::Ghost => self.ghost,
            EffectKind::TimeWarp => self.time_warp,
            EffectKind::Magneto => self.magneto,
            EffectKind::TailGun => self.tail_gun,
            EffectKind::Shield => self.shield,
            EffectKind::VisionImpair => 1,
        }
    }

    /// Set a tier; returns false for kinds without tiers
    pub fn set(&mut self, kind: EffectKind, tier: u8) -> bool {
        let slot = match kind {
            EffectKind::Ghost => &mut self.ghost,
            EffectKind::TimeWarp => &mut self.time_warp,
            EffectKind::Magneto => &mut self.magneto,
            EffectKind::TailGun => &mut self.tail_gun,
            EffectKind::Shield => &mut self.shield,
            EffectKind::VisionImpair => return false,
        };
        *slot = tier;
        true
    }
}

/// What the player brings into a run from the shop and ledger
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunLoadout {
    pub upgrades: RunnerUpgrades,
    /// Shield pickups can spawn
    pub shield_spawner: bool,
    /// Extra cut-tail spawn weight level
    pub explosion_boost: u8,
    pub effect_levels: EffectLevels,
    /// Best level ever reached, for the new-level bonus
    pub best_level: u32,
}

/// Score, level and timers of the current run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunState {
    pub score: u64,
    pub level: u32,
    pub difficulty: Difficulty,
    /// Simulated run time (paused time excluded)
    pub elapsed_ms: f64,
    pub kills: u32,
    /// All coins earned this run, bonuses included
    pub coins_earned: u64,
    pub hard_mode_bonus_given: bool,
    /// Best level across all runs, updated live
    pub best_level: u32,
    /// Controls-inverted debuff countdown
    pub controls_inverted_ms: f32,
    /// Coins not yet handed to the shop
    pending_coins: u64,
}

impl RunState {
    pub fn new(best_level: u32) -> Self {
        Self {
            score: 0,
            level: 1,
            difficulty: Difficulty::Ramping,
            elapsed_ms: 0.0,
            kills: 0,
            coins_earned: 0,
            hard_mode_bonus_given: false,
            best_level,
            controls_inverted_ms: 0.0,
            pending_coins: 0,
        }
    }

    #[inline]
    pub fn is_hard_mode(&self) -> bool {
        self.difficulty == Difficulty::HardMode
    }

    #[inline]
    pub fn controls_inverted(&self) -> bool {
        self.controls_inverted_ms > 0.0
    }

    pub fn credit_coins(&mut self, amount: u64) {
        self.coins_earned += amount;
        self.pending_coins += amount;
    }

    /// Take coins earned since the last call
    pub fn take_pending_coins(&mut self) -> u64 {
        std::mem::take(&mut self.pending_coins)
    }
}

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    pub world: World,
    /// Run seed
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub runner: Runner,
    /// Entity registry (food, pickups, hostiles), in spawn order
    pub entities: Vec<Entity>,
    /// Tail gun projectiles in flight
    pub shots: Vec<Projectile>,
    pub spawn_timers: SpawnTimers,
    pub run: RunState,
    pub loadout: RunLoadout,
    /// Events since the last drain
    pub events: Vec<GameEvent>,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Start a run with a food item already placed
    pub fn new(config: GameConfig, loadout: RunLoadout, seed: u64) -> Self {
        let config = config.sanitized();
        let world = World::from_config(&config.world);
        let runner = Runner::new(world.center(), &config.runner, loadout.upgrades);
        let run = RunState::new(loadout.best_level);

        let mut state = Self {
            world,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Playing,
            runner,
            entities: Vec::new(),
            shots: Vec::new(),
            spawn_timers: SpawnTimers::default(),
            run,
            loadout,
            events: Vec::new(),
            time_ticks: 0,
            next_id: 1,
            config,
        };

        let pos = state.random_interior_point();
        let id = state.next_entity_id();
        let radius = state.config.spawn.food_radius;
        state.entities.push(Entity::new(id, pos, radius, EntityKind::Food));

        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Random point away from the edges
    pub fn random_interior_point(&mut self) -> glam::Vec2 {
        geom::random_interior(
            &mut self.rng,
            self.world.width,
            self.world.height,
            self.config.spawn.interior_margin,
        )
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    pub fn pause(&mut self) {
        if self.phase == GamePhase::Playing {
            self.phase = GamePhase::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.phase == GamePhase::Paused {
            self.phase = GamePhase::Playing;
        }
    }

    /// Transition to game over (normal end of a run)
    pub fn end_run(&mut self, cause: GameOverCause) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        log::info!(
            "Run over ({:?}): score {}, level {}, {:.1}s",
            cause,
            self.run.score,
            self.run.level,
            self.run.elapsed_ms / 1000.0
        );
        self.phase = GamePhase::GameOver;
        self.events.push(GameEvent::GameOver { cause });
    }

    /// Take all events since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Live entities of one kind
    pub fn count(&self, tag: EntityTag) -> usize {
        self.entities
            .iter()
            .filter(|e| e.tag() == tag && !e.is_dead())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_sanitizes_config() {
        let mut config = GameConfig::default();
        config.spawn.hard_mode_extra_spawn_chance = 5.0;
        config.runner.segment_spacing = 0;
        let state = GameState::new(config, RunLoadout::default(), 1);
        assert_eq!(state.config.spawn.hard_mode_extra_spawn_chance, 1.0);
        assert_eq!(state.config.runner.segment_spacing, 1);
    }

    #[test]
    fn test_new_run_has_one_food() {
        let state = GameState::new(GameConfig::default(), RunLoadout::default(), 1);
        assert_eq!(state.count(EntityTag::Food), 1);
        assert_eq!(state.entities.len(), 1);
        assert_eq!(state.run.level, 1);
        assert!(state.is_playing());
        assert_eq!(state.runner.head, state.world.center());
    }

    #[test]
    fn test_pause_resume() {
        let mut state = GameState::new(GameConfig::default(), RunLoadout::default(), 1);
        state.pause();
        assert_eq!(state.phase, GamePhase::Paused);
        state.resume();
        assert_eq!(state.phase, GamePhase::Playing);

        state.end_run(GameOverCause::SelfCollision);
        state.resume();
        assert_eq!(state.phase, GamePhase::GameOver);
        // Only one game over event even if ended twice
        state.end_run(GameOverCause::HunterContact);
        assert_eq!(state.drain_events().len(), 1);
    }

    #[test]
    fn test_pending_coins_drain() {
        let mut run = RunState::new(0);
        run.credit_coins(3);
        run.credit_coins(2);
        assert_eq!(run.take_pending_coins(), 5);
        assert_eq!(run.take_pending_coins(), 0);
        assert_eq!(run.coins_earned, 5);
    }

    #[test]
    fn test_effect_levels() {
        let mut levels = EffectLevels::default();
        assert!(levels.set(EffectKind::Magneto, 3));
        assert_eq!(levels.get(EffectKind::Magneto), 3);
        assert!(!levels.set(EffectKind::VisionImpair, 2));
    }
}
