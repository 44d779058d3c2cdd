//! Data-driven game balance
//!
//! Every tunable constant of a run lives here. Supplied at startup and immutable
//! during a run. Missing JSON fields fall back to their defaults, and
//! out-of-range values are clamped by [`GameConfig::sanitized`].

use serde::{Deserialize, Serialize};

use crate::sim::EffectKind;

/// Arena dimensions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
        }
    }
}

/// Runner motion, body and dash constants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Pixels per tick before level bonus
    pub base_speed: f32,
    /// Radians per tick per held turn key
    pub rotation_speed: f32,
    /// Collision radius of head and segments
    pub segment_size: f32,
    /// Trail samples between body segments
    pub segment_spacing: usize,
    pub initial_length: u32,
    /// Segments gained per food
    pub food_growth: u32,
    pub dash_speed_multiplier: f32,
    pub dash_duration_ms: f32,
    pub dash_invulnerability_ms: f32,
    /// Energy drained per ms while dashing
    pub dash_drain_per_ms: f32,
    /// Energy recovered per ms while not dashing
    pub dash_recharge_per_ms: f32,
    /// Recharge rate with the dash recharge upgrade
    pub upgraded_dash_recharge_per_ms: f32,
    /// Base speed multiplier with the speed boost upgrade
    pub speed_boost_multiplier: f32,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            base_speed: 3.0,
            rotation_speed: 0.08,
            segment_size: 12.0,
            segment_spacing: 3,
            initial_length: 5,
            food_growth: 2,
            dash_speed_multiplier: 2.0,
            dash_duration_ms: 500.0,
            dash_invulnerability_ms: 500.0,
            dash_drain_per_ms: 0.2,
            dash_recharge_per_ms: 0.03,
            upgraded_dash_recharge_per_ms: 0.033,
            speed_boost_multiplier: 1.05,
        }
    }
}

/// Score, level and hard mode tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionConfig {
    /// Score needed per level (level N ends at N * level_up_score)
    pub level_up_score: u64,
    /// Runner speed added per level above 1
    pub speed_increase_per_level: f32,
    pub food_value: u64,
    pub coin_value: u64,
    /// Level at which hard mode begins
    pub hard_mode_level: u32,
    pub hard_mode_score_multiplier: f32,
    pub hard_mode_coin_multiplier: f32,
    /// One-time coin bonus for entering hard mode
    pub hard_mode_bonus: u64,
    /// Coin bonus for a new personal best level
    pub new_level_bonus: u64,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            level_up_score: 100,
            speed_increase_per_level: 0.3,
            food_value: 10,
            coin_value: 1,
            hard_mode_level: 10,
            hard_mode_score_multiplier: 1.5,
            hard_mode_coin_multiplier: 2.0,
            hard_mode_bonus: 100,
            new_level_bonus: 50,
        }
    }
}

/// Relative weights of the hostile archetypes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HostileWeights {
    pub hunter: f32,
    pub turret: f32,
    pub virus: f32,
    pub blindness: f32,
}

impl Default for HostileWeights {
    fn default() -> Self {
        Self {
            hunter: 0.55,
            turret: 0.25,
            virus: 0.10,
            blindness: 0.10,
        }
    }
}

/// Spawn scheduling
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Hostile interval at level 1 (divided by level and hard mode multiplier)
    pub enemy_spawn_interval_ms: f32,
    /// Turrets are excluded below this level
    pub min_level_for_turrets: u32,
    pub hard_mode_spawn_multiplier: f32,
    /// Chance of a second hostile per spawn in hard mode
    pub hard_mode_extra_spawn_chance: f64,
    pub powerup_spawn_interval_ms: f32,
    pub max_powerups: usize,
    /// Keep spawned entities this far from the arena edge
    pub interior_margin: f32,
    pub food_radius: f32,
    pub hostile_weights: HostileWeights,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            enemy_spawn_interval_ms: 5000.0,
            min_level_for_turrets: 2,
            hard_mode_spawn_multiplier: 2.0,
            hard_mode_extra_spawn_chance: 0.5,
            powerup_spawn_interval_ms: 15000.0,
            max_powerups: 2,
            interior_margin: 50.0,
            food_radius: 8.0,
            hostile_weights: HostileWeights::default(),
        }
    }
}

/// Hostile archetype behavior constants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HostileConfig {
    /// Fraction of normal speed for hostiles under time warp
    pub slow_factor: f32,
    pub hunter_speed: f32,
    pub hunter_radius: f32,
    pub hunter_hp: u32,
    /// Hunters spawn this far outside a horizontal edge
    pub hunter_spawn_offset: f32,
    /// Hunters die this far outside the arena
    pub hunter_despawn_margin: f32,
    /// Body fraction lost when a hunter hits the runner
    pub hunter_trim_fraction: f32,
    pub turret_radius: f32,
    pub turret_hp: u32,
    pub turret_margin: f32,
    pub turret_fire_interval_ms: f32,
    pub turret_projectile_speed: f32,
    pub turret_projectile_slow_speed: f32,
    pub turret_projectile_radius: f32,
    pub virus_radius: f32,
    pub virus_lifetime_ms: f32,
    /// Controls-inverted duration applied by a virus
    pub virus_inversion_ms: f32,
    pub blindness_radius: f32,
    pub blindness_lifetime_ms: f32,
    /// Vision-impair duration applied by a blindness hazard
    pub blindness_effect_ms: f32,
}

impl Default for HostileConfig {
    fn default() -> Self {
        Self {
            slow_factor: 0.3,
            hunter_speed: 2.0,
            hunter_radius: 10.0,
            hunter_hp: 1,
            hunter_spawn_offset: 20.0,
            hunter_despawn_margin: 50.0,
            hunter_trim_fraction: 0.2,
            turret_radius: 15.0,
            turret_hp: 3,
            turret_margin: 100.0,
            turret_fire_interval_ms: 2000.0,
            turret_projectile_speed: 5.0,
            turret_projectile_slow_speed: 2.0,
            turret_projectile_radius: 4.0,
            virus_radius: 12.0,
            virus_lifetime_ms: 15000.0,
            virus_inversion_ms: 3000.0,
            blindness_radius: 12.0,
            blindness_lifetime_ms: 15000.0,
            blindness_effect_ms: 5000.0,
        }
    }
}

/// Effect durations (ms) for one upgrade tier
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectDurations {
    pub ghost: f32,
    pub time_warp: f32,
    pub magneto: f32,
    pub tail_gun: f32,
    pub shield: f32,
}

impl Default for EffectDurations {
    fn default() -> Self {
        DURATION_TIERS[0]
    }
}

impl EffectDurations {
    /// Duration for an effect kind. Vision impair is not tiered.
    pub fn get(&self, kind: EffectKind) -> f32 {
        match kind {
            EffectKind::Ghost => self.ghost,
            EffectKind::TimeWarp => self.time_warp,
            EffectKind::Magneto => self.magneto,
            EffectKind::TailGun => self.tail_gun,
            EffectKind::Shield => self.shield,
            EffectKind::VisionImpair => 0.0,
        }
    }

    fn clamped(self) -> Self {
        Self {
            ghost: self.ghost.max(0.0),
            time_warp: self.time_warp.max(0.0),
            magneto: self.magneto.max(0.0),
            tail_gun: self.tail_gun.max(0.0),
            shield: self.shield.max(0.0),
        }
    }
}

/// Default durations for tiers 1..=3
const DURATION_TIERS: [EffectDurations; 3] = [
    EffectDurations {
        ghost: 3000.0,
        time_warp: 4000.0,
        magneto: 5000.0,
        tail_gun: 6000.0,
        shield: 3000.0,
    },
    EffectDurations {
        ghost: 5000.0,
        time_warp: 6000.0,
        magneto: 8000.0,
        tail_gun: 10000.0,
        shield: 5000.0,
    },
    EffectDurations {
        ghost: 7000.0,
        time_warp: 8000.0,
        magneto: 11000.0,
        tail_gun: 14000.0,
        shield: 7000.0,
    },
];

/// Power-up pickups and effect tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerUpConfig {
    pub radius: f32,
    pub lifetime_ms: f32,
    /// Duration tables indexed by upgrade tier - 1
    pub durations: [EffectDurations; 3],
    /// Coin cost to reach each tier (tier 1 is free)
    pub upgrade_costs: [u64; 3],
    /// Body fraction removed by the cut-tail pickup
    pub cut_tail_fraction: f32,
    /// Extra cut-tail weight per explosion boost level
    pub explosion_boost_step: f32,
    pub magneto_radius: f32,
    /// Pixels food moves toward the head per tick under magneto
    pub magneto_pull: f32,
    /// Time scale for the runner and entities under time warp
    pub time_warp_factor: f32,
}

impl Default for PowerUpConfig {
    fn default() -> Self {
        Self {
            radius: 10.0,
            lifetime_ms: 10000.0,
            durations: DURATION_TIERS,
            upgrade_costs: [0, 50, 70],
            cut_tail_fraction: 0.3,
            explosion_boost_step: 0.1,
            magneto_radius: 150.0,
            magneto_pull: 5.0,
            time_warp_factor: 0.3,
        }
    }
}

impl PowerUpConfig {
    /// Duration of `kind` at upgrade `tier` (clamped to 1..=3)
    pub fn duration(&self, kind: EffectKind, tier: u8) -> f32 {
        let index = tier.clamp(1, crate::consts::MAX_EFFECT_TIER) as usize - 1;
        self.durations[index].get(kind)
    }

    /// Cost of upgrading to `tier`, `None` past the last tier
    pub fn upgrade_cost(&self, tier: u8) -> Option<u64> {
        if tier == 0 {
            return None;
        }
        self.upgrade_costs.get(tier as usize - 1).copied()
    }
}

/// Tail gun (runner ranged attack)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GunConfig {
    pub fire_interval_ms: f32,
    pub damage: u32,
    pub projectile_speed: f32,
    pub projectile_radius: f32,
    /// Maximum targeting distance from the tail
    pub range: f32,
}

impl Default for GunConfig {
    fn default() -> Self {
        Self {
            fire_interval_ms: 500.0,
            damage: 1,
            projectile_speed: 8.0,
            projectile_radius: 5.0,
            range: 300.0,
        }
    }
}

/// Shop prices
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShopConfig {
    pub dash_recharge_price: u64,
    pub speed_boost_price: u64,
    pub shield_spawner_price: u64,
    pub skin_price: u64,
    pub explosion_boost_price: u64,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            dash_recharge_price: 100,
            speed_boost_price: 150,
            shield_spawner_price: 200,
            skin_price: 300,
            explosion_boost_price: 200,
        }
    }
}

/// Complete game configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub world: WorldConfig,
    pub runner: RunnerConfig,
    pub progression: ProgressionConfig,
    pub spawn: SpawnConfig,
    pub hostiles: HostileConfig,
    pub powerups: PowerUpConfig,
    pub gun: GunConfig,
    pub shop: ShopConfig,
    /// Largest frame delta (ms) accepted by the frame clock
    pub max_frame_delta_ms: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            runner: RunnerConfig::default(),
            progression: ProgressionConfig::default(),
            spawn: SpawnConfig::default(),
            hostiles: HostileConfig::default(),
            powerups: PowerUpConfig::default(),
            gun: GunConfig::default(),
            shop: ShopConfig::default(),
            max_frame_delta_ms: DEFAULT_MAX_FRAME_DELTA_MS,
        }
    }
}

impl GameConfig {
    /// Parse a JSON config, falling back to defaults when malformed
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<GameConfig>(json) {
            Ok(config) => config.sanitized(),
            Err(err) => {
                log::warn!("Invalid game config ({err}), using defaults");
                Self::default()
            }
        }
    }

    /// Clamp out-of-range values to safe minimums
    pub fn sanitized(mut self) -> Self {
        let w = &mut self.world;
        w.width = w.width.max(1.0);
        w.height = w.height.max(1.0);

        let r = &mut self.runner;
        r.base_speed = r.base_speed.max(0.0);
        r.rotation_speed = r.rotation_speed.max(0.0);
        r.segment_size = r.segment_size.max(0.0);
        r.segment_spacing = r.segment_spacing.max(1);
        r.initial_length = r.initial_length.max(crate::consts::MIN_BODY_LENGTH);
        r.dash_speed_multiplier = r.dash_speed_multiplier.max(0.0);
        r.dash_duration_ms = r.dash_duration_ms.max(0.0);
        r.dash_invulnerability_ms = r.dash_invulnerability_ms.max(0.0);
        r.dash_drain_per_ms = r.dash_drain_per_ms.max(0.0);
        r.dash_recharge_per_ms = r.dash_recharge_per_ms.max(0.0);
        r.upgraded_dash_recharge_per_ms = r.upgraded_dash_recharge_per_ms.max(0.0);
        r.speed_boost_multiplier = r.speed_boost_multiplier.max(0.0);

        let p = &mut self.progression;
        p.level_up_score = p.level_up_score.max(1);
        p.speed_increase_per_level = p.speed_increase_per_level.max(0.0);
        p.hard_mode_level = p.hard_mode_level.max(2);
        p.hard_mode_score_multiplier = p.hard_mode_score_multiplier.max(0.0);
        p.hard_mode_coin_multiplier = p.hard_mode_coin_multiplier.max(0.0);

        let s = &mut self.spawn;
        s.enemy_spawn_interval_ms = s.enemy_spawn_interval_ms.max(0.0);
        s.hard_mode_spawn_multiplier = s.hard_mode_spawn_multiplier.max(1.0);
        s.hard_mode_extra_spawn_chance = s.hard_mode_extra_spawn_chance.clamp(0.0, 1.0);
        s.powerup_spawn_interval_ms = s.powerup_spawn_interval_ms.max(0.0);
        s.interior_margin = s.interior_margin.max(0.0);
        s.food_radius = s.food_radius.max(0.0);
        let hw = &mut s.hostile_weights;
        hw.hunter = hw.hunter.max(0.0);
        hw.turret = hw.turret.max(0.0);
        hw.virus = hw.virus.max(0.0);
        hw.blindness = hw.blindness.max(0.0);

        let h = &mut self.hostiles;
        h.slow_factor = h.slow_factor.clamp(0.0, 1.0);
        h.hunter_speed = h.hunter_speed.max(0.0);
        h.hunter_radius = h.hunter_radius.max(0.0);
        h.hunter_hp = h.hunter_hp.max(1);
        h.hunter_despawn_margin = h.hunter_despawn_margin.max(h.hunter_spawn_offset);
        h.hunter_trim_fraction = h.hunter_trim_fraction.clamp(0.0, 1.0);
        h.turret_radius = h.turret_radius.max(0.0);
        h.turret_hp = h.turret_hp.max(1);
        h.turret_margin = h.turret_margin.max(0.0);
        h.turret_fire_interval_ms = h.turret_fire_interval_ms.max(1.0);
        h.turret_projectile_speed = h.turret_projectile_speed.max(0.0);
        h.turret_projectile_slow_speed = h.turret_projectile_slow_speed.max(0.0);
        h.turret_projectile_radius = h.turret_projectile_radius.max(0.0);
        h.virus_radius = h.virus_radius.max(0.0);
        h.virus_lifetime_ms = h.virus_lifetime_ms.max(0.0);
        h.virus_inversion_ms = h.virus_inversion_ms.max(0.0);
        h.blindness_radius = h.blindness_radius.max(0.0);
        h.blindness_lifetime_ms = h.blindness_lifetime_ms.max(0.0);
        h.blindness_effect_ms = h.blindness_effect_ms.max(0.0);

        let pu = &mut self.powerups;
        pu.radius = pu.radius.max(0.0);
        pu.lifetime_ms = pu.lifetime_ms.max(0.0);
        for tier in pu.durations.iter_mut() {
            *tier = tier.clamped();
        }
        pu.cut_tail_fraction = pu.cut_tail_fraction.clamp(0.0, 1.0);
        pu.explosion_boost_step = pu.explosion_boost_step.max(0.0);
        pu.magneto_radius = pu.magneto_radius.max(0.0);
        pu.magneto_pull = pu.magneto_pull.max(0.0);
        pu.time_warp_factor = pu.time_warp_factor.clamp(0.0, 1.0);

        let g = &mut self.gun;
        g.fire_interval_ms = g.fire_interval_ms.max(1.0);
        g.projectile_speed = g.projectile_speed.max(0.0);
        g.projectile_radius = g.projectile_radius.max(0.0);
        g.range = g.range.max(0.0);

        self.max_frame_delta_ms = if self.max_frame_delta_ms > 0.0 {
            self.max_frame_delta_ms
        } else {
            DEFAULT_MAX_FRAME_DELTA_MS
        };

        self
    }
}

/// Used when `max_frame_delta_ms` is unset or invalid
pub const DEFAULT_MAX_FRAME_DELTA_MS: f32 = 250.0;
