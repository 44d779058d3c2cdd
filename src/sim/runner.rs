//! The runner: the player's growing serpent
//!
//! Motion is integrated per tick (pixels per tick, not per ms), while every
//! timed state (dash, dash invulnerability, named effects) is an explicit
//! countdown decremented by the tick delta. Nothing here is scheduled outside
//! the tick, so a paused simulation freezes all of it.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geom;
use super::tick::TickInput;
use super::world::World;
use crate::config::RunnerConfig;
use crate::consts::{DASH_ENERGY_MAX, MIN_BODY_LENGTH, NECK_EXEMPT_SEGMENTS};

/// Named timed effects carried by the runner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    /// Pass through hostiles, damages turrets on contact
    Ghost,
    /// Slows hostiles, projectiles and the runner's own clock
    TimeWarp,
    /// Pulls nearby food toward the head
    Magneto,
    /// Fires projectiles from the tail at nearby hostiles
    TailGun,
    /// Blocks hostile contact
    Shield,
    /// Debuff: the renderer darkens the arena around the head
    VisionImpair,
}

impl EffectKind {
    pub const ALL: [EffectKind; 6] = [
        EffectKind::Ghost,
        EffectKind::TimeWarp,
        EffectKind::Magneto,
        EffectKind::TailGun,
        EffectKind::Shield,
        EffectKind::VisionImpair,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EffectKind::Ghost => "ghost",
            EffectKind::TimeWarp => "time_warp",
            EffectKind::Magneto => "magneto",
            EffectKind::TailGun => "tail_gun",
            EffectKind::Shield => "shield",
            EffectKind::VisionImpair => "vision_impair",
        }
    }
}

/// Countdown for one effect
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectTimer {
    pub active: bool,
    pub remaining_ms: f32,
}

impl EffectTimer {
    /// Non-positive durations are ignored
    fn start(&mut self, duration_ms: f32) {
        if duration_ms.is_nan() || duration_ms <= 0.0 {
            return;
        }
        self.active = true;
        self.remaining_ms = duration_ms;
    }

    fn advance(&mut self, dt_ms: f32) {
        if self.active {
            self.remaining_ms -= dt_ms;
            if self.remaining_ms <= 0.0 {
                self.active = false;
                self.remaining_ms = 0.0;
            }
        }
    }
}

/// One slot per effect kind
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Effects {
    pub ghost: EffectTimer,
    pub time_warp: EffectTimer,
    pub magneto: EffectTimer,
    pub tail_gun: EffectTimer,
    pub shield: EffectTimer,
    pub vision_impair: EffectTimer,
    /// Time until the tail gun fires again
    pub tail_gun_cooldown_ms: f32,
}

impl Effects {
    pub fn get(&self, kind: EffectKind) -> &EffectTimer {
        match kind {
            EffectKind::Ghost => &self.ghost,
            EffectKind::TimeWarp => &self.time_warp,
            EffectKind::Magneto => &self.magneto,
            EffectKind::TailGun => &self.tail_gun,
            EffectKind::Shield => &self.shield,
            EffectKind::VisionImpair => &self.vision_impair,
        }
    }

    fn get_mut(&mut self, kind: EffectKind) -> &mut EffectTimer {
        match kind {
            EffectKind::Ghost => &mut self.ghost,
            EffectKind::TimeWarp => &mut self.time_warp,
            EffectKind::Magneto => &mut self.magneto,
            EffectKind::TailGun => &mut self.tail_gun,
            EffectKind::Shield => &mut self.shield,
            EffectKind::VisionImpair => &mut self.vision_impair,
        }
    }

    #[inline]
    pub fn is_active(&self, kind: EffectKind) -> bool {
        self.get(kind).active
    }

    /// Start (or restart) an effect; other effects are untouched
    pub fn activate(&mut self, kind: EffectKind, duration_ms: f32) {
        self.get_mut(kind).start(duration_ms);
    }

    /// Advance every active countdown
    pub fn advance(&mut self, dt_ms: f32) {
        for kind in EffectKind::ALL {
            self.get_mut(kind).advance(dt_ms);
        }
    }

    /// Currently active effects, in declaration order
    pub fn active_kinds(&self) -> Vec<EffectKind> {
        EffectKind::ALL
            .into_iter()
            .filter(|k| self.is_active(*k))
            .collect()
    }
}

/// Permanent shop upgrades that change the runner
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunnerUpgrades {
    pub speed_boost: bool,
    pub dash_recharge: bool,
}

/// The player's serpent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Runner {
    pub head: Vec2,
    /// Heading in radians
    pub heading: f32,
    /// Head position history, oldest first
    pub trail: VecDeque<Vec2>,
    /// Body segments sampled from the trail, head-proximal first
    pub segments: Vec<Vec2>,
    /// Number of body segments (never below the minimum)
    pub length: u32,
    pub dash_energy: f32,
    /// Remaining dash time; dashing while positive
    pub dash_remaining_ms: f32,
    /// Remaining dash invulnerability
    pub invulnerable_remaining_ms: f32,
    pub effects: Effects,
    /// Base speed including the speed boost upgrade
    speed: f32,
    recharge_per_ms: f32,
}

impl Runner {
    pub fn new(pos: Vec2, config: &RunnerConfig, upgrades: RunnerUpgrades) -> Self {
        let speed = if upgrades.speed_boost {
            config.base_speed * config.speed_boost_multiplier
        } else {
            config.base_speed
        };
        let recharge_per_ms = if upgrades.dash_recharge {
            config.upgraded_dash_recharge_per_ms
        } else {
            config.dash_recharge_per_ms
        };

        Self {
            head: pos,
            heading: 0.0,
            trail: VecDeque::new(),
            segments: vec![pos],
            length: config.initial_length.max(MIN_BODY_LENGTH),
            dash_energy: DASH_ENERGY_MAX,
            dash_remaining_ms: 0.0,
            invulnerable_remaining_ms: 0.0,
            effects: Effects::default(),
            speed,
            recharge_per_ms,
        }
    }

    #[inline]
    pub fn is_dashing(&self) -> bool {
        self.dash_remaining_ms > 0.0
    }

    /// Dash invulnerability window (independent of ghost/shield)
    #[inline]
    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_remaining_ms > 0.0
    }

    /// Hostile contact is harmless while any protection is up
    pub fn is_protected(&self) -> bool {
        self.is_invulnerable()
            || self.effects.is_active(EffectKind::Ghost)
            || self.effects.is_active(EffectKind::Shield)
    }

    /// Base speed including upgrades, before level bonus and dash
    pub fn base_speed(&self) -> f32 {
        self.speed
    }

    /// Advance one tick: steer, dash, move, wrap, resample the body, run timers
    pub fn update(
        &mut self,
        dt_ms: f32,
        input: &TickInput,
        level_speed_bonus: f32,
        config: &RunnerConfig,
        world: &World,
    ) {
        let dt_ms = dt_ms.max(0.0);

        // Both keys may be held; each applies its own rotation
        if input.left {
            self.heading -= config.rotation_speed;
        }
        if input.right {
            self.heading += config.rotation_speed;
        }

        if input.dash && self.dash_energy >= DASH_ENERGY_MAX && !self.is_dashing() {
            self.start_dash(config);
        }

        if self.is_dashing() {
            self.dash_energy = (self.dash_energy - dt_ms * config.dash_drain_per_ms).max(0.0);
        } else {
            self.dash_energy =
                (self.dash_energy + dt_ms * self.recharge_per_ms).min(DASH_ENERGY_MAX);
        }

        let dash_mult = if self.is_dashing() {
            config.dash_speed_multiplier
        } else {
            1.0
        };
        let speed = (self.speed + level_speed_bonus) * dash_mult;
        self.head = world.wrap(self.head + geom::from_angle(self.heading) * speed);

        self.trail.push_back(self.head);
        let max_trail = self.length as usize * config.segment_spacing;
        while self.trail.len() > max_trail {
            self.trail.pop_front();
        }
        self.resample_segments(config.segment_spacing);

        self.dash_remaining_ms = (self.dash_remaining_ms - dt_ms).max(0.0);
        self.invulnerable_remaining_ms = (self.invulnerable_remaining_ms - dt_ms).max(0.0);
        self.effects.advance(dt_ms);
    }

    fn start_dash(&mut self, config: &RunnerConfig) {
        self.dash_remaining_ms = config.dash_duration_ms;
        self.invulnerable_remaining_ms = config.dash_invulnerability_ms;
        log::debug!("Dash started");
    }

    /// Stride the trail from its newest sample, one segment per `spacing`
    fn resample_segments(&mut self, spacing: usize) {
        self.segments.clear();
        let Some(last) = self.trail.len().checked_sub(1) else {
            return;
        };
        for i in 0..self.length as usize {
            let index = last.saturating_sub(i * spacing);
            self.segments.push(self.trail[index]);
        }
    }

    pub fn grow(&mut self, amount: u32) {
        self.length = self.length.saturating_add(amount);
    }

    /// Remove a fraction of the body, never going below the minimum length
    pub fn cut(&mut self, fraction: f32) {
        let kept = (self.length as f32 * (1.0 - fraction)).floor();
        self.length = (kept.max(0.0) as u32).max(MIN_BODY_LENGTH);
    }

    pub fn activate_effect(&mut self, kind: EffectKind, duration_ms: f32) {
        self.effects.activate(kind, duration_ms);
    }

    /// Head overlapping its own body beyond the neck
    pub fn self_collides(&self, segment_size: f32) -> bool {
        if self.is_protected() {
            return false;
        }
        self.segments
            .iter()
            .skip(NECK_EXEMPT_SEGMENTS)
            .any(|s| self.head.distance(*s) < segment_size)
    }

    /// Last body segment (tail-gun muzzle)
    pub fn tail(&self) -> Option<Vec2> {
        self.segments.last().copied()
    }
}
