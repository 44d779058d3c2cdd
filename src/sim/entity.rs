//! Resources and hostiles living in the arena
//!
//! A closed set of kinds. Each kind's behavior (update, liveness, contact
//! tests) is an exhaustive `match`, so adding a kind forces every rule to be
//! revisited.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geom;
use super::runner::{EffectKind, Runner};
use super::world::World;
use crate::config::HostileConfig;

/// Pickup types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    Ghost,
    TimeWarp,
    Magneto,
    TailGun,
    /// Instant: trims the body and clears every hostile
    CutTail,
    /// Only spawns once the shield spawner upgrade is owned
    Shield,
}

impl PowerUpKind {
    /// The timed effect granted on pickup, `None` for instant pickups
    pub fn effect(&self) -> Option<EffectKind> {
        match self {
            PowerUpKind::Ghost => Some(EffectKind::Ghost),
            PowerUpKind::TimeWarp => Some(EffectKind::TimeWarp),
            PowerUpKind::Magneto => Some(EffectKind::Magneto),
            PowerUpKind::TailGun => Some(EffectKind::TailGun),
            PowerUpKind::Shield => Some(EffectKind::Shield),
            PowerUpKind::CutTail => None,
        }
    }
}

/// A straight-flying shot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    /// Direction of travel (radians), fixed at fire time
    pub heading: f32,
    pub radius: f32,
}

impl Projectile {
    pub fn advance(&mut self, speed: f32) {
        self.pos += geom::from_angle(self.heading) * speed;
    }
}

/// Kind tag without payload (render snapshots, spawn tables)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityTag {
    Food,
    PowerUp,
    Hunter,
    Turret,
    Virus,
    Blindness,
}

impl EntityTag {
    /// Everything cleared by a cut-tail pickup
    pub fn is_hostile(&self) -> bool {
        !matches!(self, EntityTag::Food | EntityTag::PowerUp)
    }
}

/// Per-kind state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntityKind {
    Food,
    PowerUp {
        kind: PowerUpKind,
        lifetime_ms: f32,
    },
    /// Melee homing hostile
    Hunter { velocity: Vec2, hp: u32 },
    /// Stationary ranged hostile
    Turret {
        hp: u32,
        fire_interval_ms: f32,
        accumulated_ms: f32,
        projectiles: Vec<Projectile>,
    },
    /// Inverts controls on contact
    Virus { lifetime_ms: f32, inversion_ms: f32 },
    /// Impairs vision on contact
    Blindness { lifetime_ms: f32, effect_ms: f32 },
}

/// An arena entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub kind: EntityKind,
    /// Consumed, cleared, or left the arena
    pub removed: bool,
}

impl Entity {
    pub fn new(id: u32, pos: Vec2, radius: f32, kind: EntityKind) -> Self {
        Self {
            id,
            pos,
            radius,
            kind,
            removed: false,
        }
    }

    pub fn tag(&self) -> EntityTag {
        match self.kind {
            EntityKind::Food => EntityTag::Food,
            EntityKind::PowerUp { .. } => EntityTag::PowerUp,
            EntityKind::Hunter { .. } => EntityTag::Hunter,
            EntityKind::Turret { .. } => EntityTag::Turret,
            EntityKind::Virus { .. } => EntityTag::Virus,
            EntityKind::Blindness { .. } => EntityTag::Blindness,
        }
    }

    /// Hit points, for kinds that can be damaged
    pub fn hp(&self) -> Option<u32> {
        match self.kind {
            EntityKind::Hunter { hp, .. } | EntityKind::Turret { hp, .. } => Some(hp),
            _ => None,
        }
    }

    /// Advance this entity's behavior by one tick
    pub fn update(
        &mut self,
        dt_ms: f32,
        runner_head: Vec2,
        slow: bool,
        world: &World,
        config: &HostileConfig,
    ) {
        match &mut self.kind {
            EntityKind::Food => {}
            EntityKind::PowerUp { lifetime_ms, .. }
            | EntityKind::Virus { lifetime_ms, .. }
            | EntityKind::Blindness { lifetime_ms, .. } => {
                *lifetime_ms -= dt_ms;
            }
            EntityKind::Hunter { velocity, .. } => {
                let speed = if slow {
                    config.hunter_speed * config.slow_factor
                } else {
                    config.hunter_speed
                };
                *velocity = geom::direction(self.pos, runner_head) * speed;
                self.pos += *velocity;
                if world.is_beyond(self.pos, config.hunter_despawn_margin) {
                    self.removed = true;
                }
            }
            EntityKind::Turret {
                fire_interval_ms,
                accumulated_ms,
                projectiles,
                ..
            } => {
                let interval = if slow {
                    *fire_interval_ms * 2.0
                } else {
                    *fire_interval_ms
                };
                *accumulated_ms += dt_ms;
                if *accumulated_ms >= interval {
                    projectiles.push(Projectile {
                        pos: self.pos,
                        heading: geom::heading_to(self.pos, runner_head),
                        radius: config.turret_projectile_radius,
                    });
                    *accumulated_ms = 0.0;
                }

                let speed = if slow {
                    config.turret_projectile_slow_speed
                } else {
                    config.turret_projectile_speed
                };
                for proj in projectiles.iter_mut() {
                    proj.advance(speed);
                }
                projectiles.retain(|p| world.contains_open(p.pos));
            }
        }
    }

    pub fn is_dead(&self) -> bool {
        if self.removed {
            return true;
        }
        match self.kind {
            EntityKind::Food => false,
            EntityKind::PowerUp { lifetime_ms, .. }
            | EntityKind::Virus { lifetime_ms, .. }
            | EntityKind::Blindness { lifetime_ms, .. } => lifetime_ms <= 0.0,
            EntityKind::Hunter { hp, .. } | EntityKind::Turret { hp, .. } => hp == 0,
        }
    }

    /// Body circle overlaps a circle of `radius` at `point`
    #[inline]
    pub fn body_overlaps(&self, point: Vec2, radius: f32) -> bool {
        geom::circles_overlap(self.pos, self.radius, point, radius)
    }

    /// Contact with the runner's head.
    ///
    /// Turrets hit the head only with their projectiles; their body overlap
    /// is a separate rule.
    pub fn collides_with_head(&self, runner: &Runner, runner_radius: f32) -> bool {
        match &self.kind {
            EntityKind::Turret { projectiles, .. } => projectiles
                .iter()
                .any(|p| geom::circles_overlap(p.pos, p.radius, runner.head, runner_radius)),
            _ => self.body_overlaps(runner.head, runner_radius),
        }
    }

    /// Contact with any body segment (head included)
    pub fn collides_with_body(&self, runner: &Runner, runner_radius: f32) -> bool {
        runner
            .segments
            .iter()
            .any(|s| self.body_overlaps(*s, runner_radius))
    }

    /// Apply damage; returns true if this blow destroyed the entity
    pub fn damage(&mut self, amount: u32) -> bool {
        match &mut self.kind {
            EntityKind::Hunter { hp, .. } | EntityKind::Turret { hp, .. } => {
                if *hp == 0 {
                    return false;
                }
                *hp = hp.saturating_sub(amount);
                *hp == 0
            }
            _ => false,
        }
    }

    /// Expire a debuff or power-up immediately (pruned this tick)
    pub fn expire(&mut self) {
        match &mut self.kind {
            EntityKind::PowerUp { lifetime_ms, .. }
            | EntityKind::Virus { lifetime_ms, .. }
            | EntityKind::Blindness { lifetime_ms, .. } => *lifetime_ms = 0.0,
            _ => self.removed = true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunnerConfig;
    use crate::sim::runner::RunnerUpgrades;

    fn setup() -> (World, HostileConfig, Runner) {
        let world = World::new(1200.0, 800.0);
        let runner = Runner::new(
            Vec2::new(600.0, 400.0),
            &RunnerConfig::default(),
            RunnerUpgrades::default(),
        );
        (world, HostileConfig::default(), runner)
    }

    fn hunter(pos: Vec2) -> Entity {
        Entity::new(
            1,
            pos,
            10.0,
            EntityKind::Hunter {
                velocity: Vec2::ZERO,
                hp: 1,
            },
        )
    }

    fn turret(pos: Vec2) -> Entity {
        Entity::new(
            2,
            pos,
            15.0,
            EntityKind::Turret {
                hp: 3,
                fire_interval_ms: 2000.0,
                accumulated_ms: 0.0,
                projectiles: Vec::new(),
            },
        )
    }

    #[test]
    fn test_hunter_homes_on_head() {
        let (world, config, runner) = setup();
        let mut h = hunter(Vec2::new(500.0, 400.0));
        h.update(16.0, runner.head, false, &world, &config);
        assert!((h.pos.x - 502.0).abs() < 1e-4);

        h.update(16.0, runner.head, true, &world, &config);
        assert!((h.pos.x - 502.6).abs() < 1e-4);
    }

    #[test]
    fn test_hunter_dies_off_arena() {
        let (world, config, _) = setup();
        let mut h = hunter(Vec2::new(-49.0, 400.0));
        h.update(16.0, Vec2::new(-1000.0, 400.0), false, &world, &config);
        assert!(h.is_dead());
    }

    #[test]
    fn test_hunter_body_collision_any_segment() {
        let (_, _, mut runner) = setup();
        runner.segments = vec![runner.head, Vec2::new(600.0, 500.0)];
        let h = hunter(Vec2::new(605.0, 510.0));
        assert!(!h.collides_with_head(&runner, 12.0));
        assert!(h.collides_with_body(&runner, 12.0));
    }

    #[test]
    fn test_turret_fires_and_prunes() {
        let (world, config, runner) = setup();
        let mut t = turret(Vec2::new(600.0, 100.0));
        t.update(1999.0, runner.head, false, &world, &config);
        let EntityKind::Turret { projectiles, .. } = &t.kind else {
            unreachable!()
        };
        assert!(projectiles.is_empty());

        t.update(1.0, runner.head, false, &world, &config);
        let EntityKind::Turret { projectiles, .. } = &t.kind else {
            unreachable!()
        };
        assert_eq!(projectiles.len(), 1);
        // Aimed straight down at the head and already moved one step
        assert!((projectiles[0].pos.y - 105.0).abs() < 1e-3);

        // Flies until it leaves the arena (heading down, 700 px to go)
        for _ in 0..200 {
            t.update(1.0, runner.head, false, &world, &config);
        }
        let EntityKind::Turret { projectiles, .. } = &t.kind else {
            unreachable!()
        };
        assert!(projectiles.is_empty());
        assert!(!t.is_dead());
    }

    #[test]
    fn test_turret_slow_doubles_interval() {
        let (world, config, runner) = setup();
        let mut t = turret(Vec2::new(600.0, 100.0));
        t.update(2500.0, runner.head, true, &world, &config);
        let EntityKind::Turret { projectiles, .. } = &t.kind else {
            unreachable!()
        };
        assert!(projectiles.is_empty());
    }

    #[test]
    fn test_turret_projectile_hits_head() {
        let (_, _, runner) = setup();
        let mut t = turret(Vec2::new(100.0, 100.0));
        assert!(!t.collides_with_head(&runner, 12.0));
        if let EntityKind::Turret { projectiles, .. } = &mut t.kind {
            projectiles.push(Projectile {
                pos: Vec2::new(610.0, 400.0),
                heading: 0.0,
                radius: 4.0,
            });
        }
        assert!(t.collides_with_head(&runner, 12.0));
    }

    #[test]
    fn test_damage_reports_kill_once() {
        let mut t = turret(Vec2::ZERO);
        assert!(!t.damage(1));
        assert!(!t.damage(1));
        assert!(t.damage(1));
        assert!(!t.damage(1));
        assert!(t.is_dead());
    }

    #[test]
    fn test_timed_entities_expire() {
        let (world, config, runner) = setup();
        let mut v = Entity::new(
            3,
            Vec2::new(50.0, 50.0),
            12.0,
            EntityKind::Virus {
                lifetime_ms: 100.0,
                inversion_ms: 3000.0,
            },
        );
        v.update(99.0, runner.head, false, &world, &config);
        assert!(!v.is_dead());
        v.update(1.0, runner.head, false, &world, &config);
        assert!(v.is_dead());

        let mut b = Entity::new(
            4,
            Vec2::new(50.0, 50.0),
            12.0,
            EntityKind::Blindness {
                lifetime_ms: 15000.0,
                effect_ms: 5000.0,
            },
        );
        b.expire();
        assert!(b.is_dead());
    }

    #[test]
    fn test_food_never_dies() {
        let (world, config, runner) = setup();
        let mut f = Entity::new(5, Vec2::new(50.0, 50.0), 8.0, EntityKind::Food);
        f.update(1e9, runner.head, false, &world, &config);
        assert!(!f.is_dead());
    }
}
