//! Timed creation of power-ups and hostiles
//!
//! Two independent accumulators fed by the raw tick delta. The hostile
//! interval shrinks linearly with level and again in hard mode.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityKind, EntityTag, PowerUpKind};
use super::geom;
use super::state::{GameState, RunLoadout};
use crate::config::{PowerUpConfig, SpawnConfig};

/// Spawn accumulators
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SpawnTimers {
    pub powerup_ms: f32,
    pub hostile_ms: f32,
}

/// Run both spawn schedules for one tick
pub fn update(state: &mut GameState, dt_ms: f32) {
    state.spawn_timers.powerup_ms += dt_ms;
    if state.spawn_timers.powerup_ms > state.config.spawn.powerup_spawn_interval_ms
        && state.count(EntityTag::PowerUp) < state.config.spawn.max_powerups
    {
        spawn_powerup(state);
        state.spawn_timers.powerup_ms = 0.0;
    }

    state.spawn_timers.hostile_ms += dt_ms;
    let interval = hostile_interval(
        state.run.level,
        state.run.is_hard_mode(),
        &state.config.spawn,
    );
    if state.spawn_timers.hostile_ms > interval {
        spawn_hostile(state);
        if state.run.is_hard_mode()
            && state
                .rng
                .random_bool(state.config.spawn.hard_mode_extra_spawn_chance)
        {
            spawn_hostile(state);
        }
        state.spawn_timers.hostile_ms = 0.0;
    }
}

/// Hostile spawn interval for a level
pub fn hostile_interval(level: u32, hard_mode: bool, config: &SpawnConfig) -> f32 {
    let mult = if hard_mode {
        config.hard_mode_spawn_multiplier
    } else {
        1.0
    };
    config.enemy_spawn_interval_ms / (level.max(1) as f32 * mult)
}

/// Enabled power-up kinds with their draw weights
pub fn powerup_weights(loadout: &RunLoadout, config: &PowerUpConfig) -> Vec<(PowerUpKind, f32)> {
    let mut table = vec![
        (PowerUpKind::Ghost, 1.0),
        (PowerUpKind::TimeWarp, 1.0),
        (PowerUpKind::Magneto, 1.0),
        (PowerUpKind::TailGun, 1.0),
        (
            PowerUpKind::CutTail,
            1.0 + loadout.explosion_boost as f32 * config.explosion_boost_step,
        ),
    ];
    if loadout.shield_spawner {
        table.push((PowerUpKind::Shield, 1.0));
    }
    table
}

/// Pick from a weight table with `roll` in `[0, 1)`
fn pick_weighted<T: Copy>(table: &[(T, f32)], roll: f32) -> Option<T> {
    let total: f32 = table.iter().map(|(_, w)| w).sum();
    if total <= 0.0 {
        return None;
    }
    let mut x = roll.clamp(0.0, 1.0) * total;
    for &(item, weight) in table {
        if x < weight {
            return Some(item);
        }
        x -= weight;
    }
    // Float slack at roll ~1.0
    table.iter().rev().find(|(_, w)| *w > 0.0).map(|(item, _)| *item)
}

/// Hostile archetype for `roll` in `[0, 1)`.
///
/// Below the turret level, the turret bracket falls through to hunters.
pub fn choose_hostile(roll: f32, level: u32, config: &SpawnConfig) -> EntityTag {
    let w = &config.hostile_weights;
    let (hunter, turret) = if level >= config.min_level_for_turrets {
        (w.hunter, w.turret)
    } else {
        (w.hunter + w.turret, 0.0)
    };
    let table = [
        (EntityTag::Hunter, hunter),
        (EntityTag::Turret, turret),
        (EntityTag::Virus, w.virus),
        (EntityTag::Blindness, w.blindness),
    ];
    pick_weighted(&table, roll).unwrap_or(EntityTag::Hunter)
}

pub fn spawn_powerup(state: &mut GameState) {
    let table = powerup_weights(&state.loadout, &state.config.powerups);
    let roll = state.rng.random::<f32>();
    let Some(kind) = pick_weighted(&table, roll) else {
        return;
    };

    let pos = state.random_interior_point();
    let id = state.next_entity_id();
    let cfg = &state.config.powerups;
    state.entities.push(Entity::new(
        id,
        pos,
        cfg.radius,
        EntityKind::PowerUp {
            kind,
            lifetime_ms: cfg.lifetime_ms,
        },
    ));
    log::debug!("Spawned power-up {:?} at ({:.0}, {:.0})", kind, pos.x, pos.y);
}

pub fn spawn_hostile(state: &mut GameState) {
    let roll = state.rng.random::<f32>();
    let tag = choose_hostile(roll, state.run.level, &state.config.spawn);
    spawn_kind(state, tag);
}

/// Spawn a specific hostile archetype at its usual spawn location
pub fn spawn_kind(state: &mut GameState, tag: EntityTag) {
    let id = state.next_entity_id();
    let world = state.world;
    let h = state.config.hostiles.clone();

    let entity = match tag {
        EntityTag::Hunter => {
            let x = if state.rng.random_bool(0.5) {
                -h.hunter_spawn_offset
            } else {
                world.width + h.hunter_spawn_offset
            };
            let y = geom::random_between(&mut state.rng, 0.0, world.height);
            Entity::new(
                id,
                Vec2::new(x, y),
                h.hunter_radius,
                EntityKind::Hunter {
                    velocity: Vec2::ZERO,
                    hp: h.hunter_hp,
                },
            )
        }
        EntityTag::Turret => {
            let pos =
                geom::random_interior(&mut state.rng, world.width, world.height, h.turret_margin);
            Entity::new(
                id,
                pos,
                h.turret_radius,
                EntityKind::Turret {
                    hp: h.turret_hp,
                    fire_interval_ms: h.turret_fire_interval_ms,
                    accumulated_ms: 0.0,
                    projectiles: Vec::new(),
                },
            )
        }
        EntityTag::Virus => Entity::new(
            id,
            state.random_interior_point(),
            h.virus_radius,
            EntityKind::Virus {
                lifetime_ms: h.virus_lifetime_ms,
                inversion_ms: h.virus_inversion_ms,
            },
        ),
        EntityTag::Blindness => Entity::new(
            id,
            state.random_interior_point(),
            h.blindness_radius,
            EntityKind::Blindness {
                lifetime_ms: h.blindness_lifetime_ms,
                effect_ms: h.blindness_effect_ms,
            },
        ),
        EntityTag::Food | EntityTag::PowerUp => {
            log::warn!("spawn_kind called with non-hostile {:?}", tag);
            return;
        }
    };

    log::debug!(
        "Spawned {:?} at ({:.0}, {:.0})",
        tag,
        entity.pos.x,
        entity.pos.y
    );
    state.entities.push(entity);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::progression::Difficulty;

    fn state() -> GameState {
        GameState::new(GameConfig::default(), RunLoadout::default(), 9)
    }

    #[test]
    fn test_hostile_interval_scaling() {
        let config = SpawnConfig::default();
        assert_eq!(hostile_interval(1, false, &config), 5000.0);
        assert_eq!(hostile_interval(5, false, &config), 1000.0);
        assert_eq!(hostile_interval(5, true, &config), 500.0);
        assert_eq!(hostile_interval(0, false, &config), 5000.0);
    }

    #[test]
    fn test_turret_excluded_below_min_level() {
        let config = SpawnConfig::default();
        // 0.6 lands in the turret bracket once turrets are allowed
        assert_eq!(choose_hostile(0.6, 2, &config), EntityTag::Turret);
        assert_eq!(choose_hostile(0.6, 1, &config), EntityTag::Hunter);
        assert_eq!(choose_hostile(0.0, 1, &config), EntityTag::Hunter);
        assert_eq!(choose_hostile(0.85, 1, &config), EntityTag::Virus);
        assert_eq!(choose_hostile(0.95, 5, &config), EntityTag::Blindness);
        assert_eq!(choose_hostile(1.0, 5, &config), EntityTag::Blindness);
    }

    #[test]
    fn test_shield_only_when_unlocked() {
        let config = PowerUpConfig::default();
        let mut loadout = RunLoadout::default();
        assert!(
            !powerup_weights(&loadout, &config)
                .iter()
                .any(|(k, _)| *k == PowerUpKind::Shield)
        );
        loadout.shield_spawner = true;
        assert!(
            powerup_weights(&loadout, &config)
                .iter()
                .any(|(k, _)| *k == PowerUpKind::Shield)
        );
    }

    #[test]
    fn test_explosion_boost_weight() {
        let config = PowerUpConfig::default();
        let loadout = RunLoadout {
            explosion_boost: 3,
            ..Default::default()
        };
        let table = powerup_weights(&loadout, &config);
        let (_, w) = table
            .iter()
            .find(|(k, _)| *k == PowerUpKind::CutTail)
            .copied()
            .unwrap();
        assert!((w - 1.3).abs() < 1e-6);
    }

    #[test]
    fn test_powerup_spawn_respects_cap() {
        let mut s = state();
        update(&mut s, 15001.0);
        assert_eq!(s.count(EntityTag::PowerUp), 1);
        update(&mut s, 15001.0);
        assert_eq!(s.count(EntityTag::PowerUp), 2);
        update(&mut s, 15001.0);
        assert_eq!(s.count(EntityTag::PowerUp), 2);
        // Accumulator keeps running while capped
        assert!(s.spawn_timers.powerup_ms > 15000.0);
    }

    #[test]
    fn test_hostile_spawn_after_interval() {
        let mut s = state();
        update(&mut s, 4999.0);
        assert_eq!(s.entities.len(), 1);
        update(&mut s, 2.0);
        assert_eq!(s.entities.len(), 2);
        assert_eq!(s.spawn_timers.hostile_ms, 0.0);
        let tag = s.entities[1].tag();
        assert!(tag.is_hostile());
        // Level 1 never spawns turrets
        assert_ne!(tag, EntityTag::Turret);
    }

    fn hard_mode_state(extra_chance: f64) -> GameState {
        let mut config = GameConfig::default();
        config.spawn.hard_mode_extra_spawn_chance = extra_chance;
        let mut s = GameState::new(config, RunLoadout::default(), 9);
        s.run.level = 10;
        s.run.difficulty = Difficulty::HardMode;
        s
    }

    #[test]
    fn test_hard_mode_extra_spawn() {
        // Level 10 in hard mode: 5000 / (10 * 2) = 250 ms
        let mut s = hard_mode_state(1.0);
        update(&mut s, 249.0);
        assert_eq!(s.entities.len(), 1);
        update(&mut s, 2.0);
        assert_eq!(s.entities.len(), 3);
        assert!(s.entities[1..].iter().all(|e| e.tag().is_hostile()));

        let mut s = hard_mode_state(0.0);
        update(&mut s, 251.0);
        assert_eq!(s.entities.len(), 2);
    }

    #[test]
    fn test_out_of_range_extra_chance_does_not_panic() {
        let mut s = hard_mode_state(7.5);
        update(&mut s, 251.0);
        assert_eq!(s.entities.len(), 3);
    }

    #[test]
    fn test_hunter_spawns_outside_horizontal_edge() {
        let mut s = state();
        for _ in 0..20 {
            spawn_kind(&mut s, EntityTag::Hunter);
        }
        for e in s.entities.iter().filter(|e| e.tag() == EntityTag::Hunter) {
            assert!(e.pos.x == -20.0 || e.pos.x == 1220.0);
            assert!((0.0..=800.0).contains(&e.pos.y));
        }
    }

    #[test]
    fn test_turret_spawns_inside_margin() {
        let mut s = state();
        for _ in 0..20 {
            spawn_kind(&mut s, EntityTag::Turret);
        }
        for e in s.entities.iter().filter(|e| e.tag() == EntityTag::Turret) {
            assert!((100.0..=1100.0).contains(&e.pos.x));
            assert!((100.0..=700.0).contains(&e.pos.y));
        }
    }
}
