//! Variable timestep simulation tick
//!
//! One call per frame. Order within a tick:
//! runner → spawner → entities (+ magneto, tail gun) → collisions → purge → clocks

use super::collision;
use super::entity::{EntityTag, Projectile};
use super::geom;
use super::progression;
use super::runner::EffectKind;
use super::spawner;
use super::state::GameState;

/// Abstract controls for a single tick (already corrected for inversion)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Rotate counter-clockwise
    pub left: bool,
    /// Rotate clockwise
    pub right: bool,
    /// Request a dash
    pub dash: bool,
}

/// Advance the game state by `dt_ms` of wall-clock time
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: f32) {
    // Paused or over: nothing moves, no timer runs
    if !state.is_playing() {
        return;
    }

    let dt_ms = dt_ms.max(0.0);
    let slow = state.runner.effects.is_active(EffectKind::TimeWarp);
    let local_dt = if slow {
        dt_ms * state.config.powerups.time_warp_factor
    } else {
        dt_ms
    };

    let bonus = progression::level_speed_bonus(&state.run, &state.config.progression);
    state
        .runner
        .update(local_dt, input, bonus, &state.config.runner, &state.world);

    spawner::update(state, dt_ms);

    let head = state.runner.head;
    for entity in state.entities.iter_mut() {
        entity.update(local_dt, head, slow, &state.world, &state.config.hostiles);
    }

    if state.runner.effects.is_active(EffectKind::Magneto) {
        pull_food(state);
    }
    update_tail_gun(state, local_dt);

    collision::resolve(state);

    state.entities.retain(|e| !e.is_dead());
    progression::advance_clock(&mut state.run, dt_ms);
    state.time_ticks += 1;
}

/// Magneto: drag nearby food toward the head
fn pull_food(state: &mut GameState) {
    let head = state.runner.head;
    let cfg = &state.config.powerups;
    for food in state
        .entities
        .iter_mut()
        .filter(|e| e.tag() == EntityTag::Food)
    {
        if food.pos.distance(head) < cfg.magneto_radius {
            food.pos += geom::direction(food.pos, head) * cfg.magneto_pull;
        }
    }
}

/// Fire from the tail on cooldown, then move shots already in flight
fn update_tail_gun(state: &mut GameState, dt_ms: f32) {
    let interval = state.config.gun.fire_interval_ms;
    let effects = &mut state.runner.effects;
    if effects.is_active(EffectKind::TailGun) {
        effects.tail_gun_cooldown_ms -= dt_ms;
        if effects.tail_gun_cooldown_ms <= 0.0 {
            // Reset even with nothing to shoot at
            effects.tail_gun_cooldown_ms = interval;
            fire_tail_gun(state);
        }
    }

    let speed = state.config.gun.projectile_speed;
    let world = state.world;
    for shot in state.shots.iter_mut() {
        shot.advance(speed);
    }
    state.shots.retain(|s| world.contains_open(s.pos));
}

/// Aim at the nearest damageable hostile within range of the tail
fn fire_tail_gun(state: &mut GameState) {
    if state.runner.segments.len() < 2 {
        return;
    }
    let Some(tail) = state.runner.tail() else {
        return;
    };
    let gun = &state.config.gun;

    let target = state
        .entities
        .iter()
        .filter(|e| e.hp().is_some() && !e.is_dead())
        .map(|e| (e.pos, e.pos.distance(tail)))
        .filter(|(_, d)| *d < gun.range)
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

    if let Some((pos, _)) = target {
        state.shots.push(Projectile {
            pos: tail,
            heading: geom::heading_to(tail, pos),
            radius: gun.projectile_radius,
        });
    }
}
