//! Collision resolution between the runner and the arena
//!
//! Runs once per tick after every entity has moved. Rules are evaluated per
//! entity in a fixed order and several may fire for the same entity:
//!
//! 1. Virus/Blindness touching the head apply their debuff and expire
//! 2. Hunter body or turret projectile on the head ends the run unless protected
//! 3. Turret body on the head ends the run (ignores dash invulnerability and shield)
//! 4. Turret body on the head while ghosted damages the turret instead
//! 5. Hunter touching any segment is destroyed, trimming the body unless ghosted
//! 6. Food on the head scores, grows and respawns
//! 7. Power-up on the head activates its effect or cuts the tail
//!
//! The first run-ending rule stops resolution for the tick.

use super::entity::{EntityKind, EntityTag, PowerUpKind};
use super::progression;
use super::runner::EffectKind;
use super::state::{GameEvent, GameOverCause, GameState};

/// Damage a ghosted head deals to a turret per tick of contact
const GHOST_TURRET_DAMAGE: u32 = 1;

/// Resolve all runner contacts for this tick
pub fn resolve(state: &mut GameState) {
    if !state.is_playing() {
        return;
    }

    if state.runner.self_collides(state.config.runner.segment_size) {
        state.end_run(GameOverCause::SelfCollision);
        return;
    }

    for index in 0..state.entities.len() {
        if state.entities[index].is_dead() {
            continue;
        }
        if let Some(cause) = resolve_entity(state, index) {
            state.end_run(cause);
            return;
        }
    }

    resolve_shots(state);
}

/// Apply every rule to one entity; returns the cause if the run ends
fn resolve_entity(state: &mut GameState, index: usize) -> Option<GameOverCause> {
    let radius = state.config.runner.segment_size;
    let ghost = state.runner.effects.is_active(EffectKind::Ghost);
    let protected = state.runner.is_protected();
    let entity = &state.entities[index];
    let head_contact = entity.collides_with_head(&state.runner, radius);

    match entity.tag() {
        EntityTag::Virus | EntityTag::Blindness => {
            if head_contact {
                apply_debuff(state, index);
            }
        }
        EntityTag::Hunter => {
            if head_contact && !protected {
                return Some(GameOverCause::HunterContact);
            }
            if entity.collides_with_body(&state.runner, radius) {
                run_over_hunter(state, index, ghost);
            }
        }
        EntityTag::Turret => {
            if head_contact && !protected {
                return Some(GameOverCause::TurretShot);
            }
            if entity.body_overlaps(state.runner.head, radius) {
                if !ghost {
                    return Some(GameOverCause::TurretContact);
                }
                let (x, y) = (entity.pos.x, entity.pos.y);
                if state.entities[index].damage(GHOST_TURRET_DAMAGE) {
                    record_kill(state, EntityTag::Turret, x, y);
                }
            }
        }
        EntityTag::Food => {
            if head_contact {
                eat_food(state, index);
            }
        }
        EntityTag::PowerUp => {
            if head_contact {
                collect_powerup(state, index);
            }
        }
    }

    None
}

fn apply_debuff(state: &mut GameState, index: usize) {
    let entity = &mut state.entities[index];
    match entity.kind {
        EntityKind::Virus { inversion_ms, .. } => {
            state.run.controls_inverted_ms = inversion_ms;
            state.events.push(GameEvent::ControlsInverted {
                duration_ms: inversion_ms,
            });
        }
        EntityKind::Blindness { effect_ms, .. } => {
            state
                .runner
                .activate_effect(EffectKind::VisionImpair, effect_ms);
            state.events.push(GameEvent::VisionImpaired {
                duration_ms: effect_ms,
            });
        }
        _ => return,
    }
    entity.expire();
}

fn run_over_hunter(state: &mut GameState, index: usize, ghost: bool) {
    if !ghost {
        state.runner.cut(state.config.hostiles.hunter_trim_fraction);
    }
    let entity = &mut state.entities[index];
    let (x, y) = (entity.pos.x, entity.pos.y);
    entity.removed = true;
    record_kill(state, EntityTag::Hunter, x, y);
}

fn record_kill(state: &mut GameState, tag: EntityTag, x: f32, y: f32) {
    state.run.kills += 1;
    state.events.push(GameEvent::EnemyKilled { tag, x, y });
}

fn eat_food(state: &mut GameState, index: usize) {
    let eaten_at = state.entities[index].pos;
    progression::award_food(
        &mut state.run,
        &state.config.progression,
        &mut state.events,
    );
    state.runner.grow(state.config.runner.food_growth);
    state.entities[index].pos = state.random_interior_point();
    state.events.push(GameEvent::FoodEaten {
        x: eaten_at.x,
        y: eaten_at.y,
    });
}

fn collect_powerup(state: &mut GameState, index: usize) {
    let EntityKind::PowerUp { kind, .. } = state.entities[index].kind else {
        return;
    };
    state.entities[index].expire();
    state.events.push(GameEvent::PowerUpCollected { kind });

    match kind.effect() {
        Some(effect) => {
            let tier = state.loadout.effect_levels.get(effect);
            let duration = state.config.powerups.duration(effect, tier);
            state.runner.activate_effect(effect, duration);
            if kind == PowerUpKind::TailGun {
                // First shot after one full interval
                state.runner.effects.tail_gun_cooldown_ms = state.config.gun.fire_interval_ms;
            }
            log::debug!("{} active for {:.0} ms", effect.as_str(), duration);
        }
        None => cut_tail(state),
    }
}

/// Trim the body and clear every hostile in the arena
fn cut_tail(state: &mut GameState) {
    state.runner.cut(state.config.powerups.cut_tail_fraction);
    let mut cleared = 0;
    for entity in state.entities.iter_mut() {
        if entity.tag().is_hostile() && !entity.is_dead() {
            entity.removed = true;
            cleared += 1;
        }
    }
    log::debug!("Cut tail: length {}, {} hostiles cleared", state.runner.length, cleared);
    state.events.push(GameEvent::ScreenShake);
}

/// Tail-gun projectiles against hp-bearing hostiles.
///
/// A projectile is consumed by the first live target it touches.
pub fn resolve_shots(state: &mut GameState) {
    let damage = state.config.gun.damage;
    let mut kills = Vec::new();

    let GameState { shots, entities, .. } = state;
    shots.retain(|shot| {
        let target = entities
            .iter_mut()
            .filter(|e| e.hp().is_some() && !e.is_dead())
            .find(|e| e.body_overlaps(shot.pos, shot.radius));
        match target {
            Some(entity) => {
                if entity.damage(damage) {
                    kills.push((entity.tag(), entity.pos.x, entity.pos.y));
                }
                false
            }
            None => true,
        }
    });

    for (tag, x, y) in kills {
        record_kill(state, tag, x, y);
    }
}
