//! Demo autopilot
//!
//! Produces raw controls for attract mode and the headless binary. Flees the
//! nearest hostile inside the danger radius, otherwise chases the nearest
//! food (or pickup). Ignores wrap-around when measuring distances.

use std::f32::consts::{PI, TAU};

use glam::Vec2;

use crate::consts::DASH_ENERGY_MAX;
use crate::platform::RawInput;
use crate::sim::{EntityTag, GameState, geom};

#[derive(Debug, Clone, Copy)]
pub struct Autopilot {
    /// Hostiles closer than this are fled from
    pub danger_radius: f32,
    /// Hostiles closer than this trigger a dash
    pub dash_radius: f32,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self {
            danger_radius: 120.0,
            dash_radius: 50.0,
        }
    }
}

impl Autopilot {
    /// Raw controls for the current state. Already accounts for inverted
    /// controls, so the result goes through `RawInput::resolve` as usual.
    pub fn steer(&self, state: &GameState) -> RawInput {
        let runner = &state.runner;
        let head = runner.head;

        let threat = nearest(state, head, |tag| tag.is_hostile())
            .filter(|(_, dist)| *dist < self.danger_radius);

        let (desired, dash) = match threat {
            Some((pos, dist)) => (
                Some(geom::heading_to(pos, head)),
                dist < self.dash_radius && runner.dash_energy >= DASH_ENERGY_MAX,
            ),
            None => {
                let target = nearest(state, head, |tag| tag == EntityTag::Food)
                    .or_else(|| nearest(state, head, |tag| tag == EntityTag::PowerUp));
                (target.map(|(pos, _)| geom::heading_to(head, pos)), false)
            }
        };

        let mut input = RawInput {
            dash,
            ..RawInput::default()
        };
        if let Some(desired) = desired {
            let diff = angle_diff(runner.heading, desired);
            let deadband = state.config.runner.rotation_speed * 0.5;
            if diff > deadband {
                input.right = true;
            } else if diff < -deadband {
                input.left = true;
            }
        }

        if state.run.controls_inverted() {
            std::mem::swap(&mut input.left, &mut input.right);
        }
        input
    }
}

/// Position and distance of the closest live entity whose tag matches
fn nearest(
    state: &GameState,
    from: Vec2,
    matches: impl Fn(EntityTag) -> bool,
) -> Option<(Vec2, f32)> {
    state
        .entities
        .iter()
        .filter(|e| !e.is_dead() && matches(e.tag()))
        .map(|e| (e.pos, e.pos.distance(from)))
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
}

/// Signed shortest rotation from `from` to `to`, in `[-PI, PI)`
fn angle_diff(from: f32, to: f32) -> f32 {
    (to - from + PI).rem_euclid(TAU) - PI
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::{Entity, EntityKind, RunLoadout};

    fn state_with_food(offset: Vec2) -> GameState {
        let mut state = GameState::new(GameConfig::default(), RunLoadout::default(), 9);
        let head = state.runner.head;
        state.entities[0].pos = head + offset;
        state
    }

    #[test]
    fn test_angle_diff_wraps() {
        assert!((angle_diff(0.1, TAU - 0.1) + 0.2).abs() < 1e-4);
        assert!((angle_diff(-3.0, 3.0) - (6.0 - TAU)).abs() < 1e-4);
    }

    #[test]
    fn test_turns_toward_food() {
        // Heading 0 points along +x; +y is a clockwise (right) turn
        let state = state_with_food(Vec2::new(0.0, 100.0));
        let input = Autopilot::default().steer(&state);
        assert!(input.right && !input.left && !input.dash);

        let state = state_with_food(Vec2::new(0.0, -100.0));
        assert!(Autopilot::default().steer(&state).left);
    }

    #[test]
    fn test_straight_ahead_holds_course() {
        let state = state_with_food(Vec2::new(200.0, 0.0));
        assert_eq!(Autopilot::default().steer(&state), RawInput::default());
    }

    #[test]
    fn test_flees_and_dashes_from_close_hostile() {
        let mut state = state_with_food(Vec2::new(200.0, 0.0));
        let head = state.runner.head;
        let id = state.next_entity_id();
        state.entities.push(Entity::new(
            id,
            head + Vec2::new(30.0, 5.0),
            15.0,
            EntityKind::Hunter {
                velocity: Vec2::ZERO,
                hp: 1,
            },
        ));
        let input = Autopilot::default().steer(&state);
        assert!(input.dash);
        // Hostile is ahead and slightly clockwise, so turn away counter-clockwise
        assert!(input.left);
    }

    #[test]
    fn test_inverted_controls_pre_swapped() {
        let mut state = state_with_food(Vec2::new(0.0, 100.0));
        state.run.controls_inverted_ms = 1000.0;
        let raw = Autopilot::default().steer(&state);
        assert!(raw.left && !raw.right);
        let resolved = raw.resolve(state.run.controls_inverted());
        assert!(resolved.right);
    }
}
