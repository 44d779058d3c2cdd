//! Read-only views for an external renderer
//!
//! Captured after a tick. Everything is plain data and serializes to JSON for
//! the browser side.

use glam::Vec2;
use serde::Serialize;

use crate::sim::{
    EffectKind, Entity, EntityKind, EntityTag, GamePhase, GameState, PowerUpKind, World,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EffectView {
    pub kind: EffectKind,
    pub remaining_ms: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunnerView {
    pub head: Vec2,
    pub heading: f32,
    pub segments: Vec<Vec2>,
    pub length: u32,
    pub dash_energy: f32,
    pub dashing: bool,
    pub invulnerable: bool,
    pub effects: Vec<EffectView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityView {
    pub id: u32,
    pub tag: EntityTag,
    pub pos: Vec2,
    pub radius: f32,
    /// Hunters and turrets
    pub hp: Option<u32>,
    /// Power-up pickups
    pub powerup: Option<PowerUpKind>,
    /// Turret shots in flight
    pub projectiles: Vec<Vec2>,
}

impl EntityView {
    fn from_entity(entity: &Entity) -> Self {
        let (powerup, projectiles) = match &entity.kind {
            EntityKind::PowerUp { kind, .. } => (Some(*kind), Vec::new()),
            EntityKind::Turret { projectiles, .. } => {
                (None, projectiles.iter().map(|p| p.pos).collect())
            }
            _ => (None, Vec::new()),
        };
        Self {
            id: entity.id,
            tag: entity.tag(),
            pos: entity.pos,
            radius: entity.radius,
            hp: entity.hp(),
            powerup,
            projectiles,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunView {
    pub phase: GamePhase,
    pub score: u64,
    pub level: u32,
    pub hard_mode: bool,
    pub elapsed_ms: f64,
    pub kills: u32,
    pub coins_earned: u64,
    pub controls_inverted_ms: f32,
    pub vision_impaired_ms: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSnapshot {
    pub world: World,
    pub skin: String,
    pub runner: RunnerView,
    /// Live entities only
    pub entities: Vec<EntityView>,
    /// Tail gun shots
    pub shots: Vec<Vec2>,
    pub run: RunView,
}

impl RenderSnapshot {
    pub fn capture(state: &GameState, skin: &str) -> Self {
        let runner = &state.runner;
        let effects = runner
            .effects
            .active_kinds()
            .into_iter()
            .map(|kind| EffectView {
                kind,
                remaining_ms: runner.effects.get(kind).remaining_ms,
            })
            .collect();

        Self {
            world: state.world,
            skin: skin.to_string(),
            runner: RunnerView {
                head: runner.head,
                heading: runner.heading,
                segments: runner.segments.clone(),
                length: runner.length,
                dash_energy: runner.dash_energy,
                dashing: runner.is_dashing(),
                invulnerable: runner.is_invulnerable(),
                effects,
            },
            entities: state
                .entities
                .iter()
                .filter(|e| !e.is_dead())
                .map(EntityView::from_entity)
                .collect(),
            shots: state.shots.iter().map(|s| s.pos).collect(),
            run: RunView {
                phase: state.phase,
                score: state.run.score,
                level: state.run.level,
                hard_mode: state.run.is_hard_mode(),
                elapsed_ms: state.run.elapsed_ms,
                kills: state.run.kills,
                coins_earned: state.run.coins_earned,
                controls_inverted_ms: state.run.controls_inverted_ms,
                vision_impaired_ms: runner.effects.get(EffectKind::VisionImpair).remaining_ms,
            },
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::{Projectile, RunLoadout};

    #[test]
    fn test_capture_reflects_state() {
        let mut state = GameState::new(GameConfig::default(), RunLoadout::default(), 3);
        state.runner.activate_effect(EffectKind::Shield, 2000.0);
        let id = state.next_entity_id();
        state.entities.push(Entity::new(
            id,
            Vec2::new(300.0, 300.0),
            15.0,
            EntityKind::Turret {
                hp: 2,
                fire_interval_ms: 2000.0,
                accumulated_ms: 0.0,
                projectiles: vec![Projectile {
                    pos: Vec2::new(310.0, 300.0),
                    heading: 0.0,
                    radius: 4.0,
                }],
            },
        ));

        let snap = RenderSnapshot::capture(&state, "fire");
        assert_eq!(snap.skin, "fire");
        assert_eq!(snap.entities.len(), 2);
        assert_eq!(snap.entities[1].hp, Some(2));
        assert_eq!(snap.entities[1].projectiles, vec![Vec2::new(310.0, 300.0)]);
        assert_eq!(
            snap.runner.effects,
            vec![EffectView {
                kind: EffectKind::Shield,
                remaining_ms: 2000.0
            }]
        );
        assert_eq!(snap.run.phase, GamePhase::Playing);
    }

    #[test]
    fn test_json_export() {
        let state = GameState::new(GameConfig::default(), RunLoadout::default(), 3);
        let json = RenderSnapshot::capture(&state, "default").to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["run"]["level"], 1);
        assert_eq!(value["entities"][0]["tag"], "Food");
        assert_eq!(value["runner"]["length"], 5);
    }
}
