//! Score, level and difficulty state machine
//!
//! `Ramping` levels up every `level * level_up_score` points. Crossing the
//! threshold from the level just below `hard_mode_level` moves the run into
//! `HardMode`, which is terminal for the run: the level freezes while score
//! and coin yield per pickup increase.

use serde::{Deserialize, Serialize};

use super::state::{GameEvent, RunState};
use crate::config::ProgressionConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    /// Normal leveling
    Ramping,
    /// Level frozen, boosted yield, faster spawns
    HardMode,
}

/// Extra runner speed granted by the current level
pub fn level_speed_bonus(run: &RunState, config: &ProgressionConfig) -> f32 {
    run.level.saturating_sub(1) as f32 * config.speed_increase_per_level
}

/// Score and coins for one food pickup, then evaluate a level transition
pub fn award_food(run: &mut RunState, config: &ProgressionConfig, events: &mut Vec<GameEvent>) {
    let (score_mult, coin_mult) = if run.is_hard_mode() {
        (
            config.hard_mode_score_multiplier,
            config.hard_mode_coin_multiplier,
        )
    } else {
        (1.0, 1.0)
    };
    run.score += scaled(config.food_value, score_mult);
    run.credit_coins(scaled(config.coin_value, coin_mult));

    evaluate_level(run, config, events);
}

fn scaled(value: u64, multiplier: f32) -> u64 {
    (value as f64 * multiplier as f64).round() as u64
}

/// Apply at most one level transition for the current score
pub fn evaluate_level(run: &mut RunState, config: &ProgressionConfig, events: &mut Vec<GameEvent>) {
    if run.is_hard_mode() || run.score < run.level as u64 * config.level_up_score {
        return;
    }

    run.level += 1;

    if run.level == config.hard_mode_level {
        run.difficulty = Difficulty::HardMode;
        run.best_level = run.best_level.max(run.level);
        let bonus = if run.hard_mode_bonus_given {
            0
        } else {
            run.hard_mode_bonus_given = true;
            run.credit_coins(config.hard_mode_bonus);
            config.hard_mode_bonus
        };
        log::info!("HARD MODE at level {} (+{} coins)", run.level, bonus);
        events.push(GameEvent::HardModeEntered {
            level: run.level,
            bonus,
        });
        return;
    }

    log::info!("Level up: {}", run.level);
    events.push(GameEvent::LevelUp { level: run.level });

    if run.level > run.best_level {
        run.best_level = run.level;
        run.credit_coins(config.new_level_bonus);
        events.push(GameEvent::NewBestLevel {
            level: run.level,
            bonus: config.new_level_bonus,
        });
    }
}

/// Advance run time and the controls-inverted debuff
pub fn advance_clock(run: &mut RunState, dt_ms: f32) {
    run.elapsed_ms += dt_ms as f64;
    if run.controls_inverted_ms > 0.0 {
        run.controls_inverted_ms = (run.controls_inverted_ms - dt_ms).max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn eat(run: &mut RunState, config: &ProgressionConfig, n: usize) -> Vec<GameEvent> {
        let mut events = Vec::new();
        for _ in 0..n {
            award_food(run, config, &mut events);
        }
        events
    }

    #[test]
    fn test_ten_food_one_level() {
        let config = ProgressionConfig::default();
        let mut run = RunState::new(5);
        let events = eat(&mut run, &config, 10);
        assert_eq!(run.score, 100);
        assert_eq!(run.level, 2);
        assert_eq!(events, vec![GameEvent::LevelUp { level: 2 }]);
        assert_eq!(run.coins_earned, 10);
    }

    #[test]
    fn test_new_best_level_bonus_once() {
        let config = ProgressionConfig::default();
        let mut run = RunState::new(1);
        let events = eat(&mut run, &config, 10);
        assert!(events.contains(&GameEvent::NewBestLevel {
            level: 2,
            bonus: 50
        }));
        assert_eq!(run.best_level, 2);
        assert_eq!(run.coins_earned, 60);

        // A later run with the raised best level gets no bonus for level 2
        let mut run = RunState::new(2);
        let events = eat(&mut run, &config, 10);
        assert_eq!(events, vec![GameEvent::LevelUp { level: 2 }]);
    }

    #[test]
    fn test_enters_hard_mode() {
        let config = ProgressionConfig::default();
        let mut run = RunState::new(20);
        run.level = 9;
        run.score = 890;
        let mut events = Vec::new();
        award_food(&mut run, &config, &mut events);
        assert_eq!(run.level, 10);
        assert!(run.is_hard_mode());
        assert!(run.hard_mode_bonus_given);
        assert_eq!(
            events,
            vec![GameEvent::HardModeEntered {
                level: 10,
                bonus: 100
            }]
        );
        // 1 coin for food + 100 bonus
        assert_eq!(run.coins_earned, 101);
    }

    #[test]
    fn test_hard_mode_yield_and_frozen_level() {
        let config = ProgressionConfig::default();
        let mut run = RunState::new(20);
        run.level = 10;
        run.score = 5000;
        run.difficulty = Difficulty::HardMode;
        let events = eat(&mut run, &config, 4);
        assert!(events.is_empty());
        assert_eq!(run.level, 10);
        assert_eq!(run.score, 5060);
        assert_eq!(run.coins_earned, 8);
    }

    #[test]
    fn test_speed_bonus() {
        let config = ProgressionConfig::default();
        let mut run = RunState::new(0);
        assert_eq!(level_speed_bonus(&run, &config), 0.0);
        run.level = 3;
        assert!((level_speed_bonus(&run, &config) - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_clock_and_inversion() {
        let mut run = RunState::new(0);
        run.controls_inverted_ms = 100.0;
        advance_clock(&mut run, 60.0);
        assert!(run.controls_inverted());
        advance_clock(&mut run, 60.0);
        assert!(!run.controls_inverted());
        assert_eq!(run.elapsed_ms, 120.0);
    }

    proptest! {
        #[test]
        fn prop_hard_mode_is_monotonic(pickups in 1usize..400) {
            let config = ProgressionConfig::default();
            let mut run = RunState::new(0);
            let mut events = Vec::new();
            let mut entered_at: Option<u32> = None;
            for _ in 0..pickups {
                award_food(&mut run, &config, &mut events);
                if let Some(level) = entered_at {
                    prop_assert!(run.is_hard_mode());
                    prop_assert_eq!(run.level, level);
                } else if run.is_hard_mode() {
                    entered_at = Some(run.level);
                }
            }
        }
    }
}
