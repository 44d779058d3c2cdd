//! Cross-run progression ledger
//!
//! Folds finished runs into lifetime stats, completes missions and keeps the
//! set of unlocked skins. Mission completion is monotonic and every reward is
//! granted at most once.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::persistence::{self, KeyValueStore, keys};
use crate::skins::DEFAULT_SKIN;

/// Lifetime statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stats {
    pub games_played: u32,
    pub max_level: u32,
    pub max_score: u64,
    /// Longest single run
    pub longest_run_ms: u64,
    pub total_coins_earned: u64,
    pub total_kills: u64,
}

/// What a finished run contributes to the ledger
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub level: u32,
    pub score: u64,
    pub duration_ms: u64,
    pub coins_earned: u64,
    pub kills: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MissionId {
    #[serde(rename = "reach_level_10")]
    ReachLevel10,
    #[serde(rename = "score_10000")]
    Score10000,
    #[serde(rename = "survive_5min")]
    Survive5Min,
}

impl MissionId {
    pub fn as_str(&self) -> &'static str {
        match self {
            MissionId::ReachLevel10 => "reach_level_10",
            MissionId::Score10000 => "score_10000",
            MissionId::Survive5Min => "survive_5min",
        }
    }
}

/// A mission definition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mission {
    pub id: MissionId,
    pub name: &'static str,
    pub description: &'static str,
    /// Skin id granted on completion
    pub reward_skin: &'static str,
    pub target: u64,
}

impl Mission {
    /// Current value of the tracked metric
    fn metric(&self, stats: &Stats) -> u64 {
        match self.id {
            MissionId::ReachLevel10 => stats.max_level as u64,
            MissionId::Score10000 => stats.max_score,
            // Tracked in whole seconds
            MissionId::Survive5Min => stats.longest_run_ms / 1000,
        }
    }

    pub fn is_met(&self, stats: &Stats) -> bool {
        self.metric(stats) >= self.target
    }

    pub fn progress(&self, stats: &Stats) -> u64 {
        self.metric(stats).min(self.target)
    }
}

pub const MISSIONS: [Mission; 3] = [
    Mission {
        id: MissionId::ReachLevel10,
        name: "Level Master",
        description: "Reach level 10 in a single run",
        reward_skin: "gold",
        target: 10,
    },
    Mission {
        id: MissionId::Score10000,
        name: "Point Champion",
        description: "Score 10,000 points in a single run",
        reward_skin: "dark",
        target: 10_000,
    },
    Mission {
        id: MissionId::Survive5Min,
        name: "Survivor",
        description: "Survive 5 minutes in a single run",
        reward_skin: "neon",
        target: 300,
    },
];

/// Progress report for one mission
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissionProgress {
    pub id: MissionId,
    pub name: &'static str,
    pub description: &'static str,
    pub reward_skin: &'static str,
    pub completed: bool,
    pub progress: u64,
    pub target: u64,
    /// 0..=100
    pub percent: f32,
}

/// A mission completed by the latest run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MissionUnlock {
    pub mission: MissionId,
    pub skin: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ledger {
    stats: Stats,
    completed: BTreeSet<MissionId>,
    /// In unlock order
    unlocked_skins: Vec<String>,
    /// Best level ever reached, updated live during runs
    max_level_reached: u32,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            stats: Stats::default(),
            completed: BTreeSet::new(),
            unlocked_skins: vec![DEFAULT_SKIN.to_string()],
            max_level_reached: 0,
        }
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn max_level_reached(&self) -> u32 {
        self.max_level_reached
    }

    /// Raise the best level; returns true if it changed
    pub fn raise_max_level(&mut self, level: u32) -> bool {
        if level > self.max_level_reached {
            self.max_level_reached = level;
            true
        } else {
            false
        }
    }

    /// Fold a finished run into the stats and check missions
    pub fn record_run(&mut self, run: RunSummary) -> Vec<MissionUnlock> {
        let stats = &mut self.stats;
        stats.games_played += 1;
        stats.max_level = stats.max_level.max(run.level);
        stats.max_score = stats.max_score.max(run.score);
        stats.longest_run_ms = stats.longest_run_ms.max(run.duration_ms);
        stats.total_coins_earned += run.coins_earned;
        stats.total_kills += run.kills as u64;
        self.raise_max_level(run.level);

        log::info!(
            "Run recorded: level {}, score {}, {}s ({} games)",
            run.level,
            run.score,
            run.duration_ms / 1000,
            self.stats.games_played
        );

        self.check_missions()
    }

    /// Complete every mission whose target is met
    pub fn check_missions(&mut self) -> Vec<MissionUnlock> {
        let mut unlocks = Vec::new();
        for mission in &MISSIONS {
            if self.completed.contains(&mission.id) || !mission.is_met(&self.stats) {
                continue;
            }
            self.completed.insert(mission.id);
            if self.unlock_skin(mission.reward_skin) {
                log::info!(
                    "Mission {} complete: unlocked {}",
                    mission.id.as_str(),
                    mission.reward_skin
                );
                unlocks.push(MissionUnlock {
                    mission: mission.id,
                    skin: mission.reward_skin,
                });
            }
        }
        unlocks
    }

    pub fn is_completed(&self, id: MissionId) -> bool {
        self.completed.contains(&id)
    }

    /// Unlock a skin; returns false if it was already unlocked
    pub fn unlock_skin(&mut self, id: &str) -> bool {
        if self.is_skin_unlocked(id) {
            return false;
        }
        self.unlocked_skins.push(id.to_string());
        true
    }

    pub fn is_skin_unlocked(&self, id: &str) -> bool {
        self.unlocked_skins.iter().any(|s| s == id)
    }

    pub fn unlocked_skins(&self) -> &[String] {
        &self.unlocked_skins
    }

    pub fn mission_progress(&self) -> Vec<MissionProgress> {
        MISSIONS
            .iter()
            .map(|m| {
                let completed = self.is_completed(m.id);
                let progress = if completed {
                    m.target
                } else {
                    m.progress(&self.stats)
                };
                MissionProgress {
                    id: m.id,
                    name: m.name,
                    description: m.description,
                    reward_skin: m.reward_skin,
                    completed,
                    progress,
                    target: m.target,
                    percent: progress as f32 / m.target as f32 * 100.0,
                }
            })
            .collect()
    }

    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        let mut unlocked_skins: Vec<String> = persistence::load_json(store, keys::UNLOCKED_SKINS);
        if !unlocked_skins.iter().any(|s| s == DEFAULT_SKIN) {
            unlocked_skins.insert(0, DEFAULT_SKIN.to_string());
        }
        let ledger = Self {
            stats: persistence::load_json(store, keys::STATS),
            completed: persistence::load_json(store, keys::MISSIONS),
            unlocked_skins,
            max_level_reached: persistence::load_json(store, keys::MAX_LEVEL),
        };
        log::info!(
            "Loaded ledger: {} games, {} skins, best level {}",
            ledger.stats.games_played,
            ledger.unlocked_skins.len(),
            ledger.max_level_reached
        );
        ledger
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) {
        persistence::save_json(store, keys::STATS, &self.stats);
        persistence::save_json(store, keys::MISSIONS, &self.completed);
        persistence::save_json(store, keys::UNLOCKED_SKINS, &self.unlocked_skins);
        persistence::save_json(store, keys::MAX_LEVEL, &self.max_level_reached);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use proptest::prelude::*;

    fn run(level: u32, score: u64, duration_ms: u64) -> RunSummary {
        RunSummary {
            level,
            score,
            duration_ms,
            coins_earned: score / 10,
            kills: 2,
        }
    }

    #[test]
    fn test_new_ledger_has_default_skin() {
        let ledger = Ledger::new();
        assert!(ledger.is_skin_unlocked(DEFAULT_SKIN));
        assert_eq!(ledger.stats().games_played, 0);
    }

    #[test]
    fn test_record_run_folds_stats() {
        let mut ledger = Ledger::new();
        ledger.record_run(run(4, 500, 60_000));
        ledger.record_run(run(3, 800, 30_000));
        let stats = ledger.stats();
        assert_eq!(stats.games_played, 2);
        assert_eq!(stats.max_level, 4);
        assert_eq!(stats.max_score, 800);
        assert_eq!(stats.longest_run_ms, 60_000);
        assert_eq!(stats.total_coins_earned, 130);
        assert_eq!(stats.total_kills, 4);
        assert_eq!(ledger.max_level_reached(), 4);
    }

    #[test]
    fn test_mission_unlocks_once() {
        let mut ledger = Ledger::new();
        let unlocks = ledger.record_run(run(10, 12_000, 1000));
        assert_eq!(
            unlocks,
            vec![
                MissionUnlock {
                    mission: MissionId::ReachLevel10,
                    skin: "gold"
                },
                MissionUnlock {
                    mission: MissionId::Score10000,
                    skin: "dark"
                },
            ]
        );
        assert!(ledger.is_skin_unlocked("gold"));

        let again = ledger.record_run(run(10, 12_000, 1000));
        assert!(again.is_empty());
        assert_eq!(ledger.unlocked_skins().len(), 3);
    }

    #[test]
    fn test_survival_mission_in_seconds() {
        let mut ledger = Ledger::new();
        ledger.record_run(run(1, 0, 299_999));
        assert!(!ledger.is_completed(MissionId::Survive5Min));
        let progress = ledger.mission_progress();
        assert_eq!(progress[2].progress, 299);
        assert_eq!(progress[2].target, 300);

        ledger.record_run(run(1, 0, 300_000));
        assert!(ledger.is_completed(MissionId::Survive5Min));
        assert!(ledger.is_skin_unlocked("neon"));
    }

    #[test]
    fn test_progress_percent() {
        let mut ledger = Ledger::new();
        ledger.record_run(run(5, 2500, 0));
        let progress = ledger.mission_progress();
        assert_eq!(progress[0].percent, 50.0);
        assert_eq!(progress[1].percent, 25.0);
        assert!(!progress[0].completed);
    }

    #[test]
    fn test_save_load_roundtrip() {
        let mut store = MemoryStore::new();
        let mut ledger = Ledger::new();
        ledger.record_run(run(10, 100, 1000));
        ledger.unlock_skin("mercy");
        ledger.save(&mut store);

        let loaded = Ledger::load(&store);
        assert_eq!(loaded, ledger);
        assert!(loaded.is_completed(MissionId::ReachLevel10));
    }

    #[test]
    fn test_load_restores_default_skin() {
        let mut store = MemoryStore::new();
        store.set(keys::UNLOCKED_SKINS, "[\"fire\"]");
        store.set(keys::STATS, "garbage");
        let ledger = Ledger::load(&store);
        assert_eq!(ledger.unlocked_skins(), ["default", "fire"]);
        assert_eq!(ledger.stats(), &Stats::default());
    }

    proptest! {
        #[test]
        fn prop_completion_is_monotonic(
            runs in prop::collection::vec((1u32..15, 0u64..20_000, 0u64..400_000), 1..12),
        ) {
            let mut ledger = Ledger::new();
            let mut completed: Vec<MissionId> = Vec::new();
            let mut rewarded = 0;
            for (level, score, ms) in runs {
                rewarded += ledger.record_run(run(level, score, ms)).len();
                for id in &completed {
                    prop_assert!(ledger.is_completed(*id));
                }
                completed = MISSIONS
                    .iter()
                    .map(|m| m.id)
                    .filter(|id| ledger.is_completed(*id))
                    .collect();
            }
            prop_assert!(rewarded <= MISSIONS.len());
            prop_assert_eq!(rewarded, completed.len());
        }
    }
}
