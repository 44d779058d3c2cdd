//! Skin catalog
//!
//! Skins are cosmetic. Each one is unlocked by exactly one source: free by
//! default, bought in the shop, redeemed with a secret code, or granted by a
//! mission.

use serde::Serialize;

/// Default skin id, always unlocked
pub const DEFAULT_SKIN: &str = "default";

/// How a skin becomes available
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnlockSource {
    Default,
    Purchase,
    SecretCode(&'static str),
    Mission(&'static str),
}

/// Catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Skin {
    pub id: &'static str,
    pub name: &'static str,
    pub body_color: &'static str,
    pub glow_color: &'static str,
    pub head_color: &'static str,
    pub source: UnlockSource,
}

pub const CATALOG: [Skin; 9] = [
    Skin {
        id: DEFAULT_SKIN,
        name: "Classic",
        body_color: "#00ffff",
        glow_color: "#0099ff",
        head_color: "#00ffff",
        source: UnlockSource::Default,
    },
    Skin {
        id: "fire",
        name: "Fire",
        body_color: "#ff4500",
        glow_color: "#ff8c00",
        head_color: "#ff0000",
        source: UnlockSource::Purchase,
    },
    Skin {
        id: "robot",
        name: "Robot",
        body_color: "#c0c0c0",
        glow_color: "#ffffff",
        head_color: "#808080",
        source: UnlockSource::Purchase,
    },
    Skin {
        id: "mercy",
        name: "Mercy",
        body_color: "#9d4edd",
        glow_color: "#c77dff",
        head_color: "#7b2cbf",
        source: UnlockSource::SecretCode("m3rcy"),
    },
    Skin {
        id: "gold",
        name: "Gold",
        body_color: "#ffd700",
        glow_color: "#ffed4e",
        head_color: "#ffb700",
        source: UnlockSource::Mission("reach_level_10"),
    },
    Skin {
        id: "dark",
        name: "Dark",
        body_color: "#1a1a2e",
        glow_color: "#16213e",
        head_color: "#0f0f1e",
        source: UnlockSource::Mission("score_10000"),
    },
    Skin {
        id: "alien",
        name: "Super Alien",
        body_color: "#00ff88",
        glow_color: "#00ffaa",
        head_color: "#00ff66",
        source: UnlockSource::SecretCode("w1s3v1l"),
    },
    Skin {
        id: "cow",
        name: "Moooob",
        body_color: "#ffffff",
        glow_color: "#f0f0f0",
        head_color: "#e0e0e0",
        source: UnlockSource::SecretCode("m000000b"),
    },
    Skin {
        id: "neon",
        name: "Neon",
        body_color: "#ff00ff",
        glow_color: "#ff66ff",
        head_color: "#cc00cc",
        source: UnlockSource::Mission("survive_5min"),
    },
];

/// Look up a skin by id
pub fn find(id: &str) -> Option<&'static Skin> {
    CATALOG.iter().find(|s| s.id == id)
}

/// Skin unlocked by a secret code (case-insensitive, surrounding whitespace ignored)
pub fn skin_for_code(code: &str) -> Option<&'static Skin> {
    let code = code.trim().to_lowercase();
    CATALOG
        .iter()
        .find(|s| matches!(s.source, UnlockSource::SecretCode(c) if c == code))
}
