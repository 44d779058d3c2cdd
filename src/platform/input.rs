//! Device-independent control state
//!
//! Holds which logical controls are down. Key names follow the DOM
//! `KeyboardEvent.key` values so the browser and the headless driver share
//! one mapping.

use serde::{Deserialize, Serialize};

use crate::sim::TickInput;

/// Logical controls currently held
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawInput {
    pub left: bool,
    pub right: bool,
    pub dash: bool,
}

/// A control a key is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Left,
    Right,
    Dash,
}

impl Control {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" | "a" | "A" => Some(Control::Left),
            "ArrowRight" | "d" | "D" => Some(Control::Right),
            " " => Some(Control::Dash),
            _ => None,
        }
    }
}

impl RawInput {
    pub fn set(&mut self, control: Control, down: bool) {
        match control {
            Control::Left => self.left = down,
            Control::Right => self.right = down,
            Control::Dash => self.dash = down,
        }
    }

    /// Apply a key event; returns false for unbound keys
    pub fn key(&mut self, key: &str, down: bool) -> bool {
        match Control::from_key(key) {
            Some(control) => {
                self.set(control, down);
                true
            }
            None => false,
        }
    }

    /// Controls for this tick. Inversion swaps the turn directions.
    pub fn resolve(&self, inverted: bool) -> TickInput {
        let (left, right) = if inverted {
            (self.right, self.left)
        } else {
            (self.left, self.right)
        };
        TickInput {
            left,
            right,
            dash: self.dash,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        let mut input = RawInput::default();
        assert!(input.key("a", true));
        assert!(input.key("ArrowRight", true));
        assert!(input.key(" ", true));
        assert!(!input.key("Escape", true));
        assert_eq!(
            input,
            RawInput {
                left: true,
                right: true,
                dash: true
            }
        );
        input.key("A", false);
        assert!(!input.left);
    }

    #[test]
    fn test_inversion_swaps_turns() {
        let input = RawInput {
            left: true,
            right: false,
            dash: true,
        };
        let normal = input.resolve(false);
        assert!(normal.left && !normal.right && normal.dash);
        let inverted = input.resolve(true);
        assert!(!inverted.left && inverted.right && inverted.dash);
    }
}
