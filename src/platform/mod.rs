//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input state and inversion
//! - Frame time and pause handling
//! - Browser bindings (wasm only)

pub mod input;
pub mod time;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use input::{Control, RawInput};
pub use time::FrameClock;
