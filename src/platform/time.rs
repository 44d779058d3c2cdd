//! Frame timestamps to simulation deltas
//!
//! The first frame after a start or resume yields a zero delta, so time spent
//! paused (or in a background tab) never reaches the simulation. Oversized
//! deltas are clamped.

use crate::config::DEFAULT_MAX_FRAME_DELTA_MS;

#[derive(Debug, Clone)]
pub struct FrameClock {
    last_ms: Option<f64>,
    paused: bool,
    max_delta_ms: f32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FRAME_DELTA_MS)
    }
}

impl FrameClock {
    pub fn new(max_delta_ms: f32) -> Self {
        Self {
            last_ms: None,
            paused: false,
            max_delta_ms: if max_delta_ms > 0.0 {
                max_delta_ms
            } else {
                DEFAULT_MAX_FRAME_DELTA_MS
            },
        }
    }

    /// Delta for a frame at `now_ms`, or `None` while paused
    pub fn frame(&mut self, now_ms: f64) -> Option<f32> {
        if self.paused {
            return None;
        }
        let dt = match self.last_ms {
            Some(last) => ((now_ms - last) as f32).clamp(0.0, self.max_delta_ms),
            None => 0.0,
        };
        self.last_ms = Some(now_ms);
        Some(dt)
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume; the stale timestamp is dropped
    pub fn resume(&mut self) {
        self.paused = false;
        self.reset();
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Forget the last timestamp (new run)
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_is_zero() {
        let mut clock = FrameClock::default();
        assert_eq!(clock.frame(1000.0), Some(0.0));
        assert_eq!(clock.frame(1016.0), Some(16.0));
    }

    #[test]
    fn test_pause_discards_elapsed_time() {
        let mut clock = FrameClock::default();
        clock.frame(0.0);
        clock.frame(16.0);
        clock.pause();
        assert_eq!(clock.frame(5000.0), None);
        clock.resume();
        assert_eq!(clock.frame(60_000.0), Some(0.0));
        assert_eq!(clock.frame(60_020.0), Some(20.0));
    }

    #[test]
    fn test_reset_restarts_at_zero() {
        let mut clock = FrameClock::default();
        clock.frame(0.0);
        clock.frame(16.0);
        clock.reset();
        assert!(!clock.is_paused());
        assert_eq!(clock.frame(200.0), Some(0.0));
        assert_eq!(clock.frame(216.0), Some(16.0));
    }

    #[test]
    fn test_clamps_large_and_backwards_deltas() {
        let mut clock = FrameClock::new(100.0);
        clock.frame(0.0);
        assert_eq!(clock.frame(1000.0), Some(100.0));
        assert_eq!(clock.frame(900.0), Some(0.0));
    }

    #[test]
    fn test_invalid_max_uses_default() {
        let mut clock = FrameClock::new(-1.0);
        clock.frame(0.0);
        assert_eq!(clock.frame(10_000.0), Some(DEFAULT_MAX_FRAME_DELTA_MS));
    }
}
