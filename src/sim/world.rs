//! Arena bounds with toroidal wrap-around

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::WorldConfig;

/// Fixed rectangular arena `[0, width] x [0, height]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct World {
    pub width: f32,
    pub height: f32,
}

impl World {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn from_config(config: &WorldConfig) -> Self {
        Self::new(config.width, config.height)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Wrap a point that left the arena to the opposite edge.
    ///
    /// Exceeding an edge re-enters exactly at the other edge, so the result
    /// always lies inside the closed bounds.
    pub fn wrap(&self, mut p: Vec2) -> Vec2 {
        if p.x < 0.0 {
            p.x = self.width;
        } else if p.x > self.width {
            p.x = 0.0;
        }
        if p.y < 0.0 {
            p.y = self.height;
        } else if p.y > self.height {
            p.y = 0.0;
        }
        p
    }

    /// True if `p` is inside the closed bounds
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= 0.0 && p.x <= self.width && p.y >= 0.0 && p.y <= self.height
    }

    /// True if `p` is strictly inside the open bounds
    pub fn contains_open(&self, p: Vec2) -> bool {
        p.x > 0.0 && p.x < self.width && p.y > 0.0 && p.y < self.height
    }

    /// True if `p` is more than `margin` outside the arena on any side
    pub fn is_beyond(&self, p: Vec2, margin: f32) -> bool {
        p.x < -margin || p.x > self.width + margin || p.y < -margin || p.y > self.height + margin
    }
}
