//! Vector helpers on top of `glam::Vec2`
//!
//! `Vec2` is a `Copy` value type, so every operation returns a new vector.

use glam::Vec2;
use rand::Rng;

/// Unit vector pointing along `angle` (radians)
#[inline]
pub fn from_angle(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Unit vector from `from` toward `to`, zero when they coincide
#[inline]
pub fn direction(from: Vec2, to: Vec2) -> Vec2 {
    (to - from).normalize_or_zero()
}

/// Angle (radians) of the vector from `from` to `to`
#[inline]
pub fn heading_to(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// True when two circles overlap (strictly)
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance(b) < ra + rb
}

/// Uniform value in `[lo, hi)`, or `lo` if the range is empty
pub fn random_between<R: Rng>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi > lo { rng.random_range(lo..hi) } else { lo }
}

/// Uniform point inside `[margin, size - margin]` on each axis
pub fn random_interior<R: Rng>(rng: &mut R, width: f32, height: f32, margin: f32) -> Vec2 {
    Vec2::new(
        random_between(rng, margin, width - margin),
        random_between(rng, margin, height - margin),
    )
}
