//! Core type definitions used throughout the codebase

use rand::Rng;
use serde::{Deserialize, Serialize};

pub use glam::Vec2;

/// Simulation tick counter (one per tick group invocation)
pub type Tick = u64;

/// Identifier of a flock, equal to its index in the world's flock list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FlockId(pub u32);

impl FlockId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for FlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "flock#{}", self.0)
    }
}

/// Axis-aligned world rectangle shared by placement and boundary logic
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn contains(&self, pos: Vec2) -> bool {
        pos.x >= self.min.x && pos.x <= self.max.x && pos.y >= self.min.y && pos.y <= self.max.y
    }

    /// Uniform point inside the rectangle. A degenerate or non-finite axis collapses to
    /// `min`, or to 0 when `min` itself is not finite.
    pub fn random_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        Vec2::new(
            sample_axis(rng, self.min.x, self.max.x),
            sample_axis(rng, self.min.y, self.max.y),
        )
    }
}

fn sample_axis<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max > min && (max - min).is_finite() {
        rng.gen_range(min..max)
    } else if min.is_finite() {
        min
    } else {
        0.0
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            min: Vec2::new(-50.0, -30.0),
            max: Vec2::new(50.0, 30.0),
        }
    }
}

/// Unit vector in the direction of `v`, or zero when `v` has no usable length.
///
/// Every steering rule normalizes through this so a degenerate sum never turns into NaN.
#[inline]
pub fn normalize_or_zero(v: Vec2) -> Vec2 {
    let len = v.length();
    if len > f32::EPSILON && len.is_finite() {
        v / len
    } else {
        Vec2::ZERO
    }
}

/// Incremental blend used for every target-speed update: `(current + sample) / 2`
#[inline]
pub fn halving_average(current: f32, sample: f32) -> f32 {
    (current + sample) / 2.0
}

/// Random unit vector, used as the initial heading of new agents and obstacles
pub fn random_heading<R: Rng + ?Sized>(rng: &mut R) -> Vec2 {
    let angle = rng.gen_range(0.0..std::f32::consts::TAU);
    Vec2::new(angle.cos(), angle.sin())
}
