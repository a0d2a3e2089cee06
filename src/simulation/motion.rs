//! Reference motion integrator for hosts
//!
//! The rules only produce target heading and speed. Something has to turn those into
//! movement; hosts without their own physics layer can use this. The tick entry points
//! never call it, `Simulation::step` does.

use crate::core::types::{normalize_or_zero, Vec2};
use crate::entity::Body;

/// Advance one body by `dt` seconds toward its targets
pub fn integrate(body: &mut Body, dt: f32) {
    if dt <= 0.0 {
        return;
    }

    let target = normalize_or_zero(body.target_heading);
    if target != Vec2::ZERO {
        body.heading = turn_towards(body.heading, target, body.max_rotation_speed * dt);
    }

    let goal = body.target_speed.min(body.max_speed).max(0.0);
    let max_delta = body.max_speed.max(0.0) * dt;
    let delta = (goal - body.speed).clamp(-max_delta, max_delta);
    body.speed = (body.speed + delta).max(0.0);

    body.position += body.heading * body.speed * dt;
}

/// Rotate `current` toward `target` by at most `max_angle` radians.
/// A zero `current` snaps straight to `target`.
pub fn turn_towards(current: Vec2, target: Vec2, max_angle: f32) -> Vec2 {
    let current = normalize_or_zero(current);
    if current == Vec2::ZERO {
        return target;
    }

    let angle = current.perp_dot(target).atan2(current.dot(target));
    let step = angle.clamp(-max_angle.abs(), max_angle.abs());
    let (sin, cos) = step.sin_cos();
    normalize_or_zero(Vec2::new(
        cos * current.x - sin * current.y,
        sin * current.x + cos * current.y,
    ))
}
