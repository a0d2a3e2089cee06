//! Flee-on-sight: prey steer away from every predator within range

use crate::core::types::{halving_average, normalize_or_zero, Vec2};
use crate::entity::Body;

/// Apply every qualifying predator to one prey body, in slice order.
///
/// Each predator closer than `distance` adds the unit vector away from it and the heading
/// is renormalized right away; the target speed takes one halving-average step per
/// predator. Returns how many predators qualified.
pub fn flee_from(body: &mut Body, predators: &[Vec2], distance: f32, weight: f32) -> usize {
    let mut encounters = 0;
    for &predator in predators {
        let dist = predator.distance(body.position);
        if dist < distance {
            let away = normalize_or_zero(body.position - predator);
            body.target_heading = normalize_or_zero(body.target_heading + away);
            body.target_speed = halving_average(body.target_speed, dist * weight);
            encounters += 1;
        }
    }
    encounters
}
