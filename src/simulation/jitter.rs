//! Random +/-45 degree heading jitter, shared by agents and roaming obstacles

use std::f32::consts::FRAC_PI_4;

use rand::Rng;

use crate::core::types::{halving_average, normalize_or_zero, Vec2};
use crate::entity::Body;

/// Uniform sample in `[1, max_speed]`.
///
/// A limit at or below 1 returns the limit itself (never negative), so a zero-speed
/// body stays still. A non-finite limit samples 0.
pub fn sample_speed<R: Rng + ?Sized>(rng: &mut R, max_speed: f32) -> f32 {
    if !max_speed.is_finite() {
        0.0
    } else if max_speed > 1.0 {
        rng.gen_range(1.0..=max_speed)
    } else {
        max_speed.max(0.0)
    }
}

/// Deterministic core of the jitter rule.
///
/// `coin > 0.5` turns left, otherwise right. The rotated unit vector is blended in with
/// `weight`, and the target speed takes one halving-average step toward `speed_sample`.
pub fn apply_jitter(body: &mut Body, weight: f32, coin: f32, speed_sample: f32) {
    let current = normalize_or_zero(body.target_heading);
    let mut angle = current.y.atan2(current.x);
    if coin > 0.5 {
        angle += FRAC_PI_4;
    } else {
        angle -= FRAC_PI_4;
    }
    let turn = Vec2::new(angle.cos(), angle.sin());

    body.target_heading = normalize_or_zero(current + turn * weight);
    body.target_speed = halving_average(body.target_speed, speed_sample);
}

pub fn jitter<R: Rng + ?Sized>(body: &mut Body, weight: f32, rng: &mut R) {
    let coin: f32 = rng.gen();
    let speed_sample = sample_speed(rng, body.max_speed);
    apply_jitter(body, weight, coin, speed_sample);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Behavior;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn roaming() -> Body {
        Body::new(Vec2::ZERO, Behavior::Roaming { jitter_weight: 0.1 }).with_limits(5.0, 1.0)
    }

    #[test]
    fn test_left_turn_from_east() {
        let mut body = roaming();
        body.target_heading = Vec2::X;
        apply_jitter(&mut body, 1.0, 0.9, 3.0);
        // X + (cos 45, sin 45), renormalized: 22.5 degrees left
        let expected = Vec2::new(22.5f32.to_radians().cos(), 22.5f32.to_radians().sin());
        assert!((body.target_heading - expected).length() < 1e-5);
        assert_eq!(body.target_speed, 1.5);
    }

    #[test]
    fn test_right_turn_from_east() {
        let mut body = roaming();
        body.target_heading = Vec2::X;
        apply_jitter(&mut body, 1.0, 0.2, 3.0);
        assert!(body.target_heading.y < 0.0);
        assert!((body.target_heading.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_zero_heading_gets_a_direction() {
        let mut body = roaming();
        apply_jitter(&mut body, 0.1, 0.9, 1.0);
        // atan2(0, 0) = 0, so the turn is 45 degrees left of +x
        let expected = Vec2::new(FRAC_PI_4.cos(), FRAC_PI_4.sin());
        assert!((body.target_heading - expected).length() < 1e-5);
    }

    #[test]
    fn test_sample_speed_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..200 {
            let s = sample_speed(&mut rng, 4.0);
            assert!((1.0..=4.0).contains(&s));
        }
        assert_eq!(sample_speed(&mut rng, 1.0), 1.0);
        assert_eq!(sample_speed(&mut rng, 0.0), 0.0);
        assert_eq!(sample_speed(&mut rng, 0.5), 0.5);
    }

    #[test]
    fn test_sample_speed_non_finite_limit() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        assert_eq!(sample_speed(&mut rng, f32::INFINITY), 0.0);
        assert_eq!(sample_speed(&mut rng, f32::NAN), 0.0);
        assert_eq!(sample_speed(&mut rng, -3.0), 0.0);
    }

    #[test]
    fn test_jitter_keeps_unit_heading() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut body = roaming();
        body.target_heading = Vec2::new(0.3, -0.7);
        for _ in 0..50 {
            jitter(&mut body, 0.4, &mut rng);
            assert!((body.target_heading.length() - 1.0).abs() < 1e-4);
            assert!(body.target_speed <= body.max_speed);
        }
    }
}
