//! Boundary policies: wrap to the opposite edge, or bounce off a margin

use crate::core::config::FlockConfig;
use crate::core::types::{normalize_or_zero, Bounds, Vec2};
use crate::entity::Body;

/// Distance from an edge at which bouncing agents are turned inward
pub const BOUNCE_MARGIN: f32 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryPolicy {
    Wrap,
    Bounce,
}

impl BoundaryPolicy {
    pub fn for_flock(config: &FlockConfig) -> Self {
        if config.bounce_wall {
            BoundaryPolicy::Bounce
        } else {
            BoundaryPolicy::Wrap
        }
    }

    /// Returns true when the body was corrected
    pub fn apply(self, body: &mut Body, bounds: &Bounds) -> bool {
        match self {
            BoundaryPolicy::Wrap => wrap(body, bounds),
            BoundaryPolicy::Bounce => bounce(body, bounds),
        }
    }
}

/// Wrapped position; each axis is tested against the original coordinate
pub fn wrap_position(pos: Vec2, bounds: &Bounds) -> Vec2 {
    let mut wrapped = pos;
    if pos.x > bounds.max.x {
        wrapped.x = bounds.min.x;
    }
    if pos.x < bounds.min.x {
        wrapped.x = bounds.max.x;
    }
    if pos.y > bounds.max.y {
        wrapped.y = bounds.min.y;
    }
    if pos.y < bounds.min.y {
        wrapped.y = bounds.max.y;
    }
    wrapped
}

pub fn wrap(body: &mut Body, bounds: &Bounds) -> bool {
    let wrapped = wrap_position(body.position, bounds);
    let moved = wrapped != body.position;
    body.position = wrapped;
    moved
}

/// Heading with inward components forced near the edges, before normalization
pub fn bounce_heading(pos: Vec2, heading: Vec2, bounds: &Bounds) -> Vec2 {
    let mut h = heading;
    if pos.x + BOUNCE_MARGIN > bounds.max.x {
        h.x = -1.0;
    }
    if pos.x - BOUNCE_MARGIN < bounds.min.x {
        h.x = 1.0;
    }
    if pos.y + BOUNCE_MARGIN > bounds.max.y {
        h.y = -1.0;
    }
    if pos.y - BOUNCE_MARGIN < bounds.min.y {
        h.y = 1.0;
    }
    h
}

/// True when `pos` is within `BOUNCE_MARGIN` of any edge
pub fn in_bounce_margin(pos: Vec2, bounds: &Bounds) -> bool {
    pos.x + BOUNCE_MARGIN > bounds.max.x
        || pos.x - BOUNCE_MARGIN < bounds.min.x
        || pos.y + BOUNCE_MARGIN > bounds.max.y
        || pos.y - BOUNCE_MARGIN < bounds.min.y
}

/// Turn the target heading inward near an edge. Position is left alone.
///
/// Counts as a correction whenever the body is inside the margin, even if its heading
/// already pointed inward.
pub fn bounce(body: &mut Body, bounds: &Bounds) -> bool {
    let forced = bounce_heading(body.position, body.target_heading, bounds);
    body.target_heading = normalize_or_zero(forced);
    in_bounce_margin(body.position, bounds)
}
