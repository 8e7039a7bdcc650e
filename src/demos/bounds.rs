// Playfield boundary rules shared by the demos
//
// The physics core knows nothing about walls; demos keep bodies in view by
// reflecting them off the edges or wrapping them to the opposite side.

use crate::core::{Vector, ZERO};
use crate::engine::physics::Body;

/// Componentwise smallest and largest vertex of `vertices`
pub fn extent(vertices: &[Vector]) -> (Vector, Vector) {
    vertices.iter().fold(
        (Vector::splat(f64::INFINITY), Vector::splat(f64::NEG_INFINITY)),
        |(low, high), &v| (low.min(v), high.max(v)),
    )
}

/// Bounce `body` off the walls of the box `min..max`
///
/// A body poking through a wall while moving into it is mirrored back inside
/// by twice the overshoot, and that velocity component is reversed and scaled
/// by `elasticity`. Pass infinite bounds for sides without a wall.
///
/// Returns whether the body bounced.
pub fn reflect_off_walls(body: &mut Body, min: Vector, max: Vector, elasticity: f64) -> bool {
    let (low, high) = extent(body.vertices());
    let mut velocity = body.velocity();
    let mut shift = ZERO;
    let mut bounced = false;

    for axis in 0..2 {
        if high[axis] > max[axis] && velocity[axis] > 0.0 {
            shift[axis] = -2.0 * (high[axis] - max[axis]);
        } else if low[axis] < min[axis] && velocity[axis] < 0.0 {
            shift[axis] = 2.0 * (min[axis] - low[axis]);
        } else {
            continue;
        }
        velocity[axis] = -elasticity * velocity[axis];
        bounced = true;
    }

    if bounced {
        body.translate(shift);
        body.set_velocity(velocity);
    }
    bounced
}

/// Move `body` to the opposite edge once its centroid leaves `0..size`
///
/// Returns whether the body wrapped.
pub fn wrap_around(body: &mut Body, size: Vector) -> bool {
    let center = body.centroid();
    let mut shift = ZERO;

    for axis in 0..2 {
        if center[axis] > size[axis] {
            shift[axis] = -size[axis];
        } else if center[axis] < 0.0 {
            shift[axis] = size[axis];
        }
    }

    if shift == ZERO {
        return false;
    }
    body.translate(shift);
    true
}
