use crate::core::Vector;

use super::body::Body;
use super::scene::{BodyHandle, BoundBodies, ForceGenerator, ForceHandle, Scene};
use super::PhysicsError;

/// Separating Axis Theorem overlap test for two convex polygons
///
/// Touching shapes count as overlapping. Concave shapes are tested as if they
/// were their convex hull.
pub fn overlaps(a: &[Vector], b: &[Vector]) -> bool {
    !has_separating_axis(a, b) && !has_separating_axis(b, a)
}

/// Whether any edge normal of `edges` separates the two point sets
fn has_separating_axis(edges: &[Vector], other: &[Vector]) -> bool {
    let n = edges.len();
    for i in 0..n {
        let edge = edges[(i + 1) % n] - edges[i];
        if edge == Vector::ZERO {
            continue;
        }

        let axis = edge.perp();
        let (min_a, max_a) = project(edges, axis);
        let (min_b, max_b) = project(other, axis);
        if max_a < min_b || max_b < min_a {
            return true;
        }
    }
    false
}

/// Interval covered by `points` projected onto `axis`
fn project(points: &[Vector], axis: Vector) -> (f64, f64) {
    points
        .iter()
        .map(|p| p.dot(axis))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), d| {
            (min.min(d), max.max(d))
        })
}

/// Mark both bodies removed if their shapes overlap
///
/// Returns whether a collision happened.
pub fn collision_response(a: &mut Body, b: &mut Body) -> bool {
    let hit = overlaps(a.vertices(), b.vertices());
    if hit {
        a.mark_removed();
        b.mark_removed();
    }
    hit
}

/// Force binding that destroys both bodies as soon as they touch
#[derive(Debug, Clone, Copy, Default)]
pub struct DestructiveCollision;

impl ForceGenerator for DestructiveCollision {
    fn apply(&mut self, bodies: &mut BoundBodies<'_>) {
        let (first, second) = bodies.pair_mut(0, 1);
        collision_response(first, second);
    }

    fn arity(&self) -> Option<usize> {
        Some(2)
    }
}

impl Scene {
    /// Remove both bodies at the end of the first tick in which they overlap
    pub fn create_destructive_collision(
        &mut self,
        first: BodyHandle,
        second: BodyHandle,
    ) -> Result<ForceHandle, PhysicsError> {
        self.add_force_binding(DestructiveCollision, &[first, second])
    }
}
