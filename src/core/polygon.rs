// Polygon geometry over ordered, cyclic vertex sequences

use super::math::{Vector, VectorExt, ZERO};
use std::f64::consts::{PI, TAU};

/// Minimum number of vertices for a closed polygon
pub const MIN_VERTICES: usize = 3;

/// Polygon validation errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PolygonError {
    #[error("Polygon needs at least 3 vertices, got {count}")]
    TooFewVertices { count: usize },

    #[error("Polygon has zero area, centroid is undefined")]
    Degenerate,
}

/// Signed area via the trapezoid formula
///
/// Positive for counter-clockwise winding, negative for clockwise.
pub fn area(vertices: &[Vector]) -> f64 {
    let n = vertices.len();
    let mut sum = 0.0;
    for i in 0..n {
        let a = vertices[i];
        let b = vertices[(i + 1) % n];
        sum += (a.y + b.y) * (a.x - b.x);
    }
    sum / 2.0
}

/// Centroid of a non-degenerate polygon
///
/// # Panics
///
/// Panics if the signed area is zero.
pub fn centroid(vertices: &[Vector]) -> Vector {
    let area = area(vertices);
    assert!(area != 0.0, "centroid of a zero-area polygon is undefined");

    let n = vertices.len();
    let mut sum = ZERO;
    for i in 0..n {
        let a = vertices[i];
        let b = vertices[(i + 1) % n];
        sum += (a + b) * a.cross(b);
    }
    sum / (6.0 * area)
}

/// Add `delta` to every vertex
pub fn translate(vertices: &mut [Vector], delta: Vector) {
    for v in vertices.iter_mut() {
        *v += delta;
    }
}

/// Rigid rotation by `angle` radians about `pivot`
pub fn rotate(vertices: &mut [Vector], angle: f64, pivot: Vector) {
    for v in vertices.iter_mut() {
        *v = (*v - pivot).rotated(angle) + pivot;
    }
}

/// An owned polygon that is known to have a well-defined centroid
///
/// Rigid motions preserve area, so a polygon that validated once stays valid.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<Vector>,
}

impl Polygon {
    /// Validate and wrap a vertex list
    pub fn new(vertices: Vec<Vector>) -> Result<Self, PolygonError> {
        if vertices.len() < MIN_VERTICES {
            return Err(PolygonError::TooFewVertices {
                count: vertices.len(),
            });
        }
        if area(&vertices) == 0.0 {
            return Err(PolygonError::Degenerate);
        }
        Ok(Self { vertices })
    }

    /// Axis-aligned rectangle centered on `center`, counter-clockwise
    pub fn rectangle(center: Vector, width: f64, height: f64) -> Result<Self, PolygonError> {
        let (hw, hh) = (width / 2.0, height / 2.0);
        Self::new(vec![
            center + Vector::new(-hw, -hh),
            center + Vector::new(hw, -hh),
            center + Vector::new(hw, hh),
            center + Vector::new(-hw, hh),
        ])
    }

    /// Regular polygon inscribed in a circle, counter-clockwise
    pub fn regular(center: Vector, radius: f64, sides: usize) -> Result<Self, PolygonError> {
        let step = TAU / sides as f64;
        let vertices = (0..sides)
            .map(|i| center + Vector::new(radius, 0.0).rotated(step * i as f64))
            .collect();
        Self::new(vertices)
    }

    /// Star with `points` tips, alternating inner and outer radius
    ///
    /// The first vertex lies on the inner radius along +x. Stars are concave,
    /// so collision tests treat them as their convex hull.
    pub fn star(
        center: Vector,
        inner_radius: f64,
        outer_radius: f64,
        points: usize,
    ) -> Result<Self, PolygonError> {
        let step = PI / points as f64;
        let vertices = (0..2 * points)
            .map(|i| {
                let radius = if i % 2 == 0 { inner_radius } else { outer_radius };
                center + Vector::new(radius, 0.0).rotated(step * i as f64)
            })
            .collect();
        Self::new(vertices)
    }

    pub fn vertices(&self) -> &[Vector] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn area(&self) -> f64 {
        area(&self.vertices)
    }

    pub fn centroid(&self) -> Vector {
        centroid(&self.vertices)
    }

    pub fn translate(&mut self, delta: Vector) {
        translate(&mut self.vertices, delta);
    }

    pub fn rotate(&mut self, angle: f64, pivot: Vector) {
        rotate(&mut self.vertices, angle, pivot);
    }

    /// Consume the polygon, returning its vertices
    pub fn into_vertices(self) -> Vec<Vector> {
        self.vertices
    }
}

impl TryFrom<Vec<Vector>> for Polygon {
    type Error = PolygonError;

    fn try_from(vertices: Vec<Vector>) -> Result<Self, Self::Error> {
        Self::new(vertices)
    }
}
