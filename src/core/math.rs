// 2D vector math on top of glam's double-precision vector

use glam::DVec2;

/// A 2D vector (x, y) in world units
///
/// Double precision is required: simulations routinely step with dt around 1e-6.
pub type Vector = DVec2;

/// The zero vector
pub const ZERO: Vector = DVec2::ZERO;

/// Operations glam doesn't name the way the physics code reads them
pub trait VectorExt {
    /// 2D scalar cross product `x1 * y2 - y1 * x2`
    fn cross(self, other: Self) -> f64;

    /// Rotate counter-clockwise by `angle` radians about the origin
    fn rotated(self, angle: f64) -> Self;
}

impl VectorExt for Vector {
    #[inline]
    fn cross(self, other: Self) -> f64 {
        self.x * other.y - self.y * other.x
    }

    #[inline]
    fn rotated(self, angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Vector::new(cos * self.x - sin * self.y, sin * self.x + cos * self.y)
    }
}

/// Scale a vector by a scalar
#[inline]
pub fn scale(scalar: f64, v: Vector) -> Vector {
    v * scalar
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vector, b: Vector) -> f64 {
    (a - b).length()
}
