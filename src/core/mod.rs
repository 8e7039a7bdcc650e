// Pure geometry shared by the physics engine and its consumers

pub mod color;
pub mod math;
pub mod polygon;

pub use color::Rgb;
pub use math::{Vector, VectorExt, ZERO};
pub use polygon::{Polygon, PolygonError};
