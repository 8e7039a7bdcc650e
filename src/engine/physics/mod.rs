// Physics system: convex-polygon bodies, pluggable forces, SAT collisions

pub mod body;
mod collision;
mod forces;
mod scene;

pub use body::Body;
pub use collision::{collision_response, overlaps, DestructiveCollision};
pub use forces::{Drag, Gravity, Spring, DEFAULT_MIN_DISTANCE};
pub use scene::{BodyHandle, BoundBodies, ForceGenerator, ForceHandle, Scene};

use crate::core::PolygonError;

/// Physics errors
///
/// Contract violations (negative mass, out-of-range indices) panic instead;
/// these are the conditions a caller can reasonably check for.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PhysicsError {
    #[error("Invalid shape: {0}")]
    Shape(#[from] PolygonError),

    #[error("Body {0:?} is not in the scene")]
    UnknownBody(BodyHandle),

    #[error("Body {0:?} appears more than once in a force binding")]
    DuplicateBody(BodyHandle),

    #[error("Force generator acts on {expected} bodies, got {actual}")]
    WrongBodyCount { expected: usize, actual: usize },
}
