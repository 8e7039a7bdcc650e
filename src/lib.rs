// Rusted Physics: 2D convex-polygon rigid bodies with pluggable forces

pub mod core;
pub mod demos;
pub mod engine;

pub use crate::core::{Polygon, PolygonError, Rgb, Vector, VectorExt, ZERO};
pub use crate::engine::game_loop::{Stepper, StepperConfig};
pub use crate::engine::physics::{
    Body, BodyHandle, BoundBodies, ForceGenerator, ForceHandle, PhysicsError, Scene,
};
pub use crate::engine::renderer::{DrawList, DrawVertex};
