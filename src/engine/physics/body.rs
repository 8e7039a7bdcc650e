use std::any::Any;
use std::fmt;

use crate::core::{Polygon, Rgb, Vector, ZERO};

/// A simulated rigid body: a convex polygon with mass and kinematic state
///
/// Bodies are created by the caller and handed to a [`Scene`](super::Scene),
/// which owns them from then on. Removal is deferred: [`Body::mark_removed`]
/// only flags the body, the scene drops it at the end of its next tick.
pub struct Body {
    /// World-space shape
    shape: Polygon,

    /// Cached centroid of `shape`, refreshed after every shape mutation
    centroid: Vector,

    /// Mass, `f64::INFINITY` for immovable anchors
    mass: f64,

    velocity: Vector,

    /// Velocity at the end of the previous tick, for trapezoidal integration
    previous_velocity: Vector,

    /// Accumulated rotation angle (radians)
    orientation: f64,

    /// Rotation added to `orientation` every tick
    rotational_velocity: f64,

    /// Net force accumulated since the last tick
    force: Vector,

    color: Rgb,

    /// Opaque caller-owned tag, dropped together with the body
    info: Option<Box<dyn Any>>,

    removed: bool,
}

impl Body {
    /// Create a body at rest
    ///
    /// # Panics
    ///
    /// Panics if `mass` is negative or NaN.
    ///
    /// A mass of zero is accepted for bodies that only move kinematically;
    /// any force applied to one makes its velocity non-finite.
    pub fn new(shape: Polygon, mass: f64, color: Rgb) -> Self {
        assert!(mass >= 0.0, "body mass must be non-negative, got {mass}");

        let centroid = shape.centroid();
        Self {
            shape,
            centroid,
            mass,
            velocity: ZERO,
            previous_velocity: ZERO,
            orientation: 0.0,
            rotational_velocity: 0.0,
            force: ZERO,
            color,
            info: None,
            removed: false,
        }
    }

    /// Attach an opaque tag (e.g. a role enum) to the body
    pub fn with_info<T: Any>(mut self, info: T) -> Self {
        self.info = Some(Box::new(info));
        self
    }

    /// Set the initial velocity
    pub fn with_velocity(mut self, velocity: Vector) -> Self {
        self.set_velocity(velocity);
        self
    }

    /// Set the initial rotational velocity
    pub fn with_rotational_velocity(mut self, rotational_velocity: f64) -> Self {
        self.rotational_velocity = rotational_velocity;
        self
    }

    /// Independent copy of the shape, safe to keep across ticks
    pub fn shape(&self) -> Polygon {
        self.shape.clone()
    }

    /// Borrowed view of the current vertices
    pub fn vertices(&self) -> &[Vector] {
        self.shape.vertices()
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Whether this body has infinite mass and never accelerates
    pub fn is_anchor(&self) -> bool {
        self.mass.is_infinite()
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn set_color(&mut self, color: Rgb) {
        self.color = color;
    }

    /// The tag attached with [`Body::with_info`], if it has type `T`
    pub fn info<T: Any>(&self) -> Option<&T> {
        self.info.as_ref().and_then(|info| info.downcast_ref::<T>())
    }

    pub fn info_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.info.as_mut().and_then(|info| info.downcast_mut::<T>())
    }

    pub fn has_info(&self) -> bool {
        self.info.is_some()
    }

    pub fn centroid(&self) -> Vector {
        self.centroid
    }

    /// Move the body so its centroid lands on `target`
    pub fn set_centroid(&mut self, target: Vector) {
        self.translate(target - self.centroid);
    }

    /// Move every vertex by `delta`
    pub fn translate(&mut self, delta: Vector) {
        self.shape.translate(delta);
        self.centroid = self.shape.centroid();
    }

    pub fn velocity(&self) -> Vector {
        self.velocity
    }

    /// Override the velocity, discarding the integrator's velocity history
    pub fn set_velocity(&mut self, velocity: Vector) {
        self.velocity = velocity;
        self.previous_velocity = velocity;
    }

    /// Apply an instantaneous change in momentum
    pub fn add_impulse(&mut self, impulse: Vector) {
        self.velocity += impulse / self.mass;
    }

    pub fn orientation(&self) -> f64 {
        self.orientation
    }

    /// Rotate about the centroid to the absolute orientation `angle`
    pub fn set_rotation(&mut self, angle: f64) {
        let delta = angle - self.orientation;
        self.orientation = angle;
        if delta != 0.0 {
            self.shape.rotate(delta, self.centroid);
            self.centroid = self.shape.centroid();
        }
    }

    pub fn rotational_velocity(&self) -> f64 {
        self.rotational_velocity
    }

    pub fn set_rotational_velocity(&mut self, rotational_velocity: f64) {
        self.rotational_velocity = rotational_velocity;
    }

    /// Net force accumulated so far this tick
    pub fn force(&self) -> Vector {
        self.force
    }

    pub fn add_force(&mut self, force: Vector) {
        self.force += force;
    }

    pub fn set_force(&mut self, force: Vector) {
        self.force = force;
    }

    /// Flag the body for removal at the end of the next scene tick
    pub fn mark_removed(&mut self) {
        self.removed = true;
    }

    pub fn is_removed(&self) -> bool {
        self.removed
    }

    /// Advance the body by `dt`, consuming the accumulated force
    ///
    /// Position uses the average of the old and new velocity (trapezoidal rule).
    pub fn tick(&mut self, dt: f64) {
        // A massless body only stays finite while nothing pushes on it
        if self.force != ZERO {
            let acceleration = self.force * (dt / self.mass);
            self.velocity += acceleration;
        }

        let average = (self.velocity + self.previous_velocity) * (dt / 2.0);
        self.translate(average);

        self.set_rotation(self.orientation + self.rotational_velocity);

        self.force = ZERO;
        self.previous_velocity = self.velocity;
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Body")
            .field("centroid", &self.centroid)
            .field("mass", &self.mass)
            .field("velocity", &self.velocity)
            .field("orientation", &self.orientation)
            .field("vertices", &self.shape.len())
            .field("has_info", &self.info.is_some())
            .field("removed", &self.removed)
            .finish()
    }
}
