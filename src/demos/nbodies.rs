// N-body gravity between regular polygons

use std::f64::consts::TAU;

use log::info;

use super::{palette, Demo, CENTER};
use crate::core::{Polygon, Vector, VectorExt};
use crate::engine::physics::{Body, PhysicsError, Scene};

pub const NUM_BODIES: usize = 25;
pub const GRAVITATIONAL_CONSTANT: f64 = 1.0e4;
pub const MAX_MASS: f64 = 100.0;

/// Radius of the ring the bodies start on
const RING_RADIUS: f64 = 200.0;
/// Speed along the ring at the start
const ORBITAL_SPEED: f64 = 15.0;
const MAX_ROTATIONAL_VELOCITY: f64 = 0.01;

/// Bodies on a ring, every pair attracting each other
pub struct NBodies {
    scene: Scene,
}

impl NBodies {
    pub fn new(count: usize) -> Result<Self, PhysicsError> {
        let mut scene = Scene::new();
        let mut handles = Vec::with_capacity(count);

        for i in 0..count {
            let fraction = i as f64 / count as f64;
            let angle = TAU * fraction;
            let direction = Vector::X.rotated(angle);

            // Mass spread over [1, MAX_MASS], radius grows with its square root
            let mass = 1.0 + MAX_MASS * ((i * 7) % count) as f64 / count as f64;
            let sides = 5 + i % 4;
            let shape = Polygon::regular(CENTER + direction * RING_RADIUS, 2.0 * mass.sqrt(), sides)?;

            let spin = if i % 2 == 0 { 1.0 } else { -1.0 };
            let body = Body::new(shape, mass, palette(i, count))
                .with_velocity(direction.perp() * ORBITAL_SPEED)
                .with_rotational_velocity(spin * MAX_ROTATIONAL_VELOCITY * fraction);
            handles.push(scene.add_body(body));
        }

        for (i, &first) in handles.iter().enumerate() {
            for &second in &handles[i + 1..] {
                scene.create_gravity(GRAVITATIONAL_CONSTANT, first, second)?;
            }
        }

        info!(
            "N-body demo: {} bodies, {} gravity pairs",
            scene.body_count(),
            scene.force_count()
        );
        Ok(Self { scene })
    }

    /// Sum of `mass * velocity` over the scene
    pub fn momentum(&self) -> Vector {
        self.scene
            .bodies()
            .iter()
            .map(|body| body.velocity() * body.mass())
            .sum()
    }
}

impl Demo for NBodies {
    fn name(&self) -> &'static str {
        "nbodies"
    }

    fn scene(&self) -> &Scene {
        &self.scene
    }

    fn step(&mut self, dt: f64) -> Result<bool, PhysicsError> {
        self.scene.tick(dt);
        Ok(true)
    }
}
