// Spinning star bouncing around the window

use log::{debug, info};

use super::bounds::reflect_off_walls;
use super::{Demo, CENTER, WINDOW};
use crate::core::{Polygon, Rgb, Vector, ZERO};
use crate::engine::physics::{Body, BodyHandle, PhysicsError, Scene};

const INNER_RADIUS: f64 = 20.0;
const OUTER_RADIUS: f64 = 200.0;
const POINTS: usize = 5;
const INITIAL_VELOCITY: Vector = Vector::new(100.0, 100.0);
/// Radians per tick
const SPIN: f64 = 0.01;
const STAR_COLOR: Rgb = Rgb { r: 1.0, g: 0.8, b: 0.0 };

/// One star with no forces, kept in view by perfectly elastic walls
pub struct Bounce {
    scene: Scene,
    star: BodyHandle,
    bounces: usize,
}

impl Bounce {
    pub fn new() -> Result<Self, PhysicsError> {
        let mut scene = Scene::new();
        let shape = Polygon::star(CENTER, INNER_RADIUS, OUTER_RADIUS, POINTS)?;
        let star = Body::new(shape, 1.0, STAR_COLOR)
            .with_velocity(INITIAL_VELOCITY)
            .with_rotational_velocity(SPIN);
        let star = scene.add_body(star);

        info!("Bounce demo: {POINTS}-point star");
        Ok(Self {
            scene,
            star,
            bounces: 0,
        })
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn star(&self) -> BodyHandle {
        self.star
    }

    /// Number of ticks on which the star hit a wall
    pub fn bounces(&self) -> usize {
        self.bounces
    }
}

impl Demo for Bounce {
    fn name(&self) -> &'static str {
        "bounce"
    }

    fn scene(&self) -> &Scene {
        &self.scene
    }

    fn step(&mut self, dt: f64) -> Result<bool, PhysicsError> {
        self.scene.tick(dt);

        if let Some(star) = self.scene.body_mut(self.star) {
            if reflect_off_walls(star, ZERO, WINDOW, 1.0) {
                self.bounces += 1;
                debug!("Star bounced, velocity now {:?}", star.velocity());
            }
        }
        Ok(true)
    }
}
