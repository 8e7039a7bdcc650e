// Damped springs: a row of balls, each pulled back to its own anchor

use log::info;

use super::{palette, Demo, CENTER, WINDOW};
use crate::core::{Polygon, Rgb, Vector};
use crate::engine::physics::{Body, BodyHandle, PhysicsError, Scene};

pub const NUM_BALLS: usize = 50;
pub const BALL_MASS: f64 = 10.0;
pub const SPRING_CONSTANT: f64 = 40.0;
pub const DRAG_CONSTANT: f64 = 4.0;

const BALL_RADIUS: f64 = 8.0;
const BALL_SIDES: usize = 20;
const ANCHOR_RADIUS: f64 = 1.0;

/// Height of the initial pulse above the anchors
const PULSE_HEIGHT: f64 = 200.0;
/// Number of balls the pulse spreads across
const PULSE_WIDTH: usize = 10;

pub struct Damping {
    scene: Scene,
    balls: Vec<BodyHandle>,
}

impl Damping {
    pub fn new(count: usize) -> Result<Self, PhysicsError> {
        let mut scene = Scene::new();
        let mut balls = Vec::with_capacity(count);

        for i in 0..count {
            let x = WINDOW.x * (i as f64 + 0.5) / count as f64;
            let rest = Vector::new(x, CENTER.y);

            let anchor = scene.add_body(Body::new(
                Polygon::regular(rest, ANCHOR_RADIUS, BALL_SIDES)?,
                f64::INFINITY,
                Rgb::WHITE,
            ));
            let ball = scene.add_body(Body::new(
                Polygon::regular(rest + Vector::new(0.0, pulse(i)), BALL_RADIUS, BALL_SIDES)?,
                BALL_MASS,
                palette(i, count),
            ));

            scene.create_spring(SPRING_CONSTANT, ball, anchor)?;
            scene.create_drag(DRAG_CONSTANT, ball)?;
            balls.push(ball);
        }

        info!(
            "Damping demo: {} balls, {} force bindings",
            balls.len(),
            scene.force_count()
        );
        Ok(Self { scene, balls })
    }

    /// Largest distance of any ball from its rest height
    pub fn max_displacement(&self) -> f64 {
        self.balls
            .iter()
            .filter_map(|&ball| self.scene.body(ball))
            .map(|body| (body.centroid().y - CENTER.y).abs())
            .fold(0.0, f64::max)
    }
}

/// Initial offset of ball `i`: a quarter cosine falling off over the first balls
fn pulse(i: usize) -> f64 {
    if i < PULSE_WIDTH {
        let phase = i as f64 / PULSE_WIDTH as f64 * std::f64::consts::FRAC_PI_2;
        PULSE_HEIGHT * phase.cos()
    } else {
        0.0
    }
}

impl Demo for Damping {
    fn name(&self) -> &'static str {
        "damping"
    }

    fn scene(&self) -> &Scene {
        &self.scene
    }

    fn step(&mut self, dt: f64) -> Result<bool, PhysicsError> {
        self.scene.tick(dt);
        Ok(true)
    }
}
