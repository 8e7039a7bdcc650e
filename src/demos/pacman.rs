// Pacman chasing pellets around a wraparound playfield
//
// Pellets appear once a second. Each one is bound to pacman with an `Eat`
// generator that removes only the pellet on contact. An autopilot steers
// pacman along one axis at a time toward the nearest pellet, turning the
// mouth to face where it is going.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use log::{debug, info, trace};

use super::bounds::wrap_around;
use super::{Demo, WINDOW};
use crate::core::{Polygon, Rgb, Vector};
use crate::engine::physics::{
    overlaps, Body, BodyHandle, BoundBodies, ForceGenerator, PhysicsError, Scene,
};

// Pacman constants
const PACMAN_RADIUS: f64 = 30.0;
const PACMAN_SIDES: usize = 48;
/// Total opening angle of the mouth
const MOUTH_ANGLE: f64 = PI / 3.0;
const PACMAN_MASS: f64 = 2.0;
const PACMAN_SPAWN: Vector = Vector::new(200.0, 200.0);
const PACMAN_SPEED: f64 = 150.0;
const PACMAN_COLOR: Rgb = Rgb { r: 0.5, g: 1.0, b: 0.0 };

// Pellet constants
const PELLET_RADIUS: f64 = 5.0;
const PELLET_SIDES: usize = 10;
const PELLET_INTERVAL: f64 = 1.0;
const PELLET_MARGIN: f64 = 20.0;

/// Direction pacman is moving and facing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heading {
    Right,
    Up,
    Left,
    Down,
}

impl Heading {
    /// Orientation of the mouth, counterclockwise from +x
    pub fn angle(self) -> f64 {
        match self {
            Heading::Right => 0.0,
            Heading::Up => FRAC_PI_2,
            Heading::Left => PI,
            Heading::Down => 3.0 * FRAC_PI_2,
        }
    }

    pub fn direction(self) -> Vector {
        match self {
            Heading::Right => Vector::X,
            Heading::Up => Vector::Y,
            Heading::Left => -Vector::X,
            Heading::Down => -Vector::Y,
        }
    }

    /// Axis-aligned heading that closes the larger component of `offset`
    fn toward(offset: Vector) -> Heading {
        if offset.x.abs() >= offset.y.abs() {
            if offset.x >= 0.0 {
                Heading::Right
            } else {
                Heading::Left
            }
        } else if offset.y >= 0.0 {
            Heading::Up
        } else {
            Heading::Down
        }
    }
}

/// Removes the second bound body when it touches the first, which survives
#[derive(Debug, Clone, Copy, Default)]
pub struct Eat;

impl ForceGenerator for Eat {
    fn apply(&mut self, bodies: &mut BoundBodies<'_>) {
        let (eater, food) = bodies.pair_mut(0, 1);
        if overlaps(eater.vertices(), food.vertices()) {
            trace!("Eating body at {:?}", food.centroid());
            food.mark_removed();
        }
    }

    fn arity(&self) -> Option<usize> {
        Some(2)
    }
}

pub struct Pacman {
    scene: Scene,
    pacman: BodyHandle,
    pellets: Vec<BodyHandle>,
    heading: Heading,
    pellet_cooldown: f64,
    spawned: usize,
    eaten: usize,
}

impl Pacman {
    pub fn new() -> Result<Self, PhysicsError> {
        let mut scene = Scene::new();
        let pacman = Body::new(pacman_shape(PACMAN_SPAWN)?, PACMAN_MASS, PACMAN_COLOR)
            .with_velocity(Heading::Right.direction() * PACMAN_SPEED);
        let pacman = scene.add_body(pacman);

        info!("Pacman demo: a pellet every {PELLET_INTERVAL}s");
        Ok(Self {
            scene,
            pacman,
            pellets: Vec::new(),
            heading: Heading::Right,
            pellet_cooldown: PELLET_INTERVAL,
            spawned: 0,
            eaten: 0,
        })
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn pacman(&self) -> BodyHandle {
        self.pacman
    }

    pub fn heading(&self) -> Heading {
        self.heading
    }

    /// Pellets still on the board
    pub fn pellets(&self) -> &[BodyHandle] {
        &self.pellets
    }

    pub fn eaten(&self) -> usize {
        self.eaten
    }

    /// Head in `heading` at full speed with the mouth facing forward
    pub fn turn(&mut self, heading: Heading) {
        if let Some(body) = self.scene.body_mut(self.pacman) {
            body.set_velocity(heading.direction() * PACMAN_SPEED);
            body.set_rotation(heading.angle());
        }
        if heading != self.heading {
            trace!("Pacman turned {:?}", heading);
        }
        self.heading = heading;
    }

    /// Place a pellet at `at` that pacman eats on contact
    pub fn spawn_pellet(&mut self, at: Vector) -> Result<BodyHandle, PhysicsError> {
        let shape = Polygon::regular(at, PELLET_RADIUS, PELLET_SIDES)?;
        let pellet = self.scene.add_body(Body::new(shape, 1.0, Rgb::RED));
        self.scene.add_force_binding(Eat, &[self.pacman, pellet])?;
        self.pellets.push(pellet);
        self.spawned += 1;
        Ok(pellet)
    }

    /// Scattered but repeatable pellet positions inside the margins
    fn next_pellet_position(&self) -> Vector {
        // Fractional parts of multiples of irrational numbers spread evenly
        let n = self.spawned as f64 + 1.0;
        let fraction = Vector::new((n * 0.618_033_988_75).fract(), (n * 0.754_877_666_25).fract());
        let span = WINDOW - Vector::splat(2.0 * PELLET_MARGIN);
        Vector::splat(PELLET_MARGIN) + fraction * span
    }

    /// Aim at the nearest pellet, or keep going if there is none
    fn steer(&mut self) {
        let Some(from) = self.scene.body(self.pacman).map(Body::centroid) else {
            return;
        };
        let nearest = self
            .pellets
            .iter()
            .filter_map(|&pellet| self.scene.body(pellet))
            .map(Body::centroid)
            .min_by(|a, b| a.distance_squared(from).total_cmp(&b.distance_squared(from)));

        if let Some(target) = nearest {
            self.turn(Heading::toward(target - from));
        }
    }

    /// Forget pellets the scene purged and count them as eaten
    fn count_eaten(&mut self) {
        let before = self.pellets.len();
        let scene = &self.scene;
        self.pellets.retain(|&pellet| scene.contains_body(pellet));
        let eaten = before - self.pellets.len();
        if eaten > 0 {
            self.eaten += eaten;
            debug!("Pacman ate {eaten} pellets, {} so far", self.eaten);
        }
    }
}

impl Demo for Pacman {
    fn name(&self) -> &'static str {
        "pacman"
    }

    fn scene(&self) -> &Scene {
        &self.scene
    }

    fn step(&mut self, dt: f64) -> Result<bool, PhysicsError> {
        self.pellet_cooldown -= dt;
        if self.pellet_cooldown <= 0.0 {
            self.pellet_cooldown += PELLET_INTERVAL;
            let at = self.next_pellet_position();
            self.spawn_pellet(at)?;
        }

        self.steer();
        self.scene.tick(dt);
        self.count_eaten();

        if let Some(body) = self.scene.body_mut(self.pacman) {
            if wrap_around(body, WINDOW) {
                debug!("Pacman wrapped to {:?}", body.centroid());
            }
        }
        Ok(true)
    }
}

/// Disc with a wedge cut out, mouth facing +x
fn pacman_shape(center: Vector) -> Result<Polygon, PhysicsError> {
    let increment = TAU / PACMAN_SIDES as f64;
    let half_mouth = MOUTH_ANGLE / 2.0;

    let mut points = vec![center];
    points.extend(
        (0..PACMAN_SIDES)
            .map(|i| i as f64 * increment)
            .filter(|&angle| angle >= half_mouth && angle <= TAU - half_mouth)
            .map(|angle| center + Vector::new(angle.cos(), angle.sin()) * PACMAN_RADIUS),
    );
    Ok(Polygon::new(points)?)
}
