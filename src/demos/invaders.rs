// Space invaders round played by an autopilot
//
// Every body carries a `Role` as its info. Lasers are bound to their targets
// with destructive collisions when fired, so hits are resolved by the scene.

use std::f64::consts::{PI, TAU};

use log::{debug, info};

use super::{Demo, WINDOW};
use crate::core::{Polygon, Rgb, Vector};
use crate::engine::physics::{Body, BodyHandle, PhysicsError, Scene};

// Enemy constants
const ENEMY_RADIUS: f64 = 40.0;
const ENEMY_ANGLE: f64 = 5.0 * PI / 6.0;
const ENEMY_LINE_SEGMENTS: usize = 10;
const ENEMIES_PER_ROW: usize = 8;
const ENEMY_ROWS: usize = 3;
const ENEMY_SPACING: f64 = 2.0 * ENEMY_RADIUS + 20.0;
const ENEMY_VERTICAL_MARGIN: f64 = 10.0;
const ENEMY_SPEED: f64 = 50.0;
const ENEMY_DROP: f64 = ENEMY_RADIUS + ENEMY_VERTICAL_MARGIN;
const ENEMY_SHOOT_INTERVAL: f64 = 0.5;
const EDGE_MARGIN: f64 = 3.0;
const ENEMY_COLOR: Rgb = Rgb { r: 0.3, g: 0.3, b: 0.3 };

// Player constants (the player is an ellipse)
const PLAYER_MAJOR_AXIS: f64 = 40.0;
const PLAYER_MINOR_AXIS: f64 = 15.0;
const PLAYER_LINE_SEGMENTS: usize = 20;
const PLAYER_BOTTOM_MARGIN: f64 = 30.0;
const PLAYER_SPEED: f64 = 300.0;
const PLAYER_SHOOT_INTERVAL: f64 = 0.25;

// Laser constants
const LASER_WIDTH: f64 = 2.0;
const LASER_HEIGHT: f64 = 8.0;
const ENEMY_LASER_SPEED: f64 = 100.0;
const PLAYER_LASER_SPEED: f64 = 500.0;
const PLAYER_LASER_COLOR: Rgb = Rgb { r: 1.0, g: 1.0, b: 0.0 };

/// What a body is in the game, stored as the body's info
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Enemy,
    Player,
    EnemyLaser,
    PlayerLaser,
}

impl Role {
    /// Role of `body`, if it carries one
    pub fn of(body: &Body) -> Option<Role> {
        body.info::<Role>().copied()
    }

    pub fn is_laser(self) -> bool {
        matches!(self, Role::EnemyLaser | Role::PlayerLaser)
    }
}

/// How the round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every enemy was shot down
    Victory,
    /// The player was hit or an enemy reached the ground
    Defeat,
}

pub struct Invaders {
    scene: Scene,
    player: BodyHandle,
    /// Horizontal direction of the enemy block (+1 right, -1 left)
    enemy_direction: f64,
    enemy_cooldown: f64,
    player_cooldown: f64,
    enemy_shots: usize,
    outcome: Option<Outcome>,
}

impl Invaders {
    pub fn new() -> Result<Self, PhysicsError> {
        let mut scene = Scene::new();

        let first_column = (WINDOW.x - (ENEMIES_PER_ROW - 1) as f64 * ENEMY_SPACING) / 2.0;
        for row in 0..ENEMY_ROWS {
            let y = WINDOW.y - ENEMY_VERTICAL_MARGIN - ENEMY_RADIUS - row as f64 * ENEMY_DROP;
            for column in 0..ENEMIES_PER_ROW {
                let x = first_column + column as f64 * ENEMY_SPACING;
                let enemy = Body::new(enemy_shape(Vector::new(x, y))?, 1.0, ENEMY_COLOR)
                    .with_info(Role::Enemy)
                    .with_velocity(Vector::new(ENEMY_SPEED, 0.0));
                scene.add_body(enemy);
            }
        }

        let player = Body::new(
            player_shape(Vector::new(WINDOW.x / 2.0, PLAYER_BOTTOM_MARGIN))?,
            1.0,
            Rgb::RED,
        )
        .with_info(Role::Player);
        let player = scene.add_body(player);

        info!("Invaders demo: {} enemies", scene.body_count() - 1);
        Ok(Self {
            scene,
            player,
            enemy_direction: 1.0,
            enemy_cooldown: ENEMY_SHOOT_INTERVAL,
            player_cooldown: PLAYER_SHOOT_INTERVAL,
            enemy_shots: 0,
            outcome: None,
        })
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn player(&self) -> BodyHandle {
        self.player
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Handles of every live body with `role`, in scene order
    pub fn bodies_with(&self, role: Role) -> Vec<BodyHandle> {
        self.scene
            .iter()
            .filter(|(_, body)| Role::of(body) == Some(role))
            .map(|(handle, _)| handle)
            .collect()
    }

    pub fn enemy_count(&self) -> usize {
        self.bodies_with(Role::Enemy).len()
    }

    /// Shoot upward from `from`; the laser destroys the first enemy it touches
    pub fn fire_player_laser(&mut self, from: Vector) -> Result<BodyHandle, PhysicsError> {
        let laser = self.spawn_laser(Role::PlayerLaser, from)?;
        for enemy in self.bodies_with(Role::Enemy) {
            self.scene.create_destructive_collision(enemy, laser)?;
        }
        Ok(laser)
    }

    /// Shoot downward from `from`; the laser destroys the player on contact
    pub fn fire_enemy_laser(&mut self, from: Vector) -> Result<BodyHandle, PhysicsError> {
        let laser = self.spawn_laser(Role::EnemyLaser, from)?;
        if self.scene.contains_body(self.player) {
            self.scene.create_destructive_collision(self.player, laser)?;
        }
        Ok(laser)
    }

    fn spawn_laser(&mut self, role: Role, from: Vector) -> Result<BodyHandle, PhysicsError> {
        let (velocity, color) = match role {
            Role::PlayerLaser => (Vector::new(0.0, PLAYER_LASER_SPEED), PLAYER_LASER_COLOR),
            _ => (Vector::new(0.0, -ENEMY_LASER_SPEED), Rgb::GREEN),
        };
        let shape = Polygon::rectangle(from, LASER_WIDTH, LASER_HEIGHT)?;
        let laser = Body::new(shape, 1.0, color)
            .with_info(role)
            .with_velocity(velocity);
        Ok(self.scene.add_body(laser))
    }

    fn fire_when_ready(&mut self, dt: f64) -> Result<(), PhysicsError> {
        self.player_cooldown -= dt;
        if self.player_cooldown <= 0.0 {
            self.player_cooldown += PLAYER_SHOOT_INTERVAL;
            if let Some(player) = self.scene.body(self.player) {
                let muzzle = player.centroid() + Vector::new(0.0, PLAYER_MINOR_AXIS);
                self.fire_player_laser(muzzle)?;
            }
        }

        self.enemy_cooldown -= dt;
        if self.enemy_cooldown <= 0.0 {
            self.enemy_cooldown += ENEMY_SHOOT_INTERVAL;
            let enemies = self.bodies_with(Role::Enemy);
            if !enemies.is_empty() {
                let shooter = enemies[self.enemy_shots % enemies.len()];
                self.enemy_shots += 1;
                if let Some(from) = self.scene.body(shooter).map(Body::centroid) {
                    self.fire_enemy_laser(from)?;
                }
            }
        }
        Ok(())
    }

    /// Reverse the enemy block and move it down once it reaches a side
    fn sweep_enemies(&mut self) {
        let enemies = self.bodies_with(Role::Enemy);
        let (left, right) = enemies
            .iter()
            .filter_map(|&enemy| self.scene.body(enemy))
            .map(|body| body.centroid().x)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), x| (min.min(x), max.max(x)));

        let at_right = self.enemy_direction > 0.0 && right > WINDOW.x - ENEMY_RADIUS - EDGE_MARGIN;
        let at_left = self.enemy_direction < 0.0 && left < ENEMY_RADIUS + EDGE_MARGIN;
        if !(at_right || at_left) {
            return;
        }

        self.enemy_direction = -self.enemy_direction;
        let velocity = Vector::new(self.enemy_direction * ENEMY_SPEED, 0.0);
        for enemy in enemies {
            if let Some(body) = self.scene.body_mut(enemy) {
                body.translate(Vector::new(0.0, -ENEMY_DROP));
                body.set_velocity(velocity);
            }
        }
        debug!("Enemy block turned, heading {}", self.enemy_direction);
    }

    /// Chase the lowest enemy, which is the most dangerous one
    fn steer_player(&mut self, dt: f64) {
        let target = self
            .scene
            .bodies()
            .iter()
            .filter(|body| Role::of(body) == Some(Role::Enemy))
            .map(Body::centroid)
            .min_by(|a, b| a.y.total_cmp(&b.y));

        let Some(target) = target else {
            return;
        };
        if let Some(player) = self.scene.body_mut(self.player) {
            let speed = ((target.x - player.centroid().x) / dt).clamp(-PLAYER_SPEED, PLAYER_SPEED);
            player.set_velocity(Vector::new(speed, 0.0));
        }
    }

    /// Remove lasers that have left the playfield
    fn cull_lasers(&mut self) {
        for body in self.scene.bodies_mut() {
            if !Role::of(body).is_some_and(Role::is_laser) {
                continue;
            }
            let center = body.centroid();
            let outside = center.x + LASER_WIDTH / 2.0 < 0.0
                || center.x - LASER_WIDTH / 2.0 > WINDOW.x
                || center.y + LASER_HEIGHT / 2.0 < 0.0
                || center.y - LASER_HEIGHT / 2.0 > WINDOW.y;
            if outside {
                body.mark_removed();
            }
        }
    }

    fn judge(&self) -> Option<Outcome> {
        if !self.scene.contains_body(self.player) {
            return Some(Outcome::Defeat);
        }

        let enemies = self.bodies_with(Role::Enemy);
        if enemies.is_empty() {
            return Some(Outcome::Victory);
        }

        let landed = enemies
            .iter()
            .filter_map(|&enemy| self.scene.body(enemy))
            .any(|body| body.vertices().iter().any(|v| v.y < 0.0));
        landed.then_some(Outcome::Defeat)
    }
}

impl Demo for Invaders {
    fn name(&self) -> &'static str {
        "invaders"
    }

    fn scene(&self) -> &Scene {
        &self.scene
    }

    fn step(&mut self, dt: f64) -> Result<bool, PhysicsError> {
        if self.outcome.is_some() {
            return Ok(false);
        }

        self.fire_when_ready(dt)?;
        self.sweep_enemies();
        self.steer_player(dt);
        self.cull_lasers();
        self.scene.tick(dt);

        self.outcome = self.judge();
        if let Some(outcome) = self.outcome {
            info!(
                "Invaders round over: {:?} with {} enemies left",
                outcome,
                self.enemy_count()
            );
        }
        Ok(self.outcome.is_none())
    }
}

/// Circular sector opening upward from `tip`
fn enemy_shape(tip: Vector) -> Result<Polygon, PhysicsError> {
    let increment = ENEMY_ANGLE / ENEMY_LINE_SEGMENTS as f64;
    let start = PI / 2.0 - ENEMY_ANGLE / 2.0 + increment / 2.0;

    let mut points = Vec::with_capacity(ENEMY_LINE_SEGMENTS + 1);
    points.push(tip);
    points.extend((0..ENEMY_LINE_SEGMENTS).map(|i| {
        let angle = start + i as f64 * increment;
        tip + Vector::new(angle.cos(), angle.sin()) * ENEMY_RADIUS
    }));
    Ok(Polygon::new(points)?)
}

fn player_shape(center: Vector) -> Result<Polygon, PhysicsError> {
    let points = (0..PLAYER_LINE_SEGMENTS)
        .map(|i| {
            let angle = TAU * i as f64 / PLAYER_LINE_SEGMENTS as f64;
            center + Vector::new(PLAYER_MAJOR_AXIS * angle.cos(), PLAYER_MINOR_AXIS * angle.sin())
        })
        .collect();
    Ok(Polygon::new(points)?)
}
