// Stars falling under uniform gravity and bouncing on the floor
//
// Each star gets its own closure force binding pulling it down. A new star
// with one more point enters from the top left every few seconds, and stars
// are dropped once they drift past the right edge.

use std::f64::consts::PI;

use log::{debug, info};

use super::bounds::reflect_off_walls;
use super::{palette, Demo, WINDOW};
use crate::core::{Polygon, Vector};
use crate::engine::physics::{Body, BodyHandle, BoundBodies, PhysicsError, Scene};

const INNER_RADIUS: f64 = 20.0;
const OUTER_RADIUS: f64 = 40.0;
const FIRST_POINTS: usize = 4;
/// Downward acceleration
const GRAVITY: f64 = -100.0;
const ELASTICITY: f64 = 0.9;
const SPAWN_INTERVAL: f64 = PI;
const SPAWN_POSITION: Vector = Vector::new(OUTER_RADIUS, WINDOW.y - OUTER_RADIUS);
const SPAWN_VELOCITY: Vector = Vector::new(50.0, 0.0);
/// Number of distinct star colors before they repeat
const COLORS: usize = 8;

pub struct FallingStars {
    scene: Scene,
    next_points: usize,
    spawn_cooldown: f64,
}

impl FallingStars {
    pub fn new() -> Result<Self, PhysicsError> {
        let mut stars = Self {
            scene: Scene::new(),
            next_points: FIRST_POINTS,
            spawn_cooldown: SPAWN_INTERVAL,
        };
        stars.spawn_star()?;

        info!("Falling stars demo: a new star every {SPAWN_INTERVAL:.2}s");
        Ok(stars)
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Handles of the stars in flight, oldest first
    pub fn stars(&self) -> Vec<BodyHandle> {
        self.scene.iter().map(|(handle, _)| handle).collect()
    }

    /// Drop a new star at the top left, with one more point than the last
    pub fn spawn_star(&mut self) -> Result<BodyHandle, PhysicsError> {
        let points = self.next_points;
        self.next_points += 1;

        let shape = Polygon::star(SPAWN_POSITION, INNER_RADIUS, OUTER_RADIUS, points)?;
        let color = palette(points - FIRST_POINTS, COLORS);
        let star = Body::new(shape, 1.0, color).with_velocity(SPAWN_VELOCITY);
        let star = self.scene.add_body(star);

        let weight = |bodies: &mut BoundBodies<'_>| {
            let body = bodies.get_mut(0);
            let force = Vector::new(0.0, GRAVITY * body.mass());
            body.add_force(force);
        };
        self.scene.add_force_binding(weight, &[star])?;

        debug!("Spawned {points}-point star {:?}", star);
        Ok(star)
    }
}

impl Demo for FallingStars {
    fn name(&self) -> &'static str {
        "gravity"
    }

    fn scene(&self) -> &Scene {
        &self.scene
    }

    fn step(&mut self, dt: f64) -> Result<bool, PhysicsError> {
        self.spawn_cooldown -= dt;
        if self.spawn_cooldown <= 0.0 {
            self.spawn_cooldown += SPAWN_INTERVAL;
            self.spawn_star()?;
        }

        self.scene.tick(dt);

        let floor = Vector::new(f64::NEG_INFINITY, 0.0);
        let open = Vector::splat(f64::INFINITY);
        for body in self.scene.bodies_mut() {
            reflect_off_walls(body, floor, open, ELASTICITY);
            if body.centroid().x - OUTER_RADIUS > WINDOW.x {
                body.mark_removed();
            }
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demos::bounds::extent;
    use approx::assert_relative_eq;

    const DT: f64 = 1.0 / 120.0;

    #[test]
    fn test_first_star() {
        let stars = FallingStars::new().unwrap();
        let handles = stars.stars();
        assert_eq!(handles.len(), 1);
        assert_eq!(stars.scene().force_count(), 1);

        let star = stars.scene().body(handles[0]).unwrap();
        assert_eq!(star.vertices().len(), 2 * FIRST_POINTS);
        assert_eq!(star.velocity(), SPAWN_VELOCITY);
    }

    #[test]
    fn test_stars_fall_and_gain_points() {
        let mut stars = FallingStars::new().unwrap();
        for _ in 0..800 {
            stars.step(DT).unwrap();
        }

        let handles = stars.stars();
        assert_eq!(handles.len(), 3);
        assert_eq!(stars.scene().force_count(), 3);
        let sizes: Vec<usize> = handles
            .iter()
            .map(|&h| stars.scene().body(h).unwrap().vertices().len())
            .collect();
        assert_eq!(sizes, vec![8, 10, 12]);

        // The newest star has been falling for a moment, the oldest for longer
        let newest = stars.scene().body(handles[2]).unwrap();
        let oldest = stars.scene().body(handles[0]).unwrap();
        assert!(newest.velocity().y < 0.0);
        assert!(newest.centroid().x < oldest.centroid().x);
    }

    #[test]
    fn test_star_bounces_on_floor() {
        let mut stars = FallingStars::new().unwrap();
        let first = stars.stars()[0];

        for _ in 0..(6.0 / DT) as usize {
            let before = stars.scene().body(first).unwrap().velocity().y;
            stars.step(DT).unwrap();
            let star = stars.scene().body(first).unwrap();
            let after = star.velocity().y;

            if after > 0.0 {
                // Reversed, and a tenth slower than at impact
                assert!(before < 0.0);
                assert_relative_eq!(after, -ELASTICITY * (before + GRAVITY * DT), epsilon = 1e-9);
                assert!(extent(star.vertices()).0.y >= 0.0);
                return;
            }
        }
        panic!("the first star never bounced");
    }

    #[test]
    fn test_star_past_right_edge_is_dropped() {
        let mut stars = FallingStars::new().unwrap();
        let first = stars.stars()[0];
        stars
            .scene_mut()
            .body_mut(first)
            .unwrap()
            .set_centroid(Vector::new(WINDOW.x + OUTER_RADIUS + 1.0, 250.0));

        stars.step(DT).unwrap();
        stars.step(DT).unwrap();

        assert!(stars.scene().body(first).is_none());
        assert_eq!(stars.scene().force_count(), 0);
        assert!(stars.scene().is_empty());
    }
}
