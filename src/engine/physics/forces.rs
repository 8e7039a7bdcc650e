// Built-in force generators: gravity, spring and drag

use log::trace;

use super::scene::{BodyHandle, BoundBodies, ForceGenerator, ForceHandle, Scene};
use super::PhysicsError;

/// Below this centroid distance gravity is skipped to avoid the singularity
pub const DEFAULT_MIN_DISTANCE: f64 = 5.0;

/// Newtonian attraction `G * m1 * m2 / d^2` between two bodies
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gravity {
    constant: f64,
    min_distance: f64,
}

impl Gravity {
    pub fn new(constant: f64) -> Self {
        Self {
            constant,
            min_distance: DEFAULT_MIN_DISTANCE,
        }
    }

    /// Change the distance under which the pair is left alone for a tick
    pub fn with_min_distance(mut self, min_distance: f64) -> Self {
        self.min_distance = min_distance;
        self
    }

    pub fn constant(&self) -> f64 {
        self.constant
    }

    pub fn min_distance(&self) -> f64 {
        self.min_distance
    }
}

impl ForceGenerator for Gravity {
    fn apply(&mut self, bodies: &mut BoundBodies<'_>) {
        let (first, second) = bodies.pair_mut(0, 1);

        let offset = second.centroid() - first.centroid();
        let distance = offset.length();
        if distance < self.min_distance {
            trace!("Skipping gravity at distance {distance}");
            return;
        }

        let magnitude = self.constant * first.mass() * second.mass() / (distance * distance);
        let force = offset * (magnitude / distance);
        first.add_force(force);
        second.add_force(-force);
    }

    fn arity(&self) -> Option<usize> {
        Some(2)
    }
}

/// Hooke's law spring with natural length zero: `K * (c2 - c1)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    constant: f64,
}

impl Spring {
    pub fn new(constant: f64) -> Self {
        Self { constant }
    }

    pub fn constant(&self) -> f64 {
        self.constant
    }
}

impl ForceGenerator for Spring {
    fn apply(&mut self, bodies: &mut BoundBodies<'_>) {
        let (first, second) = bodies.pair_mut(0, 1);

        let force = (second.centroid() - first.centroid()) * self.constant;
        first.add_force(force);
        second.add_force(-force);
    }

    fn arity(&self) -> Option<usize> {
        Some(2)
    }
}

/// Linear drag `-D * v` on a single body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drag {
    constant: f64,
}

impl Drag {
    pub fn new(constant: f64) -> Self {
        Self { constant }
    }

    pub fn constant(&self) -> f64 {
        self.constant
    }
}

impl ForceGenerator for Drag {
    fn apply(&mut self, bodies: &mut BoundBodies<'_>) {
        let body = bodies.get_mut(0);
        let force = body.velocity() * -self.constant;
        body.add_force(force);
    }

    fn arity(&self) -> Option<usize> {
        Some(1)
    }
}

impl Scene {
    /// Bind mutual gravity between two bodies
    pub fn create_gravity(
        &mut self,
        constant: f64,
        first: BodyHandle,
        second: BodyHandle,
    ) -> Result<ForceHandle, PhysicsError> {
        self.add_force_binding(Gravity::new(constant), &[first, second])
    }

    /// Tie two bodies together with a spring
    pub fn create_spring(
        &mut self,
        constant: f64,
        first: BodyHandle,
        second: BodyHandle,
    ) -> Result<ForceHandle, PhysicsError> {
        self.add_force_binding(Spring::new(constant), &[first, second])
    }

    /// Slow a body down in proportion to its velocity
    pub fn create_drag(
        &mut self,
        constant: f64,
        body: BodyHandle,
    ) -> Result<ForceHandle, PhysicsError> {
        self.add_force_binding(Drag::new(constant), &[body])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Polygon, Rgb, Vector, ZERO};
    use crate::engine::physics::Body;
    use approx::assert_abs_diff_eq;

    /// Square with half-extent 1, centered on the origin
    fn make_shape() -> Polygon {
        Polygon::new(vec![
            Vector::new(-1.0, -1.0),
            Vector::new(1.0, -1.0),
            Vector::new(1.0, 1.0),
            Vector::new(-1.0, 1.0),
        ])
        .unwrap()
    }

    fn gravity_force(g: f64, first: &Body, second: &Body) -> f64 {
        let distance = (second.centroid() - first.centroid()).length();
        g * first.mass() * second.mass() / (distance * distance)
    }

    /// Two bodies 20 apart, masses 5 and 10, G = 100
    fn binary_scene() -> (Scene, BodyHandle, BodyHandle) {
        let mut scene = Scene::new();
        let light = scene.add_body(Body::new(make_shape(), 5.0, Rgb::BLACK));
        let mut heavy = Body::new(make_shape(), 10.0, Rgb::BLACK);
        heavy.set_centroid(Vector::new(20.0, 0.0));
        let heavy = scene.add_body(heavy);
        scene.create_gravity(100.0, light, heavy).unwrap();
        (scene, light, heavy)
    }

    #[test]
    fn test_gravity_matches_newton() {
        const DT: f64 = 1e-6;
        const STEPS: usize = 100_000;
        let (mut scene, light, heavy) = binary_scene();

        for _ in 0..STEPS {
            let last_velocity = scene.body(light).unwrap().velocity();
            assert!(scene.body(light).unwrap().centroid().x < scene.body(heavy).unwrap().centroid().x);

            scene.tick(DT);

            let first = scene.body(light).unwrap();
            let second = scene.body(heavy).unwrap();
            let acceleration = (first.velocity().x - last_velocity.x) / DT;
            assert_abs_diff_eq!(
                first.mass() * acceleration,
                gravity_force(100.0, first, second),
                epsilon = 1e-4
            );
        }
    }

    #[test]
    fn test_gravity_distance_follows_kinematics() {
        const DT: f64 = 1e-6;
        const STEPS: usize = 100_000;
        let (mut scene, light, heavy) = binary_scene();

        let separation = |scene: &Scene| {
            scene.body(heavy).unwrap().centroid().x - scene.body(light).unwrap().centroid().x
        };

        for _ in 0..STEPS {
            let first = scene.body(light).unwrap();
            let second = scene.body(heavy).unwrap();
            assert!(first.centroid().x < second.centroid().x);

            let force = gravity_force(100.0, first, second);
            let dx1 = first.velocity().x * DT + 0.5 * (force / first.mass()) * DT * DT;
            let dx2 = second.velocity().x * DT - 0.5 * (force / second.mass()) * DT * DT;
            let expected = separation(&scene) - dx1 + dx2;

            scene.tick(DT);

            assert_abs_diff_eq!(separation(&scene), expected, epsilon = 1e-3);
        }
        assert!(separation(&scene) < 20.0, "the bodies approach each other");
    }

    #[test]
    fn test_gravity_skipped_below_min_distance() {
        let mut scene = Scene::new();
        let a = scene.add_body(Body::new(make_shape(), 1.0, Rgb::BLACK));
        let mut far = Body::new(make_shape(), 1.0, Rgb::BLACK);
        far.set_centroid(Vector::new(3.0, 0.0));
        let b = scene.add_body(far);
        scene.create_gravity(10.0, a, b).unwrap();

        scene.tick(1.0);
        assert_eq!(scene.body(a).unwrap().velocity(), ZERO);

        let mut scene = Scene::new();
        let a = scene.add_body(Body::new(make_shape(), 1.0, Rgb::BLACK));
        let mut far = Body::new(make_shape(), 1.0, Rgb::BLACK);
        far.set_centroid(Vector::new(3.0, 0.0));
        let b = scene.add_body(far);
        scene
            .add_force_binding(Gravity::new(10.0).with_min_distance(1.0), &[a, b])
            .unwrap();

        scene.tick(1.0);
        assert!(scene.body(a).unwrap().velocity().x > 0.0);
    }

    #[test]
    fn test_builtin_generators_reject_wrong_body_count() {
        let mut scene = Scene::new();
        let a = scene.add_body(Body::new(make_shape(), 1.0, Rgb::BLACK));
        let mut far = Body::new(make_shape(), 1.0, Rgb::BLACK);
        far.set_centroid(Vector::new(10.0, 0.0));
        let b = scene.add_body(far);

        let one = PhysicsError::WrongBodyCount {
            expected: 2,
            actual: 1,
        };
        assert_eq!(scene.add_force_binding(Gravity::new(1.0), &[a]), Err(one.clone()));
        assert_eq!(scene.add_force_binding(Spring::new(1.0), &[a]), Err(one));
        assert_eq!(
            scene.add_force_binding(Drag::new(1.0), &[a, b]),
            Err(PhysicsError::WrongBodyCount {
                expected: 1,
                actual: 2
            })
        );
        assert_eq!(scene.force_count(), 0);

        // Nothing half-bound is left behind to fail during the tick
        scene.tick(0.1);
        assert_eq!(scene.body_count(), 2);
    }

    #[test]
    fn test_spring_is_simple_harmonic() {
        const M: f64 = 10.0;
        const K: f64 = 2.0;
        const A: f64 = 3.0;
        const DT: f64 = 1e-6;
        const STEPS: usize = 1_000_000;

        let mut scene = Scene::new();
        let mut mass = Body::new(make_shape(), M, Rgb::BLACK);
        mass.set_centroid(Vector::new(A, 0.0));
        let mass = scene.add_body(mass);
        let anchor = scene.add_body(Body::new(make_shape(), f64::INFINITY, Rgb::BLACK));
        scene.create_spring(K, mass, anchor).unwrap();

        let omega = (K / M).sqrt();
        for i in 0..STEPS {
            let t = DT * i as f64;
            let velocity = scene.body(mass).unwrap().velocity();
            assert_abs_diff_eq!(velocity.x, -A * omega * (omega * t).sin(), epsilon = 1e-5);
            assert_abs_diff_eq!(velocity.y, 0.0, epsilon = 1e-5);
            assert_eq!(scene.body(anchor).unwrap().centroid(), ZERO);

            scene.tick(DT);
        }
    }

    #[test]
    fn test_drag_opposes_velocity() {
        let mut scene = Scene::new();
        let body = scene.add_body(Body::new(make_shape(), 2.0, Rgb::BLACK).with_velocity(Vector::new(4.0, -2.0)));
        scene.create_drag(0.5, body).unwrap();

        scene.tick(1.0);

        // F = -0.5 * (4, -2) = (-2, 1), a = F / 2
        assert_eq!(scene.body(body).unwrap().velocity(), Vector::new(3.0, -1.5));
    }

    #[test]
    fn test_spring_forces_are_equal_and_opposite() {
        let mut scene = Scene::new();
        let a = scene.add_body(Body::new(make_shape(), 1.0, Rgb::BLACK));
        let mut other = Body::new(make_shape(), 1.0, Rgb::BLACK);
        other.set_centroid(Vector::new(0.0, 4.0));
        let b = scene.add_body(other);
        scene.create_spring(0.5, a, b).unwrap();

        scene.tick(1.0);

        assert_abs_diff_eq!(scene.body(a).unwrap().velocity().y, 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(scene.body(b).unwrap().velocity().y, -2.0, epsilon = 1e-12);
    }
}
