use std::collections::{HashMap, HashSet};

use log::debug;

use super::body::Body;
use super::PhysicsError;

/// Handle to a body owned by a [`Scene`]
///
/// Handles are never reused, so a handle to a purged body simply stops resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(u64);

/// Handle to a force binding registered with a [`Scene`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ForceHandle(u64);

/// Something that pushes on the bodies it is bound to, once per tick
///
/// Implemented by the built-in gravity, spring, drag and collision generators,
/// and by any `FnMut(&mut BoundBodies)` closure.
pub trait ForceGenerator {
    fn apply(&mut self, bodies: &mut BoundBodies<'_>);

    /// Number of bodies the generator must be bound to, `None` for any
    fn arity(&self) -> Option<usize> {
        None
    }
}

impl<F> ForceGenerator for F
where
    F: FnMut(&mut BoundBodies<'_>),
{
    fn apply(&mut self, bodies: &mut BoundBodies<'_>) {
        self(bodies)
    }
}

/// The bodies a force binding names, in binding order
///
/// Index `i` is the `i`-th handle given to [`Scene::add_force_binding`].
pub struct BoundBodies<'a> {
    bodies: &'a mut [Body],
    slots: &'a [usize],
}

impl<'a> BoundBodies<'a> {
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, index: usize) -> &Body {
        &self.bodies[self.slots[index]]
    }

    pub fn get_mut(&mut self, index: usize) -> &mut Body {
        &mut self.bodies[self.slots[index]]
    }

    /// Mutable access to two different bound bodies at once
    ///
    /// # Panics
    ///
    /// Panics if `first == second` or either index is out of range.
    pub fn pair_mut(&mut self, first: usize, second: usize) -> (&mut Body, &mut Body) {
        let (a, b) = (self.slots[first], self.slots[second]);
        assert_ne!(a, b, "pair_mut needs two distinct bodies");

        if a < b {
            let (low, high) = self.bodies.split_at_mut(b);
            (&mut low[a], &mut high[0])
        } else {
            let (low, high) = self.bodies.split_at_mut(a);
            (&mut high[0], &mut low[b])
        }
    }
}

/// A registered force generator plus the bodies it is about
struct ForceBinding {
    handle: ForceHandle,
    generator: Box<dyn ForceGenerator>,
    bodies: Vec<BodyHandle>,
    /// Positions of `bodies` in the scene's body list, refreshed on purge
    slots: Vec<usize>,
}

/// Owns every body and every force binding of a simulation
///
/// Each [`Scene::tick`] applies all bindings, integrates all bodies, then purges
/// bodies marked removed together with every binding that names them.
pub struct Scene {
    /// Bodies in insertion order
    bodies: Vec<Body>,

    /// Handle of each body, parallel to `bodies`
    handles: Vec<BodyHandle>,

    /// Handle to position in `bodies`
    slots: HashMap<BodyHandle, usize>,

    /// Force bindings in insertion order
    forces: Vec<ForceBinding>,

    next_body: u64,
    next_force: u64,
}

impl Scene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self {
            bodies: Vec::new(),
            handles: Vec::new(),
            slots: HashMap::new(),
            forces: Vec::new(),
            next_body: 0,
            next_force: 0,
        }
    }

    /// Take ownership of a body
    pub fn add_body(&mut self, body: Body) -> BodyHandle {
        let handle = BodyHandle(self.next_body);
        self.next_body += 1;

        self.slots.insert(handle, self.bodies.len());
        self.bodies.push(body);
        self.handles.push(handle);
        handle
    }

    /// Register a force generator acting on `bodies`
    ///
    /// The binding is dropped automatically once any of `bodies` is purged.
    pub fn add_force_binding<G>(
        &mut self,
        generator: G,
        bodies: &[BodyHandle],
    ) -> Result<ForceHandle, PhysicsError>
    where
        G: ForceGenerator + 'static,
    {
        if let Some(expected) = generator.arity() {
            if bodies.len() != expected {
                return Err(PhysicsError::WrongBodyCount {
                    expected,
                    actual: bodies.len(),
                });
            }
        }

        let mut slots = Vec::with_capacity(bodies.len());
        for (i, handle) in bodies.iter().enumerate() {
            if bodies[..i].contains(handle) {
                return Err(PhysicsError::DuplicateBody(*handle));
            }
            let slot = self
                .slots
                .get(handle)
                .ok_or(PhysicsError::UnknownBody(*handle))?;
            slots.push(*slot);
        }

        let handle = ForceHandle(self.next_force);
        self.next_force += 1;

        self.forces.push(ForceBinding {
            handle,
            generator: Box::new(generator),
            bodies: bodies.to_vec(),
            slots,
        });
        Ok(handle)
    }

    /// Drop a force binding before its bodies go away
    pub fn remove_force(&mut self, handle: ForceHandle) -> bool {
        match self.forces.iter().position(|f| f.handle == handle) {
            Some(index) => {
                self.forces.remove(index);
                debug!("Removed force binding {:?}", handle);
                true
            }
            None => false,
        }
    }

    /// Mark a body for removal at the end of the next tick
    pub fn remove_body(&mut self, handle: BodyHandle) -> bool {
        match self.body_mut(handle) {
            Some(body) => {
                body.mark_removed();
                true
            }
            None => false,
        }
    }

    /// Advance the simulation by `dt`
    pub fn tick(&mut self, dt: f64) {
        for binding in &mut self.forces {
            let mut bound = BoundBodies {
                bodies: &mut self.bodies,
                slots: &binding.slots,
            };
            binding.generator.apply(&mut bound);
        }

        for body in &mut self.bodies {
            body.tick(dt);
        }

        self.purge_removed();
    }

    /// Drop removed bodies and every binding that names one of them
    fn purge_removed(&mut self) {
        if !self.bodies.iter().any(Body::is_removed) {
            return;
        }

        let mut purged = HashSet::new();
        let mut bodies = Vec::with_capacity(self.bodies.len());
        let mut handles = Vec::with_capacity(self.handles.len());
        for (handle, body) in self.handles.drain(..).zip(self.bodies.drain(..)) {
            if body.is_removed() {
                purged.insert(handle);
            } else {
                bodies.push(body);
                handles.push(handle);
            }
        }
        self.bodies = bodies;
        self.handles = handles;

        let binding_count = self.forces.len();
        self.forces
            .retain(|binding| !binding.bodies.iter().any(|h| purged.contains(h)));

        debug!(
            "Purged {} bodies and {} force bindings",
            purged.len(),
            binding_count - self.forces.len()
        );

        self.reindex();
    }

    /// Rebuild handle lookups after the body list changed
    fn reindex(&mut self) {
        self.slots.clear();
        for (slot, handle) in self.handles.iter().enumerate() {
            self.slots.insert(*handle, slot);
        }
        for binding in &mut self.forces {
            binding.slots = binding.bodies.iter().map(|h| self.slots[h]).collect();
        }
    }

    /// All bodies in scene order
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn bodies_mut(&mut self) -> &mut [Body] {
        &mut self.bodies
    }

    /// Bodies in scene order, with their handles
    pub fn iter(&self) -> impl Iterator<Item = (BodyHandle, &Body)> {
        self.handles.iter().copied().zip(self.bodies.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (BodyHandle, &mut Body)> {
        self.handles.iter().copied().zip(self.bodies.iter_mut())
    }

    pub fn body(&self, handle: BodyHandle) -> Option<&Body> {
        self.slots.get(&handle).map(|&slot| &self.bodies[slot])
    }

    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        self.slots.get(&handle).map(|&slot| &mut self.bodies[slot])
    }

    /// The body at position `index` in scene order
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.body_count()`.
    pub fn body_at(&self, index: usize) -> &Body {
        &self.bodies[index]
    }

    /// Handle of the body at position `index`
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.body_count()`.
    pub fn handle_at(&self, index: usize) -> BodyHandle {
        self.handles[index]
    }

    pub fn contains_body(&self, handle: BodyHandle) -> bool {
        self.slots.contains_key(&handle)
    }

    pub fn contains_force(&self, handle: ForceHandle) -> bool {
        self.forces.iter().any(|f| f.handle == handle)
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn force_count(&self) -> usize {
        self.forces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Polygon, Rgb, Vector, ZERO};
    use std::cell::Cell;
    use std::rc::Rc;

    fn square_body(x: f64) -> Body {
        let shape = Polygon::rectangle(Vector::new(x, 0.0), 2.0, 2.0).unwrap();
        Body::new(shape, 1.0, Rgb::BLACK)
    }

    fn noop(_: &mut BoundBodies<'_>) {}

    #[test]
    fn test_add_body_keeps_insertion_order() {
        let mut scene = Scene::new();
        let a = scene.add_body(square_body(0.0));
        let b = scene.add_body(square_body(10.0));

        assert_eq!(scene.body_count(), 2);
        assert_ne!(a, b);
        assert_eq!(scene.handle_at(0), a);
        assert_eq!(scene.handle_at(1), b);
        assert_eq!(scene.body(b).unwrap().centroid(), scene.body_at(1).centroid());
    }

    #[test]
    #[should_panic]
    fn test_body_at_out_of_range_panics() {
        let scene = Scene::new();
        scene.body_at(0);
    }

    #[test]
    fn test_binding_rejects_unknown_and_duplicate_bodies() {
        let mut scene = Scene::new();
        let a = scene.add_body(square_body(0.0));

        let mut other = Scene::new();
        other.add_body(square_body(0.0));
        let stranger = other.add_body(square_body(5.0));

        assert_eq!(
            scene.add_force_binding(noop, &[a, stranger]).unwrap_err(),
            PhysicsError::UnknownBody(stranger)
        );
        assert_eq!(
            scene.add_force_binding(noop, &[a, a]).unwrap_err(),
            PhysicsError::DuplicateBody(a)
        );
        assert_eq!(scene.force_count(), 0);
    }

    #[test]
    fn test_binding_checks_generator_arity() {
        struct Pair;
        impl ForceGenerator for Pair {
            fn apply(&mut self, bodies: &mut BoundBodies<'_>) {
                bodies.pair_mut(0, 1);
            }

            fn arity(&self) -> Option<usize> {
                Some(2)
            }
        }

        let mut scene = Scene::new();
        let a = scene.add_body(square_body(0.0));
        let b = scene.add_body(square_body(5.0));
        let c = scene.add_body(square_body(10.0));

        assert_eq!(
            scene.add_force_binding(Pair, &[a]).unwrap_err(),
            PhysicsError::WrongBodyCount {
                expected: 2,
                actual: 1
            }
        );
        assert_eq!(
            scene.add_force_binding(Pair, &[a, b, c]).unwrap_err(),
            PhysicsError::WrongBodyCount {
                expected: 2,
                actual: 3
            }
        );
        assert!(scene.add_force_binding(Pair, &[a, b]).is_ok());

        // Closures take any number of bodies
        assert!(scene.add_force_binding(noop, &[a, b, c]).is_ok());
        scene.tick(0.1);
        assert_eq!(scene.force_count(), 2);
    }

    #[test]
    fn test_forces_apply_before_integration() {
        let mut scene = Scene::new();
        let a = scene.add_body(square_body(0.0));
        scene
            .add_force_binding(
                |bodies: &mut BoundBodies<'_>| bodies.get_mut(0).add_force(Vector::new(2.0, 0.0)),
                &[a],
            )
            .unwrap();

        scene.tick(1.0);

        let body = scene.body(a).unwrap();
        assert_eq!(body.velocity(), Vector::new(2.0, 0.0));
        assert_eq!(body.force(), ZERO);
    }

    #[test]
    fn test_bound_bodies_follow_binding_order() {
        let mut scene = Scene::new();
        let a = scene.add_body(square_body(0.0));
        let b = scene.add_body(square_body(10.0));
        let seen = Rc::new(Cell::new(0.0));

        let recorder = seen.clone();
        scene
            .add_force_binding(
                move |bodies: &mut BoundBodies<'_>| {
                    assert_eq!(bodies.len(), 2);
                    recorder.set(bodies.get(0).centroid().x);
                    let (first, second) = bodies.pair_mut(0, 1);
                    first.add_force(Vector::new(1.0, 0.0));
                    second.add_force(Vector::new(-1.0, 0.0));
                },
                &[b, a],
            )
            .unwrap();

        scene.tick(1.0);

        assert!((seen.get() - 10.0).abs() < 1e-12, "first bound body is b");
        assert_eq!(scene.body(b).unwrap().velocity(), Vector::new(1.0, 0.0));
        assert_eq!(scene.body(a).unwrap().velocity(), Vector::new(-1.0, 0.0));
    }

    #[test]
    fn test_removal_is_deferred_to_tick() {
        let mut scene = Scene::new();
        let a = scene.add_body(square_body(0.0));
        let b = scene.add_body(square_body(10.0));

        assert!(scene.remove_body(a));
        assert!(scene.body(a).unwrap().is_removed(), "still present until the tick");
        assert_eq!(scene.body_count(), 2);

        scene.tick(0.1);

        assert!(scene.body(a).is_none());
        assert!(!scene.contains_body(a));
        assert!(!scene.remove_body(a), "stale handles don't resolve");
        assert_eq!(scene.body_count(), 1);
        assert_eq!(scene.handle_at(0), b);
    }

    #[test]
    fn test_purge_drops_bindings_naming_removed_body() {
        let mut scene = Scene::new();
        let a = scene.add_body(square_body(0.0));
        let b = scene.add_body(square_body(10.0));
        let c = scene.add_body(square_body(20.0));

        let ab = scene.add_force_binding(noop, &[a, b]).unwrap();
        let bc = scene.add_force_binding(noop, &[b, c]).unwrap();
        let just_c = scene.add_force_binding(noop, &[c]).unwrap();

        scene.body_mut(a).unwrap().mark_removed();
        scene.tick(0.1);

        assert!(!scene.contains_force(ab));
        assert!(scene.contains_force(bc));
        assert!(scene.contains_force(just_c));
        assert_eq!(scene.force_count(), 2);

        scene.remove_body(b);
        scene.tick(0.1);

        assert!(!scene.contains_force(bc));
        assert!(scene.contains_force(just_c));
        assert_eq!(scene.body_count(), 1);
    }

    #[test]
    fn test_bindings_resolve_after_purge_shifts_bodies() {
        let mut scene = Scene::new();
        let a = scene.add_body(square_body(0.0));
        let b = scene.add_body(square_body(10.0));
        scene
            .add_force_binding(
                |bodies: &mut BoundBodies<'_>| bodies.get_mut(0).add_force(Vector::new(0.0, 1.0)),
                &[b],
            )
            .unwrap();

        scene.remove_body(a);
        scene.tick(1.0);
        scene.tick(1.0);

        // b moved to slot 0; the binding must still push b
        assert_eq!(scene.body(b).unwrap().velocity(), Vector::new(0.0, 2.0));
    }

    #[test]
    fn test_purge_drops_generator_and_body_info() {
        struct DropFlag(Rc<Cell<u32>>);
        impl Drop for DropFlag {
            fn drop(&mut self) {
                self.0.set(self.0.get() + 1);
            }
        }

        let drops = Rc::new(Cell::new(0));
        let mut scene = Scene::new();
        let a = scene.add_body(square_body(0.0).with_info(DropFlag(drops.clone())));

        struct Holder(DropFlag);
        impl ForceGenerator for Holder {
            fn apply(&mut self, _: &mut BoundBodies<'_>) {}
        }

        scene
            .add_force_binding(Holder(DropFlag(drops.clone())), &[a])
            .unwrap();

        scene.remove_body(a);
        scene.tick(0.1);

        assert_eq!(drops.get(), 2, "body info and binding state are both dropped");
        assert_eq!(scene.force_count(), 0);
    }

    #[test]
    fn test_remove_force() {
        let mut scene = Scene::new();
        let a = scene.add_body(square_body(0.0));
        let force = scene.add_force_binding(noop, &[a]).unwrap();

        assert!(scene.remove_force(force));
        assert!(!scene.remove_force(force));
        assert_eq!(scene.force_count(), 0);
        assert!(scene.contains_body(a));
    }

    #[test]
    fn test_iter_pairs_handles_with_bodies() {
        let mut scene = Scene::new();
        let a = scene.add_body(square_body(0.0));
        let b = scene.add_body(square_body(10.0));

        for (_, body) in scene.iter_mut() {
            body.set_velocity(Vector::new(1.0, 1.0));
        }
        let handles: Vec<_> = scene.iter().map(|(handle, _)| handle).collect();

        assert_eq!(handles, vec![a, b]);
        assert!(scene.bodies().iter().all(|body| body.velocity() == Vector::new(1.0, 1.0)));
    }
}
