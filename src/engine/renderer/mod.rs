// Render read model: turns a scene into a flat triangle list

mod vertex;

pub use vertex::DrawVertex;

use crate::engine::physics::{Body, Scene};

/// Triangles for every body in a scene, ready for upload to a vertex buffer
///
/// Built fresh each frame. Nothing here writes back into the scene.
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    vertices: Vec<DrawVertex>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Triangulate every body of `scene` in scene order
    pub fn from_scene(scene: &Scene) -> Self {
        let mut list = Self::new();
        for body in scene.bodies() {
            list.push_body(body);
        }
        list
    }

    /// Append a body as a triangle fan around its first vertex
    pub fn push_body(&mut self, body: &Body) {
        let vertices = body.vertices();
        let Some((&pivot, rest)) = vertices.split_first() else {
            return;
        };

        let color = body.color();
        for edge in rest.windows(2) {
            self.vertices.push(DrawVertex::new(pivot, color));
            self.vertices.push(DrawVertex::new(edge[0], color));
            self.vertices.push(DrawVertex::new(edge[1], color));
        }
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    pub fn vertices(&self) -> &[DrawVertex] {
        &self.vertices
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Raw vertex data
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}
