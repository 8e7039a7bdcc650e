// Vertex structure for flat-shaded polygon rendering

use bytemuck::{Pod, Zeroable};

use crate::core::{Rgb, Vector};

/// Vertex for a filled, untextured triangle
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct DrawVertex {
    /// Position in world space
    pub position: [f32; 2],
    /// Vertex color (RGB)
    pub color: [f32; 3],
}

impl DrawVertex {
    /// Create a new vertex, narrowing the position to `f32`
    pub fn new(position: Vector, color: Rgb) -> Self {
        Self {
            position: position.as_vec2().to_array(),
            color: color.to_array(),
        }
    }

    /// Byte distance between consecutive vertices in a buffer
    pub const STRIDE: usize = std::mem::size_of::<DrawVertex>();

    /// Byte offset of `color` within a vertex
    pub const COLOR_OFFSET: usize = std::mem::size_of::<[f32; 2]>();
}
