//! Vertex type handed to the external renderer

use bytemuck::{Pod, Zeroable};

use crate::appearance::Color;

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn at(p: glam::Vec2, color: Color) -> Self {
        Self::new(p.x, p.y, color.0)
    }

    /// Raw bytes for a GPU buffer upload
    pub fn as_bytes(vertices: &[Vertex]) -> &[u8] {
        bytemuck::cast_slice(vertices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_layout() {
        let v = [Vertex::new(1.0, 2.0, [0.1, 0.2, 0.3, 0.4]); 3];
        assert_eq!(Vertex::as_bytes(&v).len(), 3 * 6 * 4);
    }
}
