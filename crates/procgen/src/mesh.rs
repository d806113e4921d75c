//! CPU-side mesh data handed to the render layer for upload.

use bytemuck::{Pod, Zeroable};

/// Vertex with a flat per-vertex color (no lighting model beyond the color
/// itself).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ColorVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

/// Mesh data before GPU upload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<ColorVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertices: usize, indices: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            indices: Vec::with_capacity(indices),
        }
    }

    /// A mesh with no triangles. Legitimate output for sub-unit window grids.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Append one quad (two triangles) over four new vertices sharing a
    /// color. Corners are taken in perimeter order.
    pub fn push_quad(&mut self, corners: [[f32; 3]; 4], color: [f32; 3]) {
        let base = self.vertices.len() as u32;
        for position in corners {
            self.vertices.push(ColorVertex { position, color });
        }
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
}
