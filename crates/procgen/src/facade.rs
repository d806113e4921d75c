//! Window facades: a lattice of independently lit quads on two faces of a
//! building mass.

use crate::building::{BuildingParams, Mass};
use crate::mesh::MeshData;
use crate::rng::Rand48;

/// Window color when the room light is on.
pub const LIT_COLOR: [f32; 3] = [1.0, 1.0, 0.0];
/// Window color when dark.
pub const UNLIT_COLOR: [f32; 3] = [0.0, 0.0, 0.0];

/// Lattice dimensions for one face: `floor(extent / stride)` columns by
/// `floor(height / stride)` rows. A mass narrower or shorter than one stride
/// gets zero columns or rows and simply contributes no geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSize {
    pub cols: u32,
    pub rows: u32,
}

pub fn grid_size(extent: f32, height: f32, stride: f32) -> GridSize {
    GridSize {
        cols: (extent / stride) as u32,
        rows: (height / stride) as u32,
    }
}

/// Generate the window lattice for the front (+Z) and one side (-X) face of
/// `mass` as a single mesh. Quads sit `gap` units off the surface so they
/// never z-fight the parent face. Each cell draws one coin flip for lit vs
/// dark; front cells are drawn first, then side cells, both row-major —
/// the order is part of the deterministic tile sequence.
pub fn facade_windows(
    mass: &Mass,
    params: &BuildingParams,
    gap: f32,
    rng: &mut Rand48,
) -> MeshData {
    let stride = params.window_stride;
    let pane = params.window_pane;
    let front = grid_size(mass.width, mass.height, stride);
    let side = grid_size(mass.depth, mass.height, stride);

    let quads = (front.cols * front.rows + side.cols * side.rows) as usize;
    let mut mesh = MeshData::with_capacity(quads * 4, quads * 6);

    // Front face: lattice across the width, floated toward +Z.
    for row in 0..front.rows {
        let y0 = mass.base_y + row as f32 * stride;
        for col in 0..front.cols {
            let x0 = col as f32 * stride;
            let color = if rng.coin_flip() { LIT_COLOR } else { UNLIT_COLOR };
            mesh.push_quad(
                [
                    [x0, y0, gap],
                    [x0 + pane, y0, gap],
                    [x0 + pane, y0 + pane, gap],
                    [x0, y0 + pane, gap],
                ],
                color,
            );
        }
    }

    // Side face: lattice across the depth, floated past the -X surface.
    for row in 0..side.rows {
        let y0 = mass.base_y + row as f32 * stride;
        for col in 0..side.cols {
            let z0 = -(col as f32) * stride;
            let color = if rng.coin_flip() { LIT_COLOR } else { UNLIT_COLOR };
            mesh.push_quad(
                [
                    [-gap, y0, z0],
                    [-gap, y0, z0 - pane],
                    [-gap, y0 + pane, z0 - pane],
                    [-gap, y0 + pane, z0],
                ],
                color,
            );
        }
    }

    mesh
}
