//! Building mass generation: one or two stacked box masses per city block.

use glam::Vec3;
use thiserror::Error;

use crate::facade::facade_windows;
use crate::mesh::MeshData;
use crate::rng::{tile_seed, Rand48};

/// Flat concrete color shared by every mass face.
pub const MASS_COLOR: [f32; 3] = [0.6, 0.6, 0.6];

/// How far base-mass window quads float off the parent surface.
const BASE_FACADE_GAP: f32 = 0.03;
/// Upper-mass windows use a slightly smaller gap so the two facades never
/// share a plane either.
const UPPER_FACADE_GAP: f32 = 0.02;

/// Nominal dimension ranges for generated masses, plus the window lattice
/// sizes. `dim = max * u + min` with `u` uniform in [0, 1), so `min` is an
/// additive floor keeping every mass solid.
#[derive(Debug, Clone)]
pub struct BuildingParams {
    pub max_width: f32,
    pub max_depth: f32,
    pub max_height: f32,
    pub min_width: f32,
    pub min_depth: f32,
    pub min_height: f32,
    /// Window lattice pitch on a mass face.
    pub window_stride: f32,
    /// Lit-quad extent inside each lattice cell; the difference against the
    /// stride is the gutter between neighboring windows.
    pub window_pane: f32,
}

impl Default for BuildingParams {
    fn default() -> Self {
        // Masses stay smaller than the 1x1 city blocks they sit on.
        Self {
            max_width: 0.55,
            max_depth: 0.6,
            max_height: 1.5,
            min_width: 0.2,
            min_depth: 0.2,
            min_height: 0.5,
            window_stride: 0.06,
            window_pane: 0.05,
        }
    }
}

impl BuildingParams {
    /// Reject degenerate configuration up front. Non-positive maxima or
    /// window sizes would yield flat masses or unbounded grids, and a
    /// negative floor could push a dimension below zero.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.max_width <= 0.0 || self.max_depth <= 0.0 || self.max_height <= 0.0 {
            return Err(ParamsError::NonPositiveMass {
                width: self.max_width,
                depth: self.max_depth,
                height: self.max_height,
            });
        }
        if self.min_width < 0.0 || self.min_depth < 0.0 || self.min_height < 0.0 {
            return Err(ParamsError::NegativeFloor {
                width: self.min_width,
                depth: self.min_depth,
                height: self.min_height,
            });
        }
        if self.window_stride <= 0.0 || self.window_pane <= 0.0 {
            return Err(ParamsError::NonPositiveWindow {
                stride: self.window_stride,
                pane: self.window_pane,
            });
        }
        Ok(())
    }
}

/// Invalid generation settings. Fatal at startup, never recoverable
/// per-tile.
#[derive(Debug, Error)]
pub enum ParamsError {
    #[error("mass dimension maxima must be positive (width {width}, depth {depth}, height {height})")]
    NonPositiveMass { width: f32, depth: f32, height: f32 },
    #[error("mass dimension floors must not be negative (width {width}, depth {depth}, height {height})")]
    NegativeFloor { width: f32, depth: f32, height: f32 },
    #[error("window sizes must be positive (stride {stride}, pane {pane})")]
    NonPositiveWindow { stride: f32, pane: f32 },
}

/// An axis-aligned building mass in tile-local space: `x` in `[0, width]`,
/// `z` in `[-depth, 0]`, `y` in `[base_y, base_y + height]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mass {
    pub width: f32,
    pub depth: f32,
    pub height: f32,
    /// Vertical origin; an upper mass sits at the lower mass's roof line.
    pub base_y: f32,
}

impl Mass {
    /// Draw a base mass from the stream. Draw order is fixed (depth, width,
    /// height) — it is part of the deterministic tile sequence.
    fn sample_base(rng: &mut Rand48, params: &BuildingParams) -> Self {
        let depth = params.max_depth * rng.next_f32() + params.min_depth;
        let width = params.max_width * rng.next_f32() + params.min_width;
        let height = params.max_height * rng.next_f32() + params.min_height;
        Self {
            width,
            depth,
            height,
            base_y: 0.0,
        }
    }

    /// Draw an upper mass. Its dimensions are redrawn fresh with the base
    /// dimensions as nominal maxima — not a scaled copy of the base shape —
    /// and it stacks at the base's roof line.
    fn sample_upper(rng: &mut Rand48, base: &Mass) -> Self {
        let depth = base.depth * rng.next_f32();
        let width = base.width * rng.next_f32();
        let height = base.height * rng.next_f32();
        Self {
            width,
            depth,
            height,
            base_y: base.height,
        }
    }

    /// Emit the box as 6 quads: 24 vertices, 36 indices, one flat color.
    pub fn mesh(&self, color: [f32; 3]) -> MeshData {
        let min = Vec3::new(0.0, self.base_y, -self.depth);
        let max = Vec3::new(self.width, self.base_y + self.height, 0.0);
        let [x0, y0, z0] = min.to_array();
        let [x1, y1, z1] = max.to_array();

        let mut mesh = MeshData::with_capacity(24, 36);
        // -Z (back), +Z (front)
        mesh.push_quad(
            [[x0, y0, z0], [x1, y0, z0], [x1, y1, z0], [x0, y1, z0]],
            color,
        );
        mesh.push_quad(
            [[x0, y0, z1], [x1, y0, z1], [x1, y1, z1], [x0, y1, z1]],
            color,
        );
        // -X (side), +X
        mesh.push_quad(
            [[x0, y0, z0], [x0, y1, z0], [x0, y1, z1], [x0, y0, z1]],
            color,
        );
        mesh.push_quad(
            [[x1, y0, z0], [x1, y1, z0], [x1, y1, z1], [x1, y0, z1]],
            color,
        );
        // -Y (ground), +Y (roof)
        mesh.push_quad(
            [[x0, y0, z1], [x1, y0, z1], [x1, y0, z0], [x0, y0, z0]],
            color,
        );
        mesh.push_quad(
            [[x0, y1, z1], [x1, y1, z1], [x1, y1, z0], [x0, y1, z0]],
            color,
        );
        mesh
    }
}

/// One city block's generated geometry, keyed by its integer coordinate.
#[derive(Debug, Clone)]
pub struct Building {
    pub coord: (i64, i64),
    pub base: Mass,
    pub upper: Option<Mass>,
    /// Mass and facade meshes in draw order: base, base windows, then the
    /// upper pair when present.
    pub meshes: Vec<MeshData>,
}

impl Building {
    /// Generate the block at `(col, row)`.
    ///
    /// Fully deterministic: the random stream is reseeded from the
    /// coordinate before any draw, and the draw sequence is fixed — base
    /// dimensions, base window flags, the upper-mass coin flip, then (when
    /// present) upper dimensions and upper window flags.
    pub fn generate(col: i64, row: i64, params: &BuildingParams) -> Building {
        let mut rng = Rand48::new(tile_seed(col, row));

        let base = Mass::sample_base(&mut rng, params);
        let mut meshes = vec![
            base.mesh(MASS_COLOR),
            facade_windows(&base, params, BASE_FACADE_GAP, &mut rng),
        ];

        let upper = if rng.coin_flip() {
            let upper = Mass::sample_upper(&mut rng, &base);
            meshes.push(upper.mesh(MASS_COLOR));
            meshes.push(facade_windows(&upper, params, UPPER_FACADE_GAP, &mut rng));
            Some(upper)
        } else {
            None
        };

        log::trace!(
            "block ({col}, {row}): base {:.2}x{:.2}x{:.2}, upper mass: {}",
            base.width,
            base.depth,
            base.height,
            upper.is_some(),
        );

        Building {
            coord: (col, row),
            base,
            upper,
            meshes,
        }
    }
}
