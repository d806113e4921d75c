//! Sliding-window streaming of generated city blocks.
//!
//! A fixed 10x10 grid of tile slots tracks the rows around the camera. When
//! the camera crosses into a new integer row, the whole window is rebuilt
//! anchored at that row: a complete replacement is generated and uploaded
//! first, and only then is the outgoing window released, so the frame driver
//! never observes a partially rebuilt window.

use procgen::{Building, BuildingParams, MeshData, ParamsError};
use thiserror::Error;

/// Columns resident in the window.
pub const GRID_COLS: usize = 10;
/// Rows resident in the window.
pub const GRID_ROWS: usize = 10;

/// Owner of GPU-resident mesh buffers. The streamer hands it raw
/// vertex/color/index arrays and receives an opaque handle used to draw the
/// mesh and later release it.
pub trait MeshStore {
    type Handle;

    /// Upload one mesh. May fail when the backing allocator is exhausted.
    fn create_mesh(&mut self, data: &MeshData) -> Result<Self::Handle, MeshStoreError>;

    /// Release a previously created mesh and its backing storage.
    fn release_mesh(&mut self, handle: Self::Handle);
}

/// Allocation failure reported by the mesh store.
#[derive(Debug, Error)]
#[error("mesh allocation failed: {0}")]
pub struct MeshStoreError(pub String);

/// Streaming failure. After a `Rebuild` error the previously resident
/// window is still intact and drawable.
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("invalid generation settings")]
    Config(#[from] ParamsError),
    #[error("window rebuild at anchor row {anchor} aborted")]
    Rebuild {
        anchor: i64,
        #[source]
        source: MeshStoreError,
    },
}

/// One resident city block: its coordinate plus the mesh handles it owns.
#[derive(Debug)]
struct Tile<H> {
    coord: (i64, i64),
    handles: Vec<H>,
}

impl<H> Tile<H> {
    fn release<S: MeshStore<Handle = H>>(self, store: &mut S) {
        for handle in self.handles {
            store.release_mesh(handle);
        }
    }
}

/// The bounded, camera-relative set of resident tiles.
///
/// Invariant between calls: all `GRID_COLS * GRID_ROWS` slots hold exactly
/// one tile, with column in `[0, GRID_COLS)` and row in
/// `[anchor_row, anchor_row + GRID_ROWS)`, no coordinate duplicated.
#[derive(Debug)]
pub struct CityWindow<S: MeshStore> {
    /// Row-major: slot `(col, row_offset)` lives at
    /// `row_offset * GRID_COLS + col`.
    slots: Vec<Tile<S::Handle>>,
    anchor_row: i64,
    params: BuildingParams,
}

impl<S: MeshStore> CityWindow<S> {
    /// Validate the generation settings and build the initial window
    /// anchored at the camera's starting row.
    pub fn new(params: BuildingParams, position: f32, store: &mut S) -> Result<Self, StreamError> {
        params.validate()?;
        let anchor_row = row_of(position);
        let slots = build_window(&params, anchor_row, store)?;
        log::info!("initial city window anchored at row {anchor_row}");
        Ok(Self {
            slots,
            anchor_row,
            params,
        })
    }

    /// The smallest row index currently resident.
    pub fn anchor_row(&self) -> i64 {
        self.anchor_row
    }

    /// Resident tiles with the mesh handles to draw, in row-major slot
    /// order.
    pub fn tiles(&self) -> impl Iterator<Item = ((i64, i64), &[S::Handle])> + '_ {
        self.slots
            .iter()
            .map(|tile| (tile.coord, tile.handles.as_slice()))
    }

    /// Frame-driver entry point. Checks the camera's integer row against the
    /// anchor and rebuilds the full window on a crossing. Returns whether a
    /// rebuild happened.
    ///
    /// All-or-nothing: when any mesh upload fails, everything created for
    /// the replacement is released, the resident window is left untouched,
    /// and the error propagates so the driver can skip the frame.
    pub fn on_camera_advance(&mut self, position: f32, store: &mut S) -> Result<bool, StreamError> {
        let row = row_of(position);
        if row == self.anchor_row {
            return Ok(false);
        }

        let fresh = build_window(&self.params, row, store)?;
        // Release the outgoing geometry only once the replacement fully
        // exists.
        for tile in self.slots.drain(..) {
            tile.release(store);
        }
        self.slots = fresh;
        self.anchor_row = row;
        log::debug!("city window rebuilt at anchor row {row}");
        Ok(true)
    }
}

/// Integer row for a camera position. Total over all finite floats; the
/// clamp keeps `anchor + GRID_ROWS` representable.
fn row_of(position: f32) -> i64 {
    (position.floor() as i64).min(i64::MAX - GRID_ROWS as i64)
}

fn build_window<S: MeshStore>(
    params: &BuildingParams,
    anchor: i64,
    store: &mut S,
) -> Result<Vec<Tile<S::Handle>>, StreamError> {
    let mut tiles: Vec<Tile<S::Handle>> = Vec::with_capacity(GRID_COLS * GRID_ROWS);
    for row_offset in 0..GRID_ROWS {
        let row = anchor + row_offset as i64;
        for col in 0..GRID_COLS {
            let building = Building::generate(col as i64, row, params);
            let mut handles = Vec::with_capacity(building.meshes.len());
            let mut failed = None;
            for data in &building.meshes {
                // Sub-unit masses legitimately produce empty window grids;
                // nothing to upload for those.
                if data.is_empty() {
                    continue;
                }
                match store.create_mesh(data) {
                    Ok(handle) => handles.push(handle),
                    Err(err) => {
                        failed = Some(err);
                        break;
                    }
                }
            }
            if let Some(source) = failed {
                // Roll back everything created for the aborted window; the
                // caller's resident window stays live.
                for handle in handles {
                    store.release_mesh(handle);
                }
                for tile in tiles {
                    tile.release(store);
                }
                return Err(StreamError::Rebuild { anchor, source });
            }
            tiles.push(Tile {
                coord: (col as i64, row),
                handles,
            });
        }
    }
    Ok(tiles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    /// In-memory store tracking live handles, with optional failure
    /// injection after a fixed number of successful creates.
    #[derive(Debug)]
    struct TestStore {
        next: u64,
        live: HashSet<u64>,
        created: u64,
        fail_after: Option<u64>,
    }

    impl TestStore {
        fn new() -> Self {
            Self {
                next: 0,
                live: HashSet::new(),
                created: 0,
                fail_after: None,
            }
        }
    }

    impl MeshStore for TestStore {
        type Handle = u64;

        fn create_mesh(&mut self, data: &MeshData) -> Result<u64, MeshStoreError> {
            assert!(!data.is_empty(), "empty meshes must never be uploaded");
            if let Some(limit) = self.fail_after {
                if self.created >= limit {
                    return Err(MeshStoreError("out of buffer space".into()));
                }
            }
            self.created += 1;
            let id = self.next;
            self.next += 1;
            self.live.insert(id);
            Ok(id)
        }

        fn release_mesh(&mut self, handle: u64) {
            assert!(self.live.remove(&handle), "double release of {handle}");
        }
    }

    fn assert_window_invariant(window: &CityWindow<TestStore>) {
        let anchor = window.anchor_row();
        let mut coords = HashSet::new();
        let mut slots = 0;
        for ((col, row), handles) in window.tiles() {
            slots += 1;
            assert!((0..GRID_COLS as i64).contains(&col));
            assert!((anchor..anchor + GRID_ROWS as i64).contains(&row));
            assert!(coords.insert((col, row)), "duplicate tile ({col}, {row})");
            assert!(!handles.is_empty());
        }
        assert_eq!(slots, GRID_COLS * GRID_ROWS);
    }

    #[test]
    fn initial_window_is_fully_populated() {
        let mut store = TestStore::new();
        let window = CityWindow::new(BuildingParams::default(), 0.0, &mut store).unwrap();
        assert_eq!(window.anchor_row(), 0);
        assert_window_invariant(&window);
        let handle_total: usize = window.tiles().map(|(_, h)| h.len()).sum();
        assert_eq!(store.live.len(), handle_total);
    }

    #[test]
    fn fractional_advance_within_the_same_row_is_a_no_op() {
        let mut store = TestStore::new();
        let mut window = CityWindow::new(BuildingParams::default(), 0.0, &mut store).unwrap();
        let before = store.live.clone();
        assert!(!window.on_camera_advance(0.7, &mut store).unwrap());
        assert!(!window.on_camera_advance(0.99, &mut store).unwrap());
        assert_eq!(store.live, before);
        assert_eq!(window.anchor_row(), 0);
    }

    /// A row jump releases every pre-crossing handle and repopulates the
    /// window at the new anchor.
    #[test]
    fn crossing_releases_the_old_window_and_rebuilds() {
        let mut store = TestStore::new();
        let mut window = CityWindow::new(BuildingParams::default(), 0.0, &mut store).unwrap();
        let old_handles = store.live.clone();

        assert!(window.on_camera_advance(3.2, &mut store).unwrap());
        assert_eq!(window.anchor_row(), 3);
        assert_window_invariant(&window);
        assert!(
            store.live.is_disjoint(&old_handles),
            "pre-crossing geometry still referenced"
        );
    }

    #[test]
    fn negative_and_reentrant_rows_regenerate_identically() {
        let mut store = TestStore::new();
        let mut window = CityWindow::new(BuildingParams::default(), -2.5, &mut store).unwrap();
        assert_eq!(window.anchor_row(), -3);
        assert_window_invariant(&window);

        // Leave and come back; the same coordinates must be resident again.
        let coords_before: HashSet<_> = window.tiles().map(|(c, _)| c).collect();
        window.on_camera_advance(40.0, &mut store).unwrap();
        window.on_camera_advance(-2.1, &mut store).unwrap();
        let coords_after: HashSet<_> = window.tiles().map(|(c, _)| c).collect();
        assert_eq!(coords_before, coords_after);
    }

    /// Mesh-store exhaustion mid-rebuild must leave the previous window in
    /// place, with every partially created handle rolled back.
    #[test]
    fn failed_rebuild_keeps_the_previous_window() {
        let mut store = TestStore::new();
        let mut window = CityWindow::new(BuildingParams::default(), 0.0, &mut store).unwrap();
        let before = store.live.clone();
        let anchor_before = window.anchor_row();

        // Allow roughly half of the replacement window to upload, then fail.
        store.fail_after = Some(store.created + 120);
        let err = window.on_camera_advance(5.0, &mut store).unwrap_err();
        assert!(matches!(err, StreamError::Rebuild { anchor: 5, .. }));
        assert_eq!(window.anchor_row(), anchor_before);
        assert_eq!(store.live, before, "rollback left orphaned handles");
        assert_window_invariant(&window);

        // Once the store recovers, the crossing succeeds.
        store.fail_after = None;
        assert!(window.on_camera_advance(5.0, &mut store).unwrap());
        assert_eq!(window.anchor_row(), 5);
        assert_window_invariant(&window);
    }

    #[test]
    fn invalid_params_are_rejected_at_construction() {
        let mut store = TestStore::new();
        let params = BuildingParams {
            window_stride: 0.0,
            ..Default::default()
        };
        let err = CityWindow::new(params, 0.0, &mut store).unwrap_err();
        assert!(matches!(err, StreamError::Config(_)));
        assert!(store.live.is_empty());
    }

    /// Tiny masses generate no window geometry at all; tiles then own only
    /// their mass meshes and nothing empty reaches the store.
    #[test]
    fn sub_unit_masses_stream_without_window_geometry() {
        let params = BuildingParams {
            max_width: 0.01,
            max_depth: 0.01,
            max_height: 0.01,
            min_width: 0.01,
            min_depth: 0.01,
            min_height: 0.01,
            ..Default::default()
        };
        let mut store = TestStore::new();
        let window = CityWindow::new(params, 0.0, &mut store).unwrap();
        assert_window_invariant(&window);
        for (_, handles) in window.tiles() {
            assert!(handles.len() <= 2, "facade meshes should all be empty");
        }
    }

    #[test]
    fn row_of_floors_toward_negative_infinity() {
        assert_eq!(row_of(0.0), 0);
        assert_eq!(row_of(0.999), 0);
        assert_eq!(row_of(3.0), 3);
        assert_eq!(row_of(-0.1), -1);
        assert_eq!(row_of(-2.5), -3);
    }
}
