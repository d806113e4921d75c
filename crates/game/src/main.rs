//! Infinicity - endless procedural city flythrough.
//!
//! Headless frame driver for the streaming core. Windowing, shaders, and
//! draw submission belong to the rendering layer; this binary scripts a
//! camera advance over the city and reports what the streamer generates,
//! which is also how the core is exercised end to end without a GPU.

mod config;
mod streaming;

use std::collections::HashMap;

use anyhow::{Context, Result};
use procgen::MeshData;

use config::GameConfig;
use streaming::{CityWindow, MeshStore, MeshStoreError};

/// In-memory mesh store: keeps uploaded geometry sizes so the driver can
/// report totals without a GPU device.
struct CpuMeshStore {
    next: u64,
    live: HashMap<u64, (usize, usize)>,
}

impl CpuMeshStore {
    fn new() -> Self {
        Self {
            next: 0,
            live: HashMap::new(),
        }
    }

    fn live_meshes(&self) -> usize {
        self.live.len()
    }

    fn live_vertices(&self) -> usize {
        self.live.values().map(|&(vertices, _)| vertices).sum()
    }
}

impl MeshStore for CpuMeshStore {
    type Handle = u64;

    fn create_mesh(&mut self, data: &MeshData) -> Result<u64, MeshStoreError> {
        let id = self.next;
        self.next += 1;
        self.live.insert(id, (data.vertices.len(), data.indices.len()));
        Ok(id)
    }

    fn release_mesh(&mut self, handle: u64) {
        self.live.remove(&handle);
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = GameConfig::load();
    let params = config.building_params();

    let mut store = CpuMeshStore::new();
    let mut window = CityWindow::new(params, 0.0, &mut store)
        .context("could not build the initial city window")?;

    log::info!(
        "city window ready: anchor row {}, {} meshes, {} vertices",
        window.anchor_row(),
        store.live_meshes(),
        store.live_vertices(),
    );

    let mut position = 0.0_f32;
    for frame in 0..config.frames {
        position += config.camera_speed;
        match window.on_camera_advance(position, &mut store) {
            Ok(true) => log::info!(
                "frame {frame}: crossed into row {}, {} meshes live ({} vertices)",
                window.anchor_row(),
                store.live_meshes(),
                store.live_vertices(),
            ),
            Ok(false) => {}
            // The previous window is still intact; skip this frame's draw.
            Err(err) => log::warn!("frame {frame}: {err}"),
        }
    }

    log::info!(
        "flythrough finished at position {position:.2} (anchor row {})",
        window.anchor_row(),
    );
    Ok(())
}
