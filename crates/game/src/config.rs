//! Demo configuration. Loaded from city.ron at startup.

use procgen::BuildingParams;
use serde::{Deserialize, Serialize};

/// Settings for the city flythrough. Loaded from `city.ron` in the current
/// directory; any missing field falls back to its default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Camera forward speed in rows per simulated frame.
    #[serde(default = "default_camera_speed")]
    pub camera_speed: f32,
    /// Number of frames the headless driver simulates before exiting.
    #[serde(default = "default_frames")]
    pub frames: u32,
    /// Maximum extra mass width beyond the floor.
    #[serde(default = "default_max_width")]
    pub max_width: f32,
    #[serde(default = "default_max_depth")]
    pub max_depth: f32,
    #[serde(default = "default_max_height")]
    pub max_height: f32,
    /// Additive dimension floors; keep every mass solid.
    #[serde(default = "default_min_width")]
    pub min_width: f32,
    #[serde(default = "default_min_depth")]
    pub min_depth: f32,
    #[serde(default = "default_min_height")]
    pub min_height: f32,
    /// Window lattice pitch on a mass face.
    #[serde(default = "default_window_stride")]
    pub window_stride: f32,
    /// Lit-quad extent inside each lattice cell.
    #[serde(default = "default_window_pane")]
    pub window_pane: f32,
}

fn default_camera_speed() -> f32 {
    0.35
}
fn default_frames() -> u32 {
    40
}
fn default_max_width() -> f32 {
    0.55
}
fn default_max_depth() -> f32 {
    0.6
}
fn default_max_height() -> f32 {
    1.5
}
fn default_min_width() -> f32 {
    0.2
}
fn default_min_depth() -> f32 {
    0.2
}
fn default_min_height() -> f32 {
    0.5
}
fn default_window_stride() -> f32 {
    0.06
}
fn default_window_pane() -> f32 {
    0.05
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            camera_speed: default_camera_speed(),
            frames: default_frames(),
            max_width: default_max_width(),
            max_depth: default_max_depth(),
            max_height: default_max_height(),
            min_width: default_min_width(),
            min_depth: default_min_depth(),
            min_height: default_min_height(),
            window_stride: default_window_stride(),
            window_pane: default_window_pane(),
        }
    }
}

impl GameConfig {
    /// Load config from `city.ron`. A missing or unparsable file falls back
    /// to defaults; value validation happens when the window is built.
    pub fn load() -> Self {
        let path = config_path();
        if let Ok(data) = std::fs::read_to_string(&path) {
            match ron::from_str(&data) {
                Ok(config) => return config,
                Err(e) => log::warn!("Invalid config at {:?}: {}, using defaults", path, e),
            }
        }
        Self::default()
    }

    /// The generation parameters this config describes.
    pub fn building_params(&self) -> BuildingParams {
        BuildingParams {
            max_width: self.max_width,
            max_depth: self.max_depth,
            max_height: self.max_height,
            min_width: self.min_width,
            min_depth: self.min_depth,
            min_height: self.min_height,
            window_stride: self.window_stride,
            window_pane: self.window_pane,
        }
    }
}

fn config_path() -> std::path::PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| std::path::PathBuf::from("."))
        .join("city.ron")
}
