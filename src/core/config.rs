//! Editor configuration
//!
//! Every tuned constant of the editor lives here so it can be overridden from
//! a JSON file without touching the interaction code.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::error::Error;
use crate::core::types::{Result, Vec3};

/// Orbit camera parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Eye position at startup
    pub initial_position: [f32; 3],
    /// Focus point at startup
    pub initial_look_at: [f32; 3],
    /// World-up axis (normalized on use)
    pub up: [f32; 3],
    /// Translation per frame for a held movement key, in world units
    pub move_step: f32,
    /// |dot(up, forward)| above which the left axis falls back to -X
    pub pole_threshold: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            initial_position: [1.0, 1.5, 2.0],
            initial_look_at: [0.0, 0.0, 0.0],
            up: [0.0, 1.0, 0.0],
            move_step: 0.05,
            pole_threshold: 0.999,
        }
    }
}

impl CameraConfig {
    pub fn initial_position(&self) -> Vec3 {
        Vec3::from_array(self.initial_position)
    }

    pub fn initial_look_at(&self) -> Vec3 {
        Vec3::from_array(self.initial_look_at)
    }

    pub fn up(&self) -> Vec3 {
        Vec3::from_array(self.up)
    }
}

/// Edit gesture parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditConfig {
    /// Squared pointer movement (normalized units) that re-arms a held gesture
    pub rearm_threshold_sq: f32,
    /// Color of voxels placed with the primary button
    pub add_color: [f32; 3],
}

impl Default for EditConfig {
    fn default() -> Self {
        Self {
            rearm_threshold_sq: 2e-4,
            add_color: [0.6, 0.7, 0.9],
        }
    }
}

/// Top-level editor configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Initial window width in pixels
    pub window_width: u32,
    /// Initial window height in pixels
    pub window_height: u32,
    /// CPU trace resolution relative to the window (0.1-1.0)
    pub render_scale: f32,
    /// Accumulation passes per frame
    pub samples_per_frame: u32,
    /// World-space edge length of one voxel
    pub voxel_size: f32,
    /// Cells per grid axis
    pub grid_resolution: u32,
    /// Camera parameters
    pub camera: CameraConfig,
    /// Edit gesture parameters
    pub edit: EditConfig,
    /// Directory holding save slot files
    pub saveslot_dir: PathBuf,
    /// Fixed delay between frames in milliseconds (0 = none)
    pub frame_delay_ms: u64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            render_scale: 0.5,
            samples_per_frame: 4,
            voxel_size: 1.0 / 32.0,
            grid_resolution: 64,
            camera: CameraConfig::default(),
            edit: EditConfig::default(),
            saveslot_dir: default_saveslot_dir(),
            frame_delay_ms: 0,
        }
    }
}

impl EditorConfig {
    /// Load configuration from a JSON file. Missing fields take defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Write configuration as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| Error::Config(e.to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, json)?;
        Ok(())
    }

    /// Reject values the editor cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.camera.initial_position == self.camera.initial_look_at {
            return Err(Error::Config("camera position must differ from look-at point".into()));
        }
        if Vec3::from_array(self.camera.up).length_squared() == 0.0 {
            return Err(Error::Config("camera up axis must be non-zero".into()));
        }
        if self.grid_resolution == 0 || self.voxel_size <= 0.0 {
            return Err(Error::Config("grid must have a positive resolution and voxel size".into()));
        }
        Ok(())
    }

    /// CPU trace resolution for a given window size
    pub fn render_resolution(&self, window_width: u32, window_height: u32) -> (u32, u32) {
        let scale = self.render_scale.clamp(0.1, 1.0);
        (
            ((window_width as f32 * scale) as u32).max(1),
            ((window_height as f32 * scale) as u32).max(1),
        )
    }
}

/// `$HOME/voxedit_saveslots`, or a relative directory when HOME is unset
pub fn default_saveslot_dir() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join("voxedit_saveslots"),
        None => PathBuf::from("voxedit_saveslots"),
    }
}
