//! Persistent application settings

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::camera::CameraMode;
use crate::render::{PlaneVariant, TessLevels};

/// Application settings that persist between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Scene
    pub variant: PlaneVariant,
    pub camera_mode: CameraMode,
    /// Globe camera starts at (s, s/2, s)
    pub globe_start: f32,
    pub light_pos: [f32; 3],
    pub background_color: [f32; 4],

    // Grid
    pub grid_min: f32,
    pub grid_max: f32,
    pub grid_step: f32,

    // Tessellation overrides (None = variant preset)
    pub tess_levels: Option<TessLevels>,
    pub tex_scale: Option<f32>,

    // Projection
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,

    // Resources (None = shipped directories)
    pub shader_root: Option<PathBuf>,
    pub asset_root: Option<PathBuf>,

    // Window
    pub window_width: f32,
    pub window_height: f32,
    pub side_panel_width: f32,
    pub show_side_panel: bool,

    // Anti-aliasing (requires restart)
    pub antialiasing: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            variant: PlaneVariant::Water,
            camera_mode: CameraMode::Globe,
            globe_start: 5.0,
            light_pos: [5.0, 10.0, 5.0],
            background_color: [0.05, 0.07, 0.1, 1.0],
            grid_min: -10.0,
            grid_max: 10.0,
            grid_step: 1.0,
            tess_levels: None,
            tex_scale: None,
            fov_degrees: 45.0,
            near: 0.1,
            far: 1000.0,
            shader_root: None,
            asset_root: None,
            window_width: 1280.0,
            window_height: 720.0,
            side_panel_width: 220.0,
            show_side_panel: true,
            antialiasing: 4,
        }
    }
}

impl Settings {
    /// Get settings file path
    fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push("water-plane");
            std::fs::create_dir_all(&p).ok();
            p.push("settings.json");
            p
        })
    }

    /// Load settings from file
    pub fn load() -> Self {
        Self::path()
            .and_then(|p| std::fs::read_to_string(&p).ok())
            .map(|s| Self::from_json(&s))
            .unwrap_or_default()
    }

    /// Parse settings, falling back to defaults on malformed input.
    pub fn from_json(json: &str) -> Self {
        let settings: Self = serde_json::from_str(json).unwrap_or_else(|e| {
            tracing::warn!("ignoring malformed settings: {}", e);
            Self::default()
        });
        settings.validated()
    }

    /// Save settings to file
    pub fn save(&self) {
        if let Some(path) = Self::path() {
            match serde_json::to_string_pretty(self) {
                Ok(json) => {
                    if let Err(e) = std::fs::write(&path, json) {
                        tracing::warn!("cannot save settings to {}: {}", path.display(), e);
                    }
                }
                Err(e) => tracing::warn!("cannot serialize settings: {}", e),
            }
        }
    }

    /// Replace out-of-range values with usable ones.
    pub fn validated(mut self) -> Self {
        let defaults = Self::default();

        if !matches!(self.antialiasing, 0 | 2 | 4 | 8) {
            self.antialiasing = defaults.antialiasing;
        }
        if !(self.grid_step.is_finite() && self.grid_step > 0.0)
            || !(self.grid_min.is_finite() && self.grid_max.is_finite())
            || self.grid_min >= self.grid_max
        {
            self.grid_min = defaults.grid_min;
            self.grid_max = defaults.grid_max;
            self.grid_step = defaults.grid_step;
        }
        self.tess_levels = self.tess_levels.map(TessLevels::clamped);
        if !(self.globe_start.is_finite() && self.globe_start > 0.0) {
            self.globe_start = defaults.globe_start;
        }
        if !(self.fov_degrees > 1.0 && self.fov_degrees < 179.0) {
            self.fov_degrees = defaults.fov_degrees;
        }
        if !(self.near > 0.0 && self.far > self.near) {
            self.near = defaults.near;
            self.far = defaults.far;
        }
        if let Some(scale) = self.tex_scale {
            if !(scale.is_finite() && scale > 0.0) {
                self.tex_scale = None;
            }
        }

        self
    }
}
