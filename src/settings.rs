//! Runtime settings for the driver
//!
//! Loaded from a JSON file; every field falls back to its default.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::consts::{VIEWPORT_HEIGHT, VIEWPORT_WIDTH};
use crate::sim::EnemyMotion;

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Viewport size in pixels (only the aspect ratio matters to the sim)
    pub viewport_width: u32,
    pub viewport_height: u32,
    /// Fixed RNG seed; `None` seeds from the clock
    pub seed: Option<u64>,
    /// PPM world file; `None` runs the built-in demo map
    pub world_path: Option<PathBuf>,
    pub enemy_motion: EnemyMotion,
    /// Headless run length cap
    pub max_ticks: u64,
    /// Let the driver steer and shoot
    pub autopilot: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            viewport_width: VIEWPORT_WIDTH,
            viewport_height: VIEWPORT_HEIGHT,
            seed: None,
            world_path: None,
            enemy_motion: EnemyMotion::Stationary,
            max_ticks: 20_000,
            autopilot: true,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(err) => {
                log::info!("No settings at {} ({err}), using defaults", path.display());
                return Self::default();
            }
        };

        match serde_json::from_str(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(err) => {
                log::warn!("Invalid settings in {}: {err}, using defaults", path.display());
                Self::default()
            }
        }
    }

    /// viewport width / viewport height
    pub fn viewport_aspect(&self) -> f32 {
        if self.viewport_height == 0 {
            return 1.0;
        }
        self.viewport_width as f32 / self.viewport_height as f32
    }

    /// Configured seed, or one derived from the wall clock
    pub fn seed_or_clock(&self) -> u64 {
        self.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or_default()
        })
    }
}
