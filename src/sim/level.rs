//! Level state: terrain, scroll progress and game status

use serde::{Deserialize, Serialize};

use super::mob::Mob;
use super::terrain::TerrainGrid;

/// Level status. `Playing` is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LevelStatus {
    #[default]
    Playing,
    GameOver,
    LevelComplete,
}

impl LevelStatus {
    #[inline]
    pub fn is_terminal(self) -> bool {
        self != LevelStatus::Playing
    }
}

/// The playfield
#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    terrain: TerrainGrid,
    /// Left edge of the viewport in normalized x (0..1)
    pub progress: f32,
    pub status: LevelStatus,
    /// viewport width / viewport height
    viewport_aspect: f32,
}

impl Level {
    pub fn new(terrain: TerrainGrid, viewport_aspect: f32) -> Self {
        Self {
            terrain,
            progress: 0.0,
            status: LevelStatus::Playing,
            viewport_aspect,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.terrain.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.terrain.height()
    }

    #[inline]
    pub fn terrain(&self) -> &TerrainGrid {
        &self.terrain
    }

    #[inline]
    pub fn viewport_aspect(&self) -> f32 {
        self.viewport_aspect
    }

    /// Fraction of the level width visible on screen
    pub fn zone_size(&self) -> f32 {
        viewport_zone_size(self.viewport_aspect, self.width(), self.height())
    }

    /// Whether a mob lies outside the visible window
    pub fn is_hidden(&self, mob: &Mob) -> bool {
        let x = mob.pos.x;
        x < self.progress || x > self.progress + self.zone_size()
    }
}

/// Visible fraction of a `width` x `height` level through a viewport of the
/// given aspect ratio, where the level height fills the viewport height
pub fn viewport_zone_size(aspect: f32, width: u32, height: u32) -> f32 {
    if width == 0 {
        return 1.0;
    }
    aspect * height as f32 / width as f32
}

/// Next scroll offset: advance by `rate` until the right edge of the view
/// reaches the end of the map, then hold
pub fn scroll_step(progress: f32, zone_size: f32, rate: f32) -> f32 {
    if progress < 1.0 - zone_size {
        progress + rate
    } else {
        progress
    }
}
