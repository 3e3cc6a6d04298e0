//! Terrain grid and position classification

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::level::Level;

/// Zone class of a terrain cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TerrainClass {
    #[default]
    Open,
    Obstacle,
    FinishLine,
}

/// Row-major grid of classified cells, row 0 at y = 0
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainGrid {
    width: u32,
    height: u32,
    cells: Vec<TerrainClass>,
}

impl TerrainGrid {
    /// Build a grid from row-major cells. `None` when the cell count doesn't
    /// match the dimensions.
    pub fn new(width: u32, height: u32, cells: Vec<TerrainClass>) -> Option<Self> {
        if cells.len() != width as usize * height as usize {
            return None;
        }
        Some(Self {
            width,
            height,
            cells,
        })
    }

    /// An all-open grid
    pub fn open(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![TerrainClass::Open; width as usize * height as usize],
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Class at a cell; out-of-grid cells are open
    pub fn classify_cell(&self, x: u32, y: u32) -> TerrainClass {
        if x >= self.width || y >= self.height {
            return TerrainClass::Open;
        }
        self.cells[y as usize * self.width as usize + x as usize]
    }

    pub fn set(&mut self, x: u32, y: u32, class: TerrainClass) {
        if x < self.width && y < self.height {
            self.cells[y as usize * self.width as usize + x as usize] = class;
        }
    }
}

/// Map a normalized position onto its grid cell, clamped into the grid
pub fn cell_of(pos: Vec2, width: u32, height: u32) -> (u32, u32) {
    let scale = |v: f32, n: u32| -> u32 {
        let max = n.saturating_sub(1);
        let cell = (v * n as f32).floor();
        if cell <= 0.0 {
            0
        } else {
            (cell as u32).min(max)
        }
    };
    (scale(pos.x, width), scale(pos.y, height))
}

/// Terrain zone under a position
pub fn classify_terrain(pos: Vec2, level: &Level) -> TerrainClass {
    let terrain = level.terrain();
    let (x, y) = cell_of(pos, terrain.width(), terrain.height());
    terrain.classify_cell(x, y)
}
