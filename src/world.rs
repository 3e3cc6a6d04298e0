//! World loading
//!
//! A world is a terrain grid plus the initial enemies and bonuses. Maps come
//! from binary PPM (P6) images, one pixel per cell:
//! - black `(0, 0, 0)`: obstacle
//! - green `(0, 255, 0)`: finish line
//! - red `(255, 0, 0)`: enemy spawn on an open cell
//! - blue `(0, 0, 255)`: bonus spawn on an open cell
//! - anything else: open
//!
//! [`AsciiWorld`] builds the same thing from text rows, for tests and the
//! built-in demo map.

use std::path::{Path, PathBuf};

use glam::Vec2;

use crate::consts::ENEMY_DRIFT_SPEED;
use crate::error::WorldLoadError;
use crate::sim::{Mob, MobKind, TerrainClass, TerrainGrid};

/// Loaded world data handed to the session
#[derive(Debug, Clone)]
pub struct World {
    pub terrain: TerrainGrid,
    pub enemies: Vec<Mob>,
    pub bonuses: Vec<Mob>,
}

/// Source of a world
pub trait WorldLoader {
    fn load(&self) -> Result<World, WorldLoadError>;
}

/// What a single map cell holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Open,
    Obstacle,
    FinishLine,
    Enemy,
    Bonus,
}

impl World {
    /// Build a world from row-major cells
    pub fn from_cells<I>(width: u32, height: u32, cells: I) -> Result<Self, WorldLoadError>
    where
        I: IntoIterator<Item = Cell>,
    {
        if width == 0 || height == 0 {
            return Err(WorldLoadError::Empty);
        }

        let mut terrain = TerrainGrid::open(width, height);
        let mut enemies = Vec::new();
        let mut bonuses = Vec::new();

        let coords = (0..height).flat_map(|y| (0..width).map(move |x| (x, y)));
        for ((x, y), cell) in coords.zip(cells) {
            let center = Vec2::new(
                (x as f32 + 0.5) / width as f32,
                (y as f32 + 0.5) / height as f32,
            );
            match cell {
                Cell::Open => {}
                Cell::Obstacle => terrain.set(x, y, TerrainClass::Obstacle),
                Cell::FinishLine => terrain.set(x, y, TerrainClass::FinishLine),
                Cell::Enemy => enemies.push(Mob::new(
                    MobKind::Enemy,
                    center,
                    Vec2::new(0.0, ENEMY_DRIFT_SPEED),
                )),
                Cell::Bonus => bonuses.push(Mob::new(MobKind::Bonus, center, Vec2::ZERO)),
            }
        }

        Ok(Self {
            terrain,
            enemies,
            bonuses,
        })
    }
}

/// Binary PPM world file
#[derive(Debug, Clone)]
pub struct PpmWorld {
    path: PathBuf,
}

impl PpmWorld {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Decode an in-memory P6 image. `path` is only used in errors.
    pub fn decode(path: &Path, bytes: &[u8]) -> Result<World, WorldLoadError> {
        let bad_format = |reason: &str| WorldLoadError::Format {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        };

        let mut header = HeaderReader { bytes, pos: 0 };
        if header.token() != Some(b"P6".as_slice()) {
            return Err(bad_format("missing P6 magic"));
        }
        let width = header.number().ok_or_else(|| bad_format("bad width"))?;
        let height = header.number().ok_or_else(|| bad_format("bad height"))?;
        let maxval = header.number().ok_or_else(|| bad_format("bad maxval"))?;
        if maxval == 0 || maxval > 255 {
            return Err(bad_format("maxval must be within 1..=255"));
        }
        if width == 0 || height == 0 {
            return Err(WorldLoadError::Empty);
        }

        // Exactly one whitespace byte separates the header from the raster
        let raster = bytes.get(header.pos + 1..).unwrap_or_default();
        let needed = (width as usize)
            .checked_mul(height as usize)
            .and_then(|cells| cells.checked_mul(3))
            .ok_or_else(|| bad_format("image dimensions overflow"))?;
        if raster.len() < needed {
            return Err(WorldLoadError::Truncated {
                path: path.to_path_buf(),
            });
        }

        let cells = raster[..needed]
            .chunks_exact(3)
            .map(|rgb| classify_pixel(rgb, maxval));
        World::from_cells(width, height, cells)
    }
}

impl WorldLoader for PpmWorld {
    fn load(&self) -> Result<World, WorldLoadError> {
        let bytes = std::fs::read(&self.path).map_err(|source| WorldLoadError::Io {
            path: self.path.clone(),
            source,
        })?;
        let world = Self::decode(&self.path, &bytes)?;
        log::info!(
            "Loaded world {} ({}x{}, {} enemies, {} bonuses)",
            self.path.display(),
            world.terrain.width(),
            world.terrain.height(),
            world.enemies.len(),
            world.bonuses.len()
        );
        Ok(world)
    }
}

fn classify_pixel(rgb: &[u8], maxval: u32) -> Cell {
    let scale = |v: u8| (v as u32 * 255 / maxval).min(255);
    match (scale(rgb[0]), scale(rgb[1]), scale(rgb[2])) {
        (0, 0, 0) => Cell::Obstacle,
        (0, 255, 0) => Cell::FinishLine,
        (255, 0, 0) => Cell::Enemy,
        (0, 0, 255) => Cell::Bonus,
        _ => Cell::Open,
    }
}

/// Whitespace-separated PPM header tokens, `#` comments skipped
struct HeaderReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> HeaderReader<'a> {
    fn token(&mut self) -> Option<&'a [u8]> {
        loop {
            match *self.bytes.get(self.pos)? {
                b if b.is_ascii_whitespace() => self.pos += 1,
                b'#' => {
                    while self.bytes.get(self.pos).is_some_and(|b| *b != b'\n') {
                        self.pos += 1;
                    }
                }
                _ => break,
            }
        }
        let start = self.pos;
        while self
            .bytes
            .get(self.pos)
            .is_some_and(|b| !b.is_ascii_whitespace())
        {
            self.pos += 1;
        }
        Some(&self.bytes[start..self.pos])
    }

    fn number(&mut self) -> Option<u32> {
        std::str::from_utf8(self.token()?).ok()?.parse().ok()
    }
}

/// Text map: `#` obstacle, `F` finish line, `E` enemy, `B` bonus, anything
/// else open
#[derive(Debug, Clone)]
pub struct AsciiWorld {
    rows: Vec<String>,
}

impl AsciiWorld {
    pub fn new<I, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rows: rows.into_iter().map(Into::into).collect(),
        }
    }
}

impl WorldLoader for AsciiWorld {
    fn load(&self) -> Result<World, WorldLoadError> {
        let width = self.rows.first().map_or(0, |row| row.chars().count());
        if let Some(row) = self.rows.iter().position(|r| r.chars().count() != width) {
            return Err(WorldLoadError::Ragged { row });
        }

        let cells = self.rows.iter().flat_map(|row| {
            row.chars().map(|c| match c {
                '#' => Cell::Obstacle,
                'F' => Cell::FinishLine,
                'E' => Cell::Enemy,
                'B' => Cell::Bonus,
                _ => Cell::Open,
            })
        });
        World::from_cells(width as u32, self.rows.len() as u32, cells)
    }
}
