//! Error types for world loading and session management

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Mob allocation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MobError {
    /// The list could not grow (out of memory or live node cap reached)
    Allocation { live: usize },
}

impl fmt::Display for MobError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MobError::Allocation { live } => {
                write!(f, "out of memory allocating mob ({live} live)")
            }
        }
    }
}

impl std::error::Error for MobError {}

/// Failure to load a world file
#[derive(Debug)]
pub enum WorldLoadError {
    /// File missing or unreadable
    Io { path: PathBuf, source: io::Error },
    /// Not a P6 image, or malformed header
    Format { path: PathBuf, reason: String },
    /// Pixel data ended early
    Truncated { path: PathBuf },
    /// Zero width or height
    Empty,
    /// ASCII map rows of differing length
    Ragged { row: usize },
}

impl fmt::Display for WorldLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorldLoadError::Io { path, source } => {
                write!(f, "couldn't open file at \"{}\": {source}", path.display())
            }
            WorldLoadError::Format { path, reason } => write!(
                f,
                "world files must be in P6 ppm image format ({}): {reason}",
                path.display()
            ),
            WorldLoadError::Truncated { path } => {
                write!(f, "unexpected end of file \"{}\"", path.display())
            }
            WorldLoadError::Empty => write!(f, "world has no cells"),
            WorldLoadError::Ragged { row } => {
                write!(f, "map row {row} has a different width than row 0")
            }
        }
    }
}

impl std::error::Error for WorldLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WorldLoadError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Top-level session error
#[derive(Debug)]
pub enum GameError {
    Mob(MobError),
    WorldLoad(WorldLoadError),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::Mob(err) => write!(f, "couldn't seed mobs: {err}"),
            GameError::WorldLoad(err) => write!(f, "couldn't load world: {err}"),
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::Mob(err) => Some(err),
            GameError::WorldLoad(err) => Some(err),
        }
    }
}

impl From<MobError> for GameError {
    fn from(err: MobError) -> Self {
        GameError::Mob(err)
    }
}

impl From<WorldLoadError> for GameError {
    fn from(err: WorldLoadError) -> Self {
        GameError::WorldLoad(err)
    }
}
