//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (list traversal order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod level;
pub mod list;
pub mod mob;
pub mod physics;
pub mod state;
pub mod terrain;
pub mod tick;

pub use collision::find_collision;
pub use level::{Level, LevelStatus, scroll_step, viewport_zone_size};
pub use list::{Cursor, MobList};
pub use mob::{Mob, MobKind};
pub use physics::{EnemyMotion, MotionRule, advance};
pub use state::{GameState, Snapshot};
pub use terrain::{TerrainClass, TerrainGrid, classify_terrain};
pub use tick::{TickInput, tick, tick_with_rng};
