//! Flap - a side-scrolling flap arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, game state)
//! - `world`: Terrain and spawn loading from image/ASCII maps
//! - `settings`: Runtime configuration for the driver
//! - `error`: Error types shared by the loader and the session

pub mod error;
pub mod settings;
pub mod sim;
pub mod world;

pub use error::{GameError, MobError, WorldLoadError};
pub use settings::Settings;

/// Game tuning constants
///
/// Positions and velocities are in normalized world units: x spans the whole
/// level width, y spans its height. Velocities are per tick.
pub mod consts {
    use glam::Vec2;

    /// Player spawn point
    pub const PLAYER_START: Vec2 = Vec2::new(0.01, 0.5);
    pub const PLAYER_STARTING_HEALTH: i32 = 100;
    /// Per-axis speed cap applied to input nudges
    pub const PLAYER_MAX_SPEED: f32 = 0.01;
    /// Exponential velocity decay applied to the player every tick
    pub const DRAG: f32 = 0.95;

    /// Scroll increment per tick
    pub const PROGRESS_RATE: f32 = 0.0005;

    /// Ticks between two player shots while fire is held
    pub const FIRE_INTERVAL: u32 = 20;
    pub const PLAYER_PROJECTILE_SPEED: f32 = 0.003;
    pub const ENEMY_PROJECTILE_SPEED: f32 = 0.002;

    /// Enemies fire on a 1 in N roll per tick
    pub const ENEMY_SHOT_ODDS: u32 = 300;
    /// Max vertical distance between enemy and player for an enemy to fire
    pub const ENEMY_AIM_TOLERANCE: f32 = 0.1;
    /// Vertical speed given to loaded enemies (used by drifting enemies)
    pub const ENEMY_DRIFT_SPEED: f32 = 0.002;

    /// Health deltas applied to the player on contact
    pub const OBSTACLE_DAMAGE: i32 = -25;
    pub const ENEMY_DAMAGE: i32 = -20;
    pub const ENEMY_PROJECTILE_DAMAGE: i32 = -10;
    pub const BONUS_HEAL: i32 = 20;

    /// Fraction of speed kept after bouncing off an obstacle
    pub const OBSTACLE_RESTITUTION: f32 = 0.5;

    /// Two mobs collide when their positions are this close on both axes
    pub const HIT_EXTENT: Vec2 = Vec2::new(0.004, 0.04);

    /// Live node cap for the enemy and bonus lists
    pub const MAX_WORLD_MOBS: usize = 65_536;
    /// Live node cap for each projectile list
    pub const MAX_LIVE_PROJECTILES: usize = 4096;

    /// Default viewport, used for the visible zone computation
    pub const VIEWPORT_WIDTH: u32 = 800;
    pub const VIEWPORT_HEIGHT: u32 = 600;
}
