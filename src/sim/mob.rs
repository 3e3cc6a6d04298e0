//! Mob entities
//!
//! A mob is any dynamic entity: the player, enemies, bonuses and projectiles.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::PLAYER_STARTING_HEALTH;

/// Mob category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MobKind {
    Player,
    Enemy,
    Bonus,
    /// Fired by the player
    Projectile,
    /// Fired by an enemy
    EnemyProjectile,
}

/// A dynamic entity
///
/// The kind is fixed at creation. List linkage belongs to the owning
/// [`MobList`](super::MobList), not to the mob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mob {
    kind: MobKind,
    /// Normalized world position
    pub pos: Vec2,
    /// Displacement per tick
    pub vel: Vec2,
    /// Player health (zero for every other kind)
    pub health: i32,
    /// Ticks fire has been held (player only)
    #[serde(default)]
    pub shoot_clock: u32,
}

impl Mob {
    pub fn new(kind: MobKind, pos: Vec2, vel: Vec2) -> Self {
        let health = match kind {
            MobKind::Player => PLAYER_STARTING_HEALTH,
            _ => 0,
        };
        Self {
            kind,
            pos,
            vel,
            health,
            shoot_clock: 0,
        }
    }

    #[inline]
    pub fn kind(&self) -> MobKind {
        self.kind
    }
}
