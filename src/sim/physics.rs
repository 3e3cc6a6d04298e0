//! Per-tick motion
//!
//! Fixed-step Euler integration: one call advances a mob by exactly one tick.

use serde::{Deserialize, Serialize};

use super::mob::{Mob, MobKind};
use crate::consts::DRAG;

/// How enemies move between ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyMotion {
    /// Enemies hold their spawn position
    #[default]
    Stationary,
    /// Enemies move by their velocity (bounced back by terrain)
    Drift,
}

/// Motion rule applied by [`advance`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotionRule {
    /// Integrate, apply drag, bounce off the playfield edges
    Player { drag: f32 },
    /// Integrate only
    Ballistic,
    /// Don't move
    Fixed,
}

impl MotionRule {
    pub fn for_kind(kind: MobKind, enemy_motion: EnemyMotion) -> Self {
        match kind {
            MobKind::Player => MotionRule::Player { drag: DRAG },
            MobKind::Enemy => match enemy_motion {
                EnemyMotion::Stationary => MotionRule::Fixed,
                EnemyMotion::Drift => MotionRule::Ballistic,
            },
            MobKind::Projectile | MobKind::EnemyProjectile => MotionRule::Ballistic,
            MobKind::Bonus => MotionRule::Fixed,
        }
    }
}

/// Advance a mob by one tick
pub fn advance(mob: &mut Mob, rule: MotionRule) {
    match rule {
        MotionRule::Fixed => {}
        MotionRule::Ballistic => mob.pos += mob.vel,
        MotionRule::Player { drag } => {
            mob.pos += mob.vel;
            mob.vel *= drag;

            // Elastic bounce off the screen edges
            if mob.pos.x > 1.0 || mob.pos.x < 0.0 {
                mob.vel.x = -mob.vel.x;
                mob.pos.x = mob.pos.x.clamp(0.0, 1.0);
            }
            if mob.pos.y > 1.0 || mob.pos.y < 0.0 {
                mob.vel.y = -mob.vel.y;
                mob.pos.y = mob.pos.y.clamp(0.0, 1.0);
            }
        }
    }
}
