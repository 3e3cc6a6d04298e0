//! Mob-vs-list collision scanning
//!
//! Mobs are points; two mobs touch when their positions are within
//! [`HIT_EXTENT`] of each other on both axes.

use glam::Vec2;

use super::list::{Cursor, MobList};
use super::mob::Mob;
use crate::consts::HIT_EXTENT;

/// Point-proximity test
#[inline]
pub fn touches(a: Vec2, b: Vec2) -> bool {
    let d = (a - b).abs();
    d.x < HIT_EXTENT.x && d.y < HIT_EXTENT.y
}

/// First node of `list`, in traversal order, touching `probe`.
///
/// The probe never collides with itself when it is a member of `list`.
pub fn find_collision(probe: &Mob, list: &MobList) -> Option<Cursor> {
    list.entries()
        .find(|(_, mob)| !std::ptr::eq(*mob, probe) && touches(probe.pos, mob.pos))
        .map(|(cursor, _)| cursor)
}
