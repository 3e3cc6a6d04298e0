//! Game session state
//!
//! `GameState` is the aggregate root: the level, the player and every mob
//! list. Renderers read it through the accessors or an owned [`Snapshot`]
//! taken between ticks.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::level::{Level, LevelStatus};
use super::list::MobList;
use super::mob::{Mob, MobKind};
use super::physics::EnemyMotion;
use crate::consts::*;
use crate::error::{GameError, MobError};
use crate::settings::Settings;
use crate::world::{World, WorldLoader};

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the session RNG was built from (reused on reset)
    pub seed: u64,
    pub(crate) rng: Pcg32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Motion rule for enemies
    pub enemy_motion: EnemyMotion,
    pub(crate) level: Level,
    pub(crate) player: Mob,
    pub(crate) enemies: MobList,
    pub(crate) bonuses: MobList,
    pub(crate) projectiles: MobList,
    pub(crate) enemy_projectiles: MobList,
}

impl GameState {
    /// Start a session on an already loaded world
    pub fn new(world: World, seed: u64, viewport_aspect: f32) -> Result<Self, MobError> {
        let mut enemies = MobList::with_limit(MAX_WORLD_MOBS);
        enemies.extend_from(world.enemies)?;
        let mut bonuses = MobList::with_limit(MAX_WORLD_MOBS);
        bonuses.extend_from(world.bonuses)?;

        Ok(Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            time_ticks: 0,
            enemy_motion: EnemyMotion::default(),
            level: Level::new(world.terrain, viewport_aspect),
            player: spawn_player(),
            enemies,
            bonuses,
            projectiles: MobList::with_limit(MAX_LIVE_PROJECTILES),
            enemy_projectiles: MobList::with_limit(MAX_LIVE_PROJECTILES),
        })
    }

    /// Load the world and start a session with the given settings.
    ///
    /// A load failure means no session: nothing ever enters `Playing`.
    pub fn init(loader: &impl WorldLoader, settings: &Settings) -> Result<Self, GameError> {
        let world = loader.load()?;
        let seed = settings.seed_or_clock();
        let mut state = Self::new(world, seed, settings.viewport_aspect())?;
        state.enemy_motion = settings.enemy_motion;

        log::info!(
            "Session started: {}x{} level, {} enemies, {} bonuses, seed {}",
            state.level.width(),
            state.level.height(),
            state.enemies.len(),
            state.bonuses.len(),
            seed
        );
        Ok(state)
    }

    /// Drop every mob and restart from a freshly loaded world.
    ///
    /// The new session is built aside and swapped in whole, so if loading
    /// or seeding fails the current session is left as it was.
    pub fn reset(&mut self, loader: &impl WorldLoader) -> Result<(), GameError> {
        let world = loader.load()?;
        let mut fresh = Self::new(world, self.seed, self.level.viewport_aspect())?;
        fresh.enemy_motion = self.enemy_motion;
        *self = fresh;

        log::info!("Session reset (seed {})", self.seed);
        Ok(())
    }

    /// Input-driven nudge, clamped so neither axis exceeds
    /// `PLAYER_MAX_SPEED`
    pub fn change_player_velocity(&mut self, delta: Vec2) {
        let max = Vec2::splat(PLAYER_MAX_SPEED);
        self.player.vel = (self.player.vel + delta).clamp(-max, max);
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn status(&self) -> LevelStatus {
        self.level.status
    }

    pub fn player(&self) -> &Mob {
        &self.player
    }

    pub fn enemies(&self) -> &MobList {
        &self.enemies
    }

    pub fn bonuses(&self) -> &MobList {
        &self.bonuses
    }

    pub fn projectiles(&self) -> &MobList {
        &self.projectiles
    }

    pub fn enemy_projectiles(&self) -> &MobList {
        &self.enemy_projectiles
    }

    /// Mob list holding a given kind (the player has none)
    pub fn mobs(&self, kind: MobKind) -> Option<&MobList> {
        match kind {
            MobKind::Player => None,
            MobKind::Enemy => Some(&self.enemies),
            MobKind::Bonus => Some(&self.bonuses),
            MobKind::Projectile => Some(&self.projectiles),
            MobKind::EnemyProjectile => Some(&self.enemy_projectiles),
        }
    }

    pub(crate) fn mobs_mut(&mut self, kind: MobKind) -> Option<&mut MobList> {
        match kind {
            MobKind::Player => None,
            MobKind::Enemy => Some(&mut self.enemies),
            MobKind::Bonus => Some(&mut self.bonuses),
            MobKind::Projectile => Some(&mut self.projectiles),
            MobKind::EnemyProjectile => Some(&mut self.enemy_projectiles),
        }
    }

    /// Off-screen mobs are not drawn
    pub fn is_hidden(&self, mob: &Mob) -> bool {
        self.level.is_hidden(mob)
    }

    /// Owned copy of everything a renderer draws
    pub fn snapshot(&self) -> Snapshot {
        let collect = |list: &MobList| -> Vec<Mob> { list.iter().cloned().collect() };
        Snapshot {
            time_ticks: self.time_ticks,
            status: self.level.status,
            progress: self.level.progress,
            zone_size: self.level.zone_size(),
            level_width: self.level.width(),
            level_height: self.level.height(),
            player: self.player.clone(),
            enemies: collect(&self.enemies),
            bonuses: collect(&self.bonuses),
            projectiles: collect(&self.projectiles),
            enemy_projectiles: collect(&self.enemy_projectiles),
        }
    }
}

fn spawn_player() -> Mob {
    Mob::new(MobKind::Player, PLAYER_START, Vec2::ZERO)
}

/// Frozen view of a session, taken after a tick completes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub time_ticks: u64,
    pub status: LevelStatus,
    pub progress: f32,
    pub zone_size: f32,
    pub level_width: u32,
    pub level_height: u32,
    pub player: Mob,
    pub enemies: Vec<Mob>,
    pub bonuses: Vec<Mob>,
    pub projectiles: Vec<Mob>,
    pub enemy_projectiles: Vec<Mob>,
}
