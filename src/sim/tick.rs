//! Fixed timestep simulation tick
//!
//! Core game loop that advances the session by one step. Phases run in a
//! fixed order; as soon as the level reaches a terminal status the rest of
//! the tick is skipped, and every later tick is a no-op.

use std::ops::ControlFlow;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::collision::find_collision;
use super::level::{LevelStatus, scroll_step};
use super::list::MobList;
use super::mob::{Mob, MobKind};
use super::physics::{MotionRule, advance};
use super::state::GameState;
use super::terrain::{TerrainClass, classify_terrain};
use crate::consts::*;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Velocity change requested this tick
    pub nudge: Vec2,
    /// Fire button held
    pub fire: bool,
}

/// Player contact with these lists consumes the mob and applies the delta
const CONTACTS: [(MobKind, i32); 3] = [
    (MobKind::Bonus, BONUS_HEAL),
    (MobKind::Enemy, ENEMY_DAMAGE),
    (MobKind::EnemyProjectile, ENEMY_PROJECTILE_DAMAGE),
];

/// Advance the game state by one fixed timestep using the session RNG
pub fn tick(state: &mut GameState, input: &TickInput) {
    if state.level.status.is_terminal() {
        return;
    }
    let mut rng = std::mem::replace(&mut state.rng, Pcg32::new(0, 0));
    tick_with_rng(state, input, &mut rng);
    state.rng = rng;
}

/// Advance the game state by one fixed timestep with an explicit RNG
pub fn tick_with_rng<R: Rng>(state: &mut GameState, input: &TickInput, rng: &mut R) {
    if state.level.status.is_terminal() {
        return;
    }

    state.time_ticks += 1;
    if input.nudge != Vec2::ZERO {
        state.change_player_velocity(input.nudge);
    }

    scroll(state);
    player_shoot(state, input.fire);

    if update_player(state).is_break() {
        return;
    }

    update_enemies(state, rng);
    update_enemy_projectiles(state);
    update_projectiles(state);
}

fn scroll(state: &mut GameState) {
    let zone = state.level.zone_size();
    state.level.progress = scroll_step(state.level.progress, zone, PROGRESS_RATE);
}

/// Fire on the first held tick, then every `FIRE_INTERVAL` ticks
fn player_shoot(state: &mut GameState, fire: bool) {
    let player = &mut state.player;
    if !fire {
        player.shoot_clock = 0;
        return;
    }

    if player.shoot_clock.is_multiple_of(FIRE_INTERVAL) {
        let shot = Mob::new(
            MobKind::Projectile,
            player.pos,
            Vec2::new(PLAYER_PROJECTILE_SPEED, 0.0),
        );
        spawn(&mut state.projectiles, shot);
    }
    player.shoot_clock = player.shoot_clock.wrapping_add(1);
}

/// Player physics, terrain response, scroll clamp and mob contacts
fn update_player(state: &mut GameState) -> ControlFlow<()> {
    advance(
        &mut state.player,
        MotionRule::for_kind(MobKind::Player, state.enemy_motion),
    );

    match classify_terrain(state.player.pos, &state.level) {
        TerrainClass::Obstacle => {
            if apply_health(state, OBSTACLE_DAMAGE).is_break() {
                return ControlFlow::Break(());
            }
            state.player.vel = -state.player.vel * OBSTACLE_RESTITUTION;
        }
        TerrainClass::FinishLine => {
            state.level.status = LevelStatus::LevelComplete;
            log::info!("Level complete at tick {}", state.time_ticks);
            return ControlFlow::Break(());
        }
        TerrainClass::Open => {}
    }

    // Can't be scrolled off the left edge
    if state.player.pos.x < state.level.progress {
        state.player.pos.x = state.level.progress;
    }

    for (kind, delta) in CONTACTS {
        let player = state.player.clone();
        let hit = state
            .mobs_mut(kind)
            .and_then(|list| find_collision(&player, list).map(|cursor| list.remove(cursor)))
            .is_some();
        if hit {
            log::debug!("Player touched {kind:?} ({delta:+})");
            if apply_health(state, delta).is_break() {
                return ControlFlow::Break(());
            }
        }
    }

    ControlFlow::Continue(())
}

/// Apply a health delta; dropping below zero ends the game and leaves health
/// at its last valid value
fn apply_health(state: &mut GameState, delta: i32) -> ControlFlow<()> {
    let health = state.player.health.saturating_add(delta);
    if health < 0 {
        state.level.status = LevelStatus::GameOver;
        log::info!("Game over at tick {}", state.time_ticks);
        ControlFlow::Break(())
    } else {
        state.player.health = health;
        ControlFlow::Continue(())
    }
}

/// Move visible enemies, bounce them off terrain and let them shoot
fn update_enemies<R: Rng>(state: &mut GameState, rng: &mut R) {
    let rule = MotionRule::for_kind(MobKind::Enemy, state.enemy_motion);
    let player_y = state.player.pos.y;

    let mut cursor = state.enemies.first();
    while let Some(current) = cursor {
        cursor = state.enemies.next(current);
        let Some(enemy) = state.enemies.get_mut(current) else {
            continue;
        };
        if state.level.is_hidden(enemy) {
            continue;
        }

        advance(enemy, rule);
        if classify_terrain(enemy.pos, &state.level) != TerrainClass::Open {
            enemy.vel = -enemy.vel;
        }

        let roll = rng.random_range(0..ENEMY_SHOT_ODDS);
        let aligned = (enemy.pos.y - player_y).abs() < ENEMY_AIM_TOLERANCE;
        if roll == 0 && aligned {
            let shot = Mob::new(
                MobKind::EnemyProjectile,
                enemy.pos,
                Vec2::new(-ENEMY_PROJECTILE_SPEED, 0.0),
            );
            spawn(&mut state.enemy_projectiles, shot);
        }
    }
}

/// Enemy shots fly until they leave the screen
fn update_enemy_projectiles(state: &mut GameState) {
    let rule = MotionRule::for_kind(MobKind::EnemyProjectile, state.enemy_motion);

    let mut cursor = state.enemy_projectiles.first();
    while let Some(current) = cursor {
        let Some(shot) = state.enemy_projectiles.get_mut(current) else {
            break;
        };
        advance(shot, rule);

        cursor = if state.level.is_hidden(shot) {
            state.enemy_projectiles.remove(current)
        } else {
            state.enemy_projectiles.next(current)
        };
    }
}

/// Player shots die on terrain, off screen, or together with the enemy they
/// hit
fn update_projectiles(state: &mut GameState) {
    let rule = MotionRule::for_kind(MobKind::Projectile, state.enemy_motion);

    let mut cursor = state.projectiles.first();
    while let Some(current) = cursor {
        let Some(shot) = state.projectiles.get_mut(current) else {
            break;
        };
        advance(shot, rule);

        let blocked = classify_terrain(shot.pos, &state.level) != TerrainClass::Open
            || state.level.is_hidden(shot);
        if blocked {
            cursor = state.projectiles.remove(current);
            continue;
        }

        if let Some(target) = find_collision(shot, &state.enemies) {
            state.enemies.remove(target);
            cursor = state.projectiles.remove(current);
            log::debug!("Enemy destroyed at tick {}", state.time_ticks);
            continue;
        }

        cursor = state.projectiles.next(current);
    }
}

/// Prepend a new mob; a failed allocation only costs this spawn
fn spawn(list: &mut MobList, mob: Mob) {
    let kind = mob.kind();
    if let Err(err) = list.prepend(mob) {
        log::warn!("Dropped {kind:?} spawn: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::world::AsciiWorld;
    use rand::{RngCore, SeedableRng};

    /// RNG returning the same word forever
    struct ConstRng(u64);

    impl RngCore for ConstRng {
        fn next_u32(&mut self) -> u32 {
            self.0 as u32
        }

        fn next_u64(&mut self) -> u64 {
            self.0
        }

        fn fill_bytes(&mut self, dst: &mut [u8]) {
            dst.fill(self.0 as u8);
        }
    }

    const NEVER: u64 = u64::MAX;
    const ALWAYS: u64 = 0;

    fn state_from(rows: &[&str]) -> GameState {
        let settings = Settings {
            seed: Some(12345),
            ..Settings::default()
        };
        GameState::init(&AsciiWorld::new(rows.iter().copied()), &settings).unwrap()
    }

    fn open_state() -> GameState {
        state_from(&[".........."; 5])
    }

    fn place(state: &mut GameState, kind: MobKind, pos: Vec2, vel: Vec2) {
        let list = state.mobs_mut(kind).unwrap();
        list.prepend(Mob::new(kind, pos, vel)).unwrap();
    }

    #[test]
    fn test_tick_scrolls_and_counts() {
        let mut state = open_state();
        tick(&mut state, &TickInput::default());

        assert_eq!(state.time_ticks, 1);
        assert!((state.level.progress - PROGRESS_RATE).abs() < 1e-7);
        assert_eq!(state.status(), LevelStatus::Playing);
    }

    #[test]
    fn test_terminal_status_freezes_session() {
        for status in [LevelStatus::GameOver, LevelStatus::LevelComplete] {
            let mut state = state_from(&["...E......", "....B.....", "..E......."]);
            state.change_player_velocity(Vec2::new(0.005, 0.002));
            place(&mut state, MobKind::Projectile, Vec2::new(0.2, 0.5), Vec2::X * 0.003);
            state.level.status = status;
            let before = state.snapshot();

            let input = TickInput {
                nudge: Vec2::new(0.001, 0.001),
                fire: true,
            };
            for _ in 0..10 {
                tick(&mut state, &input);
                tick_with_rng(&mut state, &input, &mut ConstRng(ALWAYS));
            }

            assert_eq!(state.snapshot(), before);
        }
    }

    #[test]
    fn test_obstacle_damage_below_zero_is_game_over() {
        // Player starts on the obstacle in column 0 of the middle row
        let mut state = state_from(&["..........", "..........", "#.........", "..........", ".........."]);
        state.player.health = 20;

        tick(&mut state, &TickInput::default());

        assert_eq!(state.status(), LevelStatus::GameOver);
        assert_eq!(state.player.health, 20);
    }

    #[test]
    fn test_obstacle_damages_and_bounces_player() {
        let mut state = state_from(&["..........", "..........", "#.........", "..........", ".........."]);
        state.player.vel = Vec2::new(0.0, 0.002);

        tick(&mut state, &TickInput::default());

        assert_eq!(state.status(), LevelStatus::Playing);
        assert_eq!(state.player.health, PLAYER_STARTING_HEALTH + OBSTACLE_DAMAGE);
        let expected = -0.002 * DRAG * OBSTACLE_RESTITUTION;
        assert!((state.player.vel.y - expected).abs() < 1e-7);
    }

    #[test]
    fn test_finish_line_completes_level_and_ends_tick() {
        let mut state = state_from(&["..........", "..........", "F.........", "..........", ".........."]);
        place(&mut state, MobKind::Bonus, PLAYER_START, Vec2::ZERO);

        tick(&mut state, &TickInput::default());

        assert_eq!(state.status(), LevelStatus::LevelComplete);
        // Contacts are not resolved after the level is complete
        assert_eq!(state.bonuses.len(), 1);
        assert_eq!(state.player.health, PLAYER_STARTING_HEALTH);
    }

    #[test]
    fn test_player_clamped_to_scroll_edge() {
        let mut state = open_state();
        state.level.progress = 0.2;

        tick(&mut state, &TickInput::default());

        assert_eq!(state.player.pos.x, state.level.progress);
    }

    #[test]
    fn test_player_contacts_consume_mobs() {
        let mut state = open_state();
        place(&mut state, MobKind::Bonus, PLAYER_START, Vec2::ZERO);
        place(&mut state, MobKind::Enemy, PLAYER_START, Vec2::ZERO);
        place(&mut state, MobKind::EnemyProjectile, PLAYER_START, Vec2::ZERO);

        tick(&mut state, &TickInput::default());

        assert!(state.bonuses.is_empty());
        assert!(state.enemies.is_empty());
        assert!(state.enemy_projectiles.is_empty());
        assert_eq!(
            state.player.health,
            PLAYER_STARTING_HEALTH + BONUS_HEAL + ENEMY_DAMAGE + ENEMY_PROJECTILE_DAMAGE
        );
    }

    #[test]
    fn test_only_first_contact_per_list_is_taken() {
        let mut state = open_state();
        place(&mut state, MobKind::Bonus, PLAYER_START, Vec2::ZERO);
        place(&mut state, MobKind::Bonus, PLAYER_START, Vec2::ZERO);

        tick(&mut state, &TickInput::default());

        assert_eq!(state.bonuses.len(), 1);
        assert_eq!(state.player.health, PLAYER_STARTING_HEALTH + BONUS_HEAL);
    }

    #[test]
    fn test_fatal_contact_stops_the_tick() {
        let mut state = open_state();
        state.player.health = 5;
        place(&mut state, MobKind::Enemy, PLAYER_START, Vec2::ZERO);
        place(&mut state, MobKind::EnemyProjectile, PLAYER_START, Vec2::ZERO);

        tick(&mut state, &TickInput::default());

        assert_eq!(state.status(), LevelStatus::GameOver);
        assert_eq!(state.player.health, 5);
        assert!(state.enemies.is_empty());
        assert_eq!(state.enemy_projectiles.len(), 1);
    }

    #[test]
    fn test_aligned_enemy_fires_on_zero_roll() {
        let mut state = open_state();
        state.player.pos = Vec2::new(0.05, 0.55);
        let enemy_pos = Vec2::new(0.3, 0.5);
        place(&mut state, MobKind::Enemy, enemy_pos, Vec2::ZERO);

        update_enemies(&mut state, &mut ConstRng(ALWAYS));

        assert_eq!(state.enemy_projectiles.len(), 1);
        let shot = state.enemy_projectiles.iter().next().unwrap();
        assert_eq!(shot.kind(), MobKind::EnemyProjectile);
        assert_eq!(shot.pos, enemy_pos);
        assert!(shot.vel.x < 0.0);
        assert_eq!(shot.vel.y, 0.0);
    }

    #[test]
    fn test_enemy_holds_fire_when_roll_or_aim_misses() {
        let mut state = open_state();
        state.player.pos = Vec2::new(0.05, 0.55);
        place(&mut state, MobKind::Enemy, Vec2::new(0.3, 0.5), Vec2::ZERO);

        update_enemies(&mut state, &mut ConstRng(NEVER));
        assert!(state.enemy_projectiles.is_empty());

        state.player.pos.y = 0.9;
        update_enemies(&mut state, &mut ConstRng(ALWAYS));
        assert!(state.enemy_projectiles.is_empty());
    }

    #[test]
    fn test_hidden_enemies_are_frozen() {
        let mut state = open_state();
        state.enemy_motion = crate::sim::EnemyMotion::Drift;
        state.player.pos.y = 0.5;
        let far = Vec2::new(0.95, 0.5);
        place(&mut state, MobKind::Enemy, far, Vec2::new(0.0, 0.01));

        update_enemies(&mut state, &mut ConstRng(ALWAYS));

        assert_eq!(state.enemies.iter().next().map(|e| e.pos), Some(far));
        assert!(state.enemy_projectiles.is_empty());
    }

    #[test]
    fn test_drifting_enemy_bounces_off_terrain() {
        let mut state = state_from(&["..........", "..........", "...#......", "...E......", ".........."]);
        state.enemy_motion = crate::sim::EnemyMotion::Drift;
        let start = state.enemies.iter().next().unwrap().pos;
        if let Some(first) = state.enemies.first() {
            state.enemies.get_mut(first).unwrap().vel = Vec2::new(0.0, -0.2);
        }

        update_enemies(&mut state, &mut ConstRng(NEVER));

        let enemy = state.enemies.iter().next().unwrap();
        assert!((enemy.pos.y - (start.y - 0.2)).abs() < 1e-6);
        assert!((enemy.vel.y - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_projectile_and_enemy_destroy_each_other() {
        let mut state = open_state();
        let enemy_pos = Vec2::new(0.3, 0.5);
        place(&mut state, MobKind::Enemy, enemy_pos, Vec2::ZERO);
        place(&mut state, MobKind::Enemy, Vec2::new(0.3, 0.9), Vec2::ZERO);
        place(
            &mut state,
            MobKind::Projectile,
            enemy_pos - Vec2::new(PLAYER_PROJECTILE_SPEED, 0.0),
            Vec2::new(PLAYER_PROJECTILE_SPEED, 0.0),
        );
        place(
            &mut state,
            MobKind::Projectile,
            Vec2::new(0.1, 0.2),
            Vec2::new(PLAYER_PROJECTILE_SPEED, 0.0),
        );

        update_projectiles(&mut state);

        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.enemies.iter().next().map(|e| e.pos.y), Some(0.9));
        // The other shot is still in flight
        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(state.projectiles.iter().next().map(|p| p.pos.y), Some(0.2));
    }

    #[test]
    fn test_projectiles_despawn_on_terrain_and_off_screen() {
        let mut state = state_from(&["..........", "..#.......", "..........", "..........", ".........."]);
        let speed = Vec2::new(PLAYER_PROJECTILE_SPEED, 0.0);
        // Flies into the obstacle cell
        place(&mut state, MobKind::Projectile, Vec2::new(0.199, 0.3), speed);
        // Leaves the visible zone
        let edge = state.level.zone_size();
        place(&mut state, MobKind::Projectile, Vec2::new(edge - 0.001, 0.7), speed);
        place(
            &mut state,
            MobKind::EnemyProjectile,
            Vec2::new(0.001, 0.7),
            Vec2::new(-ENEMY_PROJECTILE_SPEED, 0.0),
        );
        place(
            &mut state,
            MobKind::EnemyProjectile,
            Vec2::new(0.3, 0.7),
            Vec2::new(-ENEMY_PROJECTILE_SPEED, 0.0),
        );

        update_projectiles(&mut state);
        update_enemy_projectiles(&mut state);

        assert!(state.projectiles.is_empty());
        assert_eq!(state.enemy_projectiles.len(), 1);
        let survivor = state.enemy_projectiles.iter().next().unwrap();
        assert!((survivor.pos.x - (0.3 - ENEMY_PROJECTILE_SPEED)).abs() < 1e-6);
    }

    #[test]
    fn test_fire_interval() {
        let mut state = open_state();
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };

        tick(&mut state, &fire);
        assert_eq!(state.projectiles.len(), 1);

        for _ in 1..FIRE_INTERVAL {
            tick(&mut state, &fire);
        }
        assert_eq!(state.projectiles.len(), 1);

        tick(&mut state, &fire);
        assert_eq!(state.projectiles.len(), 2);

        // Releasing resets the clock, the next press fires at once
        tick(&mut state, &TickInput::default());
        tick(&mut state, &fire);
        assert_eq!(state.projectiles.len(), 3);
    }

    #[test]
    fn test_failed_spawn_is_skipped() {
        let mut state = open_state();
        state.projectiles = MobList::with_limit(0);
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };

        tick(&mut state, &fire);

        assert!(state.projectiles.is_empty());
        assert_eq!(state.status(), LevelStatus::Playing);
        assert_eq!(state.time_ticks, 1);
    }

    #[test]
    fn test_determinism() {
        let rows = ["....E.....", "..E...B...", "...E..E...", ".....E....", "......E..F"];
        let mut state1 = state_from(&rows);
        let mut state2 = state_from(&rows);

        let inputs = [
            TickInput {
                nudge: Vec2::new(0.001, 0.0),
                fire: true,
            },
            TickInput {
                nudge: Vec2::new(0.0, -0.002),
                fire: true,
            },
            TickInput::default(),
        ];

        for i in 0..600 {
            let input = &inputs[i % inputs.len()];
            tick(&mut state1, input);
            tick(&mut state2, input);
        }

        assert_eq!(state1.snapshot(), state2.snapshot());
    }

    #[test]
    fn test_tick_carries_session_rng_forward() {
        let rows = ["..E.......", "....E.....", "..E.......", "..........", ".........F"];
        let mut session = state_from(&rows);
        let mut external = state_from(&rows);
        let mut rng = Pcg32::seed_from_u64(12345);

        for _ in 0..50 {
            tick(&mut session, &TickInput::default());
            tick_with_rng(&mut external, &TickInput::default(), &mut rng);
        }

        assert_eq!(session.rng, rng);
        assert_ne!(session.rng, Pcg32::seed_from_u64(12345));
        assert_eq!(session.snapshot(), external.snapshot());
    }
}
