//! Flap headless driver
//!
//! Loads a world, runs the simulation at its fixed step and prints the final
//! session snapshot as JSON.
//!
//! Usage: `flap [settings.json] [world.ppm]`

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::{Path, PathBuf};
    use std::process::ExitCode;

    use glam::Vec2;

    use flap::consts::PROGRESS_RATE;
    use flap::sim::{
        GameState, LevelStatus, Snapshot, TerrainClass, TickInput, classify_terrain, scroll_step,
        tick,
    };
    use flap::world::{AsciiWorld, PpmWorld, WorldLoader};
    use flap::{GameError, Settings};

    /// Built-in level used when no world file is configured
    const DEMO_MAP: [&str; 10] = [
        "....................................##....................F",
        "...........#.............E..........##..........E.........F",
        "...........#........................##....................F",
        "..................B..........##...........................F",
        ".......................E.....##..............B............F",
        "..........................................................F",
        "..............####.......................#####............F",
        "......................................................E...F",
        ".........E...............B......#.........................F",
        "................................#.........................F",
    ];

    /// How far ahead (normalized x) the autopilot checks for obstacles
    const LOOKAHEAD: f32 = 0.03;
    /// Proportional gain towards the target point
    const STEER_GAIN: f32 = 0.05;
    /// Velocity damping applied by the autopilot
    const STEER_DAMPING: f32 = 0.5;

    pub fn run() -> ExitCode {
        env_logger::init();
        log::info!("Flap (headless) starting...");

        let mut args = std::env::args().skip(1);
        let mut settings = match args.next() {
            Some(path) => Settings::load(Path::new(&path)),
            None => Settings::default(),
        };
        if let Some(world) = args.next() {
            settings.world_path = Some(PathBuf::from(world));
        }

        let result = match &settings.world_path {
            Some(path) => play(&PpmWorld::new(path), &settings),
            None => play(&AsciiWorld::new(DEMO_MAP), &settings),
        };

        match result {
            Ok(snapshot) => {
                match serde_json::to_string_pretty(&snapshot) {
                    Ok(json) => println!("{json}"),
                    Err(err) => log::error!("Couldn't encode snapshot: {err}"),
                }
                ExitCode::SUCCESS
            }
            Err(err) => {
                log::error!("{err}");
                ExitCode::FAILURE
            }
        }
    }

    fn play(loader: &impl WorldLoader, settings: &Settings) -> Result<Snapshot, GameError> {
        let mut state = GameState::init(loader, settings)?;

        while state.status() == LevelStatus::Playing && state.time_ticks < settings.max_ticks {
            let input = if settings.autopilot {
                autopilot(&state)
            } else {
                TickInput::default()
            };
            tick(&mut state, &input);
        }

        log::info!(
            "Finished after {} ticks: {:?}, health {}, progress {:.3}",
            state.time_ticks,
            state.status(),
            state.player().health,
            state.level().progress
        );
        Ok(state.snapshot())
    }

    /// Idle/demo mode: hold fire, cruise a quarter into the view and steer
    /// towards the closest row with no obstacle just ahead
    fn autopilot(state: &GameState) -> TickInput {
        let level = state.level();
        let player = state.player();
        let rows = level.height().max(1);
        let row_height = 1.0 / rows as f32;

        let lane_clear = |y: f32| {
            (1..=4).all(|step| {
                let x = player.pos.x + LOOKAHEAD * step as f32 / 4.0;
                classify_terrain(Vec2::new(x, y), level) != TerrainClass::Obstacle
            })
        };
        let target_y = (0..rows)
            .map(|row| (row as f32 + 0.5) * row_height)
            .filter(|&y| lane_clear(y))
            .min_by(|a, b| {
                (a - player.pos.y)
                    .abs()
                    .total_cmp(&(b - player.pos.y).abs())
            })
            .unwrap_or(player.pos.y);

        // Head for the right edge once scrolling has stopped
        let zone = level.zone_size();
        let scrolling = scroll_step(level.progress, zone, PROGRESS_RATE) != level.progress;
        let target_x = if scrolling {
            level.progress + zone * 0.25
        } else {
            1.0
        };

        let target = Vec2::new(target_x, target_y);
        TickInput {
            nudge: (target - player.pos) * STEER_GAIN - player.vel * STEER_DAMPING,
            fire: true,
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No browser front end; the simulation is used as a library there
}
