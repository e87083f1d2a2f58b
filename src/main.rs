//! Swarm Survivor headless runner
//!
//! Plays one game with a simple autopilot and prints the final state as JSON.
//!
//! Usage: `swarm-survivor [SETTINGS] [--realtime] [--frames N]`

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use glam::Vec2;

use swarm_survivor::consts::FRAME_DT;
use swarm_survivor::sim::{GameEvent, GameState, Viewport, nearest_enemy};
use swarm_survivor::{Control, FixedStep, Game, Settings, TickSource, WallClock};

/// Two minutes of play at 60 frames per second
const DEFAULT_FRAMES: u64 = 60 * 120;

/// Headless Swarm Survivor runner driven by an autopilot
#[derive(Parser, Debug)]
#[command(name = "swarm-survivor")]
#[command(about = "Play one game with an autopilot and print the final state as JSON")]
struct Args {
    /// Settings JSON file; defaults apply when omitted
    settings: Option<PathBuf>,

    /// Pace frames with the wall clock instead of running flat out
    #[arg(long)]
    realtime: bool,

    /// Frames to simulate before stopping
    #[arg(long, default_value_t = DEFAULT_FRAMES)]
    frames: u64,
}

/// Run away from the nearest enemy, drift back toward the center otherwise
fn autopilot(state: &GameState) -> Vec2 {
    let pos = state.player.pos;
    match nearest_enemy(pos, &state.enemies) {
        Some(enemy) => (pos - enemy.pos).normalize_or_zero(),
        None => (state.viewport.center() - pos).normalize_or_zero(),
    }
}

fn play(game: &mut Game, source: &mut dyn TickSource) -> u64 {
    game.run(source, |game, events| {
        for event in events {
            match event {
                GameEvent::LevelUp { level, choices } => {
                    log::info!("Reached level {}", level);
                    let Some(&choice) = choices.first() else {
                        continue;
                    };
                    if let Err(e) = game.apply_upgrade(choice) {
                        log::error!("Failed to apply upgrade: {}", e);
                        return Control::Stop;
                    }
                }
                GameEvent::GameOver { .. } => return Control::Stop,
            }
        }
        let direction = autopilot(game.state());
        game.set_direction(direction);
        Control::Continue
    })
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Swarm Survivor (headless) starting...");

    let args = Args::parse();

    let settings = match &args.settings {
        Some(path) => match Settings::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("{}", e);
                return ExitCode::FAILURE;
            }
        },
        None => Settings::default(),
    };

    let mut game = match Game::new(settings, Viewport::new(800, 600)) {
        Ok(game) => game,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let calls = if args.realtime {
        play(&mut game, &mut WallClock::per_frame().limit(args.frames))
    } else {
        play(&mut game, &mut FixedStep::new(FRAME_DT, args.frames))
    };

    let snapshot = game.snapshot();
    log::info!("Finished after {} advance calls", calls);
    match serde_json::to_string_pretty(&snapshot.summary()) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Failed to serialize summary: {}", e);
            ExitCode::FAILURE
        }
    }
}
