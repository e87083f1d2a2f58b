//! Frame orchestrator
//!
//! Owns the authoritative `GameState`, turns host time into fixed frames,
//! applies host commands between frames and publishes an immutable
//! `Snapshot` after every completed frame.

use std::sync::Arc;
use std::time::{Duration, Instant};

use glam::Vec2;

use crate::consts::{FRAME_DT, UPGRADE_CHOICES};
use crate::error::{ConfigError, GameError};
use crate::settings::Settings;
use crate::sim::movement::move_player;
use crate::sim::upgrades::random_choices;
use crate::sim::{GameEvent, GamePhase, GameState, Snapshot, TickInput, UpgradeKind, Viewport, tick};

/// Slack when comparing accumulated time against whole frames
const ACCUMULATOR_EPSILON: f32 = 1e-6;

/// Something that paces the game loop
///
/// Each call yields the seconds elapsed since the previous call, or `None`
/// when the source is exhausted and the loop should end.
pub trait TickSource {
    fn next_dt(&mut self) -> Option<f32>;
}

/// Synchronous source yielding a constant `dt`, for tests and headless runs
#[derive(Debug, Clone)]
pub struct FixedStep {
    dt: f32,
    remaining: Option<u64>,
}

impl FixedStep {
    /// Yield `dt` exactly `frames` times
    pub fn new(dt: f32, frames: u64) -> Self {
        Self {
            dt,
            remaining: Some(frames),
        }
    }

    /// Yield `dt` forever
    pub fn endless(dt: f32) -> Self {
        Self { dt, remaining: None }
    }
}

impl TickSource for FixedStep {
    fn next_dt(&mut self) -> Option<f32> {
        match self.remaining.as_mut() {
            Some(0) => None,
            Some(n) => {
                *n -= 1;
                Some(self.dt)
            }
            None => Some(self.dt),
        }
    }
}

/// Real-time source that sleeps to hold a target frame rate
#[derive(Debug, Clone)]
pub struct WallClock {
    frame: Duration,
    last: Option<Instant>,
    remaining: Option<u64>,
}

impl WallClock {
    pub fn new(frame: Duration) -> Self {
        Self {
            frame,
            last: None,
            remaining: None,
        }
    }

    /// Stop after `frames` more calls
    pub fn limit(mut self, frames: u64) -> Self {
        self.remaining = Some(frames);
        self
    }

    /// Pace at the simulation frame rate
    pub fn per_frame() -> Self {
        Self::new(Duration::from_secs_f32(FRAME_DT))
    }
}

impl TickSource for WallClock {
    fn next_dt(&mut self) -> Option<f32> {
        if let Some(remaining) = self.remaining.as_mut() {
            if *remaining == 0 {
                return None;
            }
            *remaining -= 1;
        }

        let Some(last) = self.last else {
            self.last = Some(Instant::now());
            return Some(0.0);
        };

        let elapsed = last.elapsed();
        if elapsed < self.frame {
            std::thread::sleep(self.frame - elapsed);
        }
        let now = Instant::now();
        self.last = Some(now);
        Some(now.duration_since(last).as_secs_f32())
    }
}

/// What the `run` callback wants the loop to do next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Stop,
}

/// A running game: simulation state plus the host-facing command surface
pub struct Game {
    state: GameState,
    input: TickInput,
    /// Host time not yet consumed by whole frames
    accumulator: f32,
    published: Arc<Snapshot>,
    stopped: bool,
}

impl Game {
    /// Validate the configuration and start a fresh run
    pub fn new(settings: Settings, viewport: Viewport) -> Result<Self, ConfigError> {
        settings.validate()?;
        viewport.validate(settings.bottom_blocker)?;
        log::info!(
            "New game {}x{} (seed {:#x}, contact policy {})",
            viewport.width,
            viewport.height,
            settings.seed,
            settings.contact_policy.as_str()
        );

        let state = GameState::new(settings, viewport);
        let published = Arc::new(Snapshot::capture(&state));
        Ok(Self {
            state,
            input: TickInput::default(),
            accumulator: 0.0,
            published,
            stopped: false,
        })
    }

    /// Set the movement direction used by upcoming frames
    pub fn set_direction(&mut self, direction: Vec2) {
        self.input.direction = direction.clamp(Vec2::splat(-1.0), Vec2::splat(1.0));
    }

    pub fn direction(&self) -> Vec2 {
        self.input.direction
    }

    /// Change the playfield size; the player is pulled back inside
    pub fn resize(&mut self, viewport: Viewport) -> Result<(), ConfigError> {
        viewport.validate(self.state.settings.bottom_blocker)?;
        self.state.viewport = viewport;
        self.state.player.pos = move_player(
            &self.state.player,
            Vec2::ZERO,
            viewport,
            self.state.settings.bottom_blocker,
        );
        log::debug!("Resized to {}x{}", viewport.width, viewport.height);
        self.publish();
        Ok(())
    }

    /// Feed `dt` seconds of host time and run the frames it covers
    ///
    /// At most `max_substeps` frames run per call and leftover time beyond
    /// that is dropped. A frame that produces an event ends the call.
    pub fn advance(&mut self, dt: f32) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.stopped || !self.state.phase.is_running() {
            self.accumulator = 0.0;
            return events;
        }
        if !(dt > 0.0) {
            return events;
        }

        let max_substeps = self.state.settings.max_substeps;
        self.accumulator += dt.min(FRAME_DT * max_substeps as f32);

        let mut substeps = 0;
        while self.accumulator + ACCUMULATOR_EPSILON >= FRAME_DT && substeps < max_substeps {
            self.accumulator = (self.accumulator - FRAME_DT).max(0.0);
            substeps += 1;

            if let Some(event) = tick(&mut self.state, &self.input, FRAME_DT) {
                events.push(event);
                self.accumulator = 0.0;
                break;
            }
        }
        if self.accumulator + ACCUMULATOR_EPSILON >= FRAME_DT {
            self.accumulator = 0.0;
        }

        if substeps > 0 {
            self.publish();
        }
        events
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.published)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> &GamePhase {
        &self.state.phase
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Apply one of the offered upgrades and resume play
    pub fn apply_upgrade(&mut self, kind: UpgradeKind) -> Result<(), GameError> {
        if self.stopped {
            return Err(GameError::Stopped);
        }
        let offered = match &self.state.phase {
            GamePhase::ChoosingUpgrade { choices } => choices.contains(&kind),
            _ => {
                log::warn!("Upgrade {} requested with no pending selection", kind);
                return Err(GameError::NoPendingUpgrade);
            }
        };
        if !offered {
            log::warn!("Upgrade {} was not offered", kind);
            return Err(GameError::UpgradeNotOffered(kind));
        }

        kind.apply(&mut self.state.player);
        log::info!(
            "Chose {} at level {}",
            kind.name(),
            self.state.player.level
        );
        self.state.phase = GamePhase::Running;
        self.accumulator = 0.0;
        self.publish();
        Ok(())
    }

    /// Spend a reroll token on a fresh set of offers
    pub fn reroll(&mut self) -> Result<Vec<UpgradeKind>, GameError> {
        if self.stopped {
            return Err(GameError::Stopped);
        }
        if !matches!(self.state.phase, GamePhase::ChoosingUpgrade { .. }) {
            log::warn!("Reroll requested with no pending selection");
            return Err(GameError::NoPendingUpgrade);
        }
        if self.state.player.modifiers.rerolls == 0 {
            log::warn!("Reroll requested with no tokens left");
            return Err(GameError::NoRerollsLeft);
        }

        self.state.player.modifiers.rerolls -= 1;
        let choices = random_choices(&mut self.state.rng, UPGRADE_CHOICES);
        log::info!(
            "Rerolled offers to {:?} ({} rerolls left)",
            choices,
            self.state.player.modifiers.rerolls
        );
        self.state.phase = GamePhase::ChoosingUpgrade {
            choices: choices.clone(),
        };
        self.publish();
        Ok(choices)
    }

    /// Suspend simulation; only valid while running
    pub fn pause(&mut self) {
        if self.stopped || !self.state.phase.is_running() {
            return;
        }
        self.state.phase = GamePhase::Paused;
        log::info!("Paused at {:.1}s", self.state.time_secs());
        self.publish();
    }

    pub fn resume(&mut self) {
        if self.stopped || self.state.phase != GamePhase::Paused {
            return;
        }
        self.state.phase = GamePhase::Running;
        self.accumulator = 0.0;
        log::info!("Resumed");
        self.publish();
    }

    /// Start a new run in place
    pub fn restart(&mut self) -> Result<(), GameError> {
        if self.stopped {
            return Err(GameError::Stopped);
        }
        self.state.reset();
        self.input = TickInput::default();
        self.accumulator = 0.0;
        log::info!("Restarted");
        self.publish();
        Ok(())
    }

    /// End the loop for good; later calls to `advance` do nothing
    pub fn stop(&mut self) {
        if !self.stopped {
            self.stopped = true;
            log::info!("Stopped after {} frames", self.state.time_ticks);
        }
    }

    /// Drive the game from `source` until it runs dry or the loop is stopped
    ///
    /// `on_frame` sees the game and the events of each `advance` call and
    /// may issue commands. Returns the number of `advance` calls made.
    pub fn run<S, F>(&mut self, source: &mut S, mut on_frame: F) -> u64
    where
        S: TickSource + ?Sized,
        F: FnMut(&mut Game, &[GameEvent]) -> Control,
    {
        let mut calls = 0;
        while !self.stopped {
            let Some(dt) = source.next_dt() else {
                break;
            };
            let events = self.advance(dt);
            calls += 1;
            if on_frame(self, &events) == Control::Stop {
                self.stop();
            }
        }
        calls
    }

    fn publish(&mut self) {
        self.published = Arc::new(Snapshot::capture(&self.state));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::XpOrb;

    fn quiet_game() -> Game {
        let settings = Settings {
            spawn_interval_ms: 1.0e9,
            attack_cooldown_ms: 1.0e9,
            ..Settings::with_seed(7)
        };
        Game::new(settings, Viewport::new(800, 600)).unwrap()
    }

    /// Put the game into upgrade selection by dropping a ready orb on the player
    fn level_up(game: &mut Game) -> Vec<UpgradeKind> {
        game.state.player.xp = game.state.player.xp_to_level as f32 - 1.0;
        let mut orb = XpOrb::new(900, game.state.player.pos);
        orb.spawn_delay = 0;
        game.state.xp_orbs.push(orb);

        let events = game.advance(FRAME_DT);
        match events.as_slice() {
            [GameEvent::LevelUp { choices, .. }] => choices.clone(),
            other => panic!("expected a single level up, got {:?}", other),
        }
    }

    #[test]
    fn test_new_rejects_bad_config() {
        let settings = Settings {
            spawn_interval_ms: 0.0,
            ..Settings::default()
        };
        assert!(matches!(
            Game::new(settings, Viewport::new(800, 600)),
            Err(ConfigError::SpawnInterval(_))
        ));
        assert!(matches!(
            Game::new(Settings::default(), Viewport::new(0, 600)),
            Err(ConfigError::EmptyViewport { .. })
        ));
        assert!(matches!(
            Game::new(Settings::default(), Viewport::new(800, 40)),
            Err(ConfigError::BottomBlocker { .. })
        ));
    }

    #[test]
    fn test_advance_publishes_snapshot() {
        let mut game = quiet_game();
        let before = game.snapshot();
        assert_eq!(before.frame, 0);

        game.advance(FRAME_DT);
        assert_eq!(game.snapshot().frame, 1);
        // Old snapshot is untouched
        assert_eq!(before.frame, 0);
    }

    #[test]
    fn test_partial_frames_accumulate() {
        let mut game = quiet_game();
        game.advance(FRAME_DT / 2.0);
        assert_eq!(game.state().time_ticks, 0);
        game.advance(FRAME_DT / 2.0);
        assert_eq!(game.state().time_ticks, 1);
    }

    #[test]
    fn test_long_stall_is_capped() {
        let mut game = quiet_game();
        game.advance(1.0);
        assert_eq!(game.state().time_ticks, 4);
        // Dropped time is not replayed
        game.advance(FRAME_DT);
        assert_eq!(game.state().time_ticks, 5);
    }

    #[test]
    fn test_pause_and_resume() {
        let mut game = quiet_game();
        game.pause();
        assert_eq!(*game.phase(), GamePhase::Paused);
        assert!(game.advance(1.0).is_empty());
        assert_eq!(game.state().time_ticks, 0);

        game.resume();
        assert!(game.phase().is_running());
        game.advance(FRAME_DT);
        assert_eq!(game.state().time_ticks, 1);
    }

    #[test]
    fn test_set_direction_clamps_and_moves() {
        let mut game = quiet_game();
        game.set_direction(Vec2::new(5.0, 0.0));
        assert_eq!(game.direction(), Vec2::new(1.0, 0.0));

        let start = game.state().player.pos;
        game.advance(FRAME_DT);
        assert_eq!(game.state().player.pos, start + Vec2::new(3.0, 0.0));
    }

    #[test]
    fn test_resize_pulls_player_inside() {
        let mut game = quiet_game();
        game.resize(Viewport::new(200, 200)).unwrap();
        let pos = game.state().player.pos;
        assert!(pos.x <= 200.0 - 6.0);
        assert!(pos.y <= 200.0 - 60.0 - 6.0);
        assert_eq!(game.snapshot().viewport, Viewport::new(200, 200));

        assert!(game.resize(Viewport::new(0, 0)).is_err());
        assert_eq!(game.state().viewport, Viewport::new(200, 200));
    }

    #[test]
    fn test_upgrade_outside_selection_is_rejected() {
        let mut game = quiet_game();
        assert_eq!(
            game.apply_upgrade(UpgradeKind::Armor),
            Err(GameError::NoPendingUpgrade)
        );
        assert_eq!(game.reroll(), Err(GameError::NoPendingUpgrade));
    }

    #[test]
    fn test_level_up_blocks_until_upgrade_applied() {
        let mut game = quiet_game();
        let choices = level_up(&mut game);
        assert_eq!(choices.len(), UPGRADE_CHOICES);

        // Frozen while choosing
        let ticks = game.state().time_ticks;
        assert!(game.advance(1.0).is_empty());
        assert_eq!(game.state().time_ticks, ticks);

        let not_offered = UpgradeKind::ALL
            .iter()
            .copied()
            .find(|kind| !choices.contains(kind))
            .unwrap();
        let player_before = game.state().player.clone();
        assert_eq!(
            game.apply_upgrade(not_offered),
            Err(GameError::UpgradeNotOffered(not_offered))
        );
        assert_eq!(game.state().player, player_before);

        game.apply_upgrade(choices[0]).unwrap();
        assert!(game.phase().is_running());
        game.advance(FRAME_DT);
        assert_eq!(game.state().time_ticks, ticks + 1);
    }

    #[test]
    fn test_reroll_spends_token() {
        let mut game = quiet_game();
        level_up(&mut game);
        assert_eq!(game.reroll(), Err(GameError::NoRerollsLeft));

        game.state.player.modifiers.rerolls = 1;
        let choices = game.reroll().unwrap();
        assert_eq!(choices.len(), UPGRADE_CHOICES);
        assert_eq!(game.state().player.modifiers.rerolls, 0);
        assert_eq!(*game.phase(), GamePhase::ChoosingUpgrade { choices });
    }

    #[test]
    fn test_game_over_and_restart() {
        let mut game = quiet_game();
        game.state.player.health = 20.0;
        let pos = game.state.player.pos;
        game.state.spawn_enemy(pos);

        let events = game.advance(FRAME_DT);
        assert!(matches!(events.as_slice(), [GameEvent::GameOver { .. }]));
        assert_eq!(game.snapshot().phase, GamePhase::GameOver);
        assert!(game.advance(1.0).is_empty());

        game.restart().unwrap();
        assert!(game.phase().is_running());
        assert_eq!(game.state().player.health, 100.0);
        assert_eq!(game.state().player.pos, Viewport::new(800, 600).center());
        assert!(game.state().enemies.is_empty());
        assert_eq!(game.snapshot().frame, 0);
    }

    #[test]
    fn test_stop_is_terminal() {
        let mut game = quiet_game();
        game.stop();
        assert!(game.is_stopped());
        assert!(game.advance(1.0).is_empty());
        assert_eq!(game.state().time_ticks, 0);
        assert_eq!(game.restart(), Err(GameError::Stopped));
        assert_eq!(game.apply_upgrade(UpgradeKind::Heal), Err(GameError::Stopped));
    }

    #[test]
    fn test_run_with_fixed_step() {
        let mut game = quiet_game();
        let calls = game.run(&mut FixedStep::new(FRAME_DT, 10), |_, _| Control::Continue);
        assert_eq!(calls, 10);
        assert_eq!(game.state().time_ticks, 10);
        assert!(!game.is_stopped());
    }

    #[test]
    fn test_run_stops_on_request() {
        let mut game = quiet_game();
        let calls = game.run(&mut FixedStep::endless(FRAME_DT), |game, _| {
            if game.state().time_ticks >= 3 {
                Control::Stop
            } else {
                Control::Continue
            }
        });
        assert_eq!(calls, 3);
        assert!(game.is_stopped());
    }

    #[test]
    fn test_fixed_step_runs_dry() {
        let mut source = FixedStep::new(0.5, 2);
        assert_eq!(source.next_dt(), Some(0.5));
        assert_eq!(source.next_dt(), Some(0.5));
        assert_eq!(source.next_dt(), None);
    }
}
