//! Read-only view of the world handed to the presentation layer.
//!
//! Built from the authoritative state after a completed frame, never during
//! one, so a renderer cannot observe a half-updated world.

use serde::{Deserialize, Serialize};

use super::state::{Enemy, GamePhase, GameState, Player, Projectile, Viewport, XpOrb};

/// Immutable copy of everything a renderer draws
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Frames simulated so far
    pub frame: u64,
    pub time_secs: f32,
    pub viewport: Viewport,
    pub phase: GamePhase,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub xp_orbs: Vec<XpOrb>,
}

impl Snapshot {
    /// Copy the current state
    pub fn capture(state: &GameState) -> Self {
        Self {
            frame: state.time_ticks,
            time_secs: state.time_secs(),
            viewport: state.viewport,
            phase: state.phase.clone(),
            player: state.player.clone(),
            enemies: state.enemies.clone(),
            projectiles: state.projectiles.clone(),
            xp_orbs: state.xp_orbs.clone(),
        }
    }

    /// Compact HUD-style summary
    pub fn summary(&self) -> SnapshotSummary {
        SnapshotSummary {
            frame: self.frame,
            time_secs: self.time_secs,
            level: self.player.level,
            xp: self.player.xp,
            xp_to_level: self.player.xp_to_level,
            health: self.player.health,
            max_health: self.player.max_health,
            enemies: self.enemies.len(),
            projectiles: self.projectiles.len(),
            xp_orbs: self.xp_orbs.len(),
        }
    }
}

/// Counts and player stats, cheap to log or print
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotSummary {
    pub frame: u64,
    pub time_secs: f32,
    pub level: u32,
    pub xp: f32,
    pub xp_to_level: u32,
    pub health: f32,
    pub max_health: f32,
    pub enemies: usize,
    pub projectiles: usize,
    pub xp_orbs: usize,
}
