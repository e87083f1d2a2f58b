//! Error types
//!
//! The simulation itself never fails; errors only come from bad
//! configuration (fatal at startup) or from commands the orchestrator
//! cannot honour in its current phase.

use thiserror::Error;

use crate::sim::UpgradeKind;

/// Invalid or unreadable configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("spawn interval must be positive (got {0} ms)")]
    SpawnInterval(f64),
    #[error("attack cooldown must be positive (got {0} ms)")]
    AttackCooldown(f64),
    #[error("orb lifetime must be positive (got {0} s)")]
    OrbLifetime(f32),
    #[error("max substeps must be at least 1")]
    MaxSubsteps,
    #[error("viewport must be non-empty (got {width}x{height})")]
    EmptyViewport { width: u32, height: u32 },
    #[error("viewport {width} wide cannot fit the player")]
    NarrowViewport { width: u32 },
    #[error("bottom blocker {blocker} leaves no playfield in a viewport {height} high")]
    BottomBlocker { blocker: f32, height: u32 },
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A command the orchestrator rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("no upgrade selection is pending")]
    NoPendingUpgrade,
    #[error("upgrade `{0}` was not offered")]
    UpgradeNotOffered(UpgradeKind),
    #[error("no rerolls left")]
    NoRerollsLeft,
    #[error("game loop has been stopped")]
    Stopped,
}
