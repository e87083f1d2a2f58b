//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed frame step only
//! - Seeded RNG only
//! - Stable iteration order (insertion order, first entity wins ties)
//! - No rendering or platform dependencies

pub mod collision;
pub mod movement;
pub mod progression;
pub mod snapshot;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod upgrades;
pub mod weapons;

pub use collision::{CombatResult, ContactResult, Kill, apply_contact_policy, circles_overlap};
pub use movement::{move_enemies, move_player, move_projectiles, nearest_enemy};
pub use progression::{OrbUpdate, award_xp, next_xp_threshold};
pub use snapshot::{Snapshot, SnapshotSummary};
pub use spawner::{Edge, Spawner, border_spawn_point};
pub use state::{
    Enemy, GameEvent, GamePhase, GameState, Modifiers, Player, Projectile, Viewport, XpOrb,
};
pub use tick::{TickInput, tick};
pub use upgrades::{UpgradeKind, random_choices};
pub use weapons::{Shot, volley};
