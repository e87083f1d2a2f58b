//! Swarm Survivor - simulation core for a wave-survival arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, combat, progression)
//! - `game`: Frame orchestrator driven by an abstract tick source
//! - `settings`: Runtime configuration
//! - `error`: Configuration and command errors

pub mod error;
pub mod game;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, GameError};
pub use game::{Control, FixedStep, Game, TickSource, WallClock};
pub use settings::{ContactPolicy, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation frame (60 Hz, matches the host redraw clock)
    pub const FRAME_DT: f32 = 1.0 / 60.0;
    /// Maximum frames simulated per `advance` call to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = 6.0;
    pub const PLAYER_SPEED: f32 = 3.0;
    pub const PLAYER_MAX_HEALTH: f32 = 100.0;
    pub const PLAYER_START_XP_TO_LEVEL: u32 = 10;

    /// Enemy defaults
    pub const ENEMY_SIZE: f32 = 18.0;
    pub const ENEMY_SPEED: f32 = 0.7;
    pub const ENEMY_HEALTH: i32 = 1;
    /// Enemies appear this far outside the visible area
    pub const SPAWN_OFFSET: f32 = 18.0;
    /// Production spawn interval
    pub const ENEMY_SPAWN_INTERVAL_MS: f64 = 50.0;

    /// Projectile defaults
    pub const PROJECTILE_SIZE: f32 = 12.0;
    pub const PROJECTILE_SPEED: f32 = 7.0;
    /// Base time between volleys (divided by attack speed)
    pub const ATTACK_COOLDOWN_MS: f64 = 1000.0;
    /// Triple shot spread (15 degrees)
    pub const TRIPLE_SHOT_SPREAD: f32 = 15.0 * std::f32::consts::PI / 180.0;

    /// Homing missile behaviour
    pub const HOMING_ORBIT_FRAMES: u32 = 30;
    pub const HOMING_ORBIT_RADIUS: f32 = 40.0;
    pub const HOMING_ORBIT_MIN_RADIUS: f32 = 10.0;
    pub const HOMING_ORBIT_SPEED: f32 = 8.0;
    pub const HOMING_PURSUIT_SPEED: f32 = 10.0;

    /// Damage dealt to the player per frame of contact (before armor)
    pub const CONTACT_DAMAGE: f32 = 20.0;

    /// XP orb defaults
    pub const ORB_SIZE: f32 = 10.0;
    pub const ORB_VALUE: u32 = 1;
    /// Frames before a dropped orb can be collected (~0.5 s)
    pub const ORB_SPAWN_DELAY: u32 = 30;
    pub const ORB_LIFETIME_SECS: f32 = 30.0;

    /// Leveling rewards
    pub const LEVEL_UP_MAX_HEALTH_BONUS: f32 = 10.0;
    pub const UPGRADE_CHOICES: usize = 3;

    /// Screen space reserved for the HUD at the bottom
    pub const BOTTOM_BLOCKER: f32 = 60.0;
}

/// Unit vector from `from` toward `to`, or `None` when the points are closer than `min_dist`
#[inline]
pub fn direction_to(from: Vec2, to: Vec2, min_dist: f32) -> Option<Vec2> {
    let delta = to - from;
    let dist = delta.length();
    if dist < min_dist || dist <= 0.0 {
        None
    } else {
        Some(delta / dist)
    }
}

/// Convert an angle and speed to a velocity vector
#[inline]
pub fn velocity_from_angle(angle: f32, speed: f32) -> Vec2 {
    Vec2::new(angle.cos() * speed, angle.sin() * speed)
}
