//! Game state and core simulation types
//!
//! Entities are plain records kept in flat, insertion-ordered collections.
//! Ids only exist so a homing projectile can remember its last target and a
//! renderer can key animations; nothing owns anything else.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::spawner::Spawner;
use super::upgrades::UpgradeKind;
use crate::consts::*;
use crate::error::ConfigError;
use crate::settings::Settings;

/// Visible play area in pixels, origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Reject viewports the player cannot fit into
    pub fn validate(&self, bottom_blocker: f32) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyViewport {
                width: self.width,
                height: self.height,
            });
        }
        if self.width_f() < 2.0 * PLAYER_SIZE {
            return Err(ConfigError::NarrowViewport { width: self.width });
        }
        if bottom_blocker < 0.0 || self.height as f32 - bottom_blocker < 2.0 * PLAYER_SIZE {
            return Err(ConfigError::BottomBlocker {
                blocker: bottom_blocker,
                height: self.height,
            });
        }
        Ok(())
    }

    #[inline]
    pub fn width_f(&self) -> f32 {
        self.width as f32
    }

    #[inline]
    pub fn height_f(&self) -> f32 {
        self.height as f32
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width_f() / 2.0, self.height_f() / 2.0)
    }

    /// Half-open containment: `0 <= x < width`, `0 <= y < height`
    pub fn contains(&self, pos: Vec2) -> bool {
        pos.x >= 0.0 && pos.x < self.width_f() && pos.y >= 0.0 && pos.y < self.height_f()
    }
}

/// Stat modifiers unlocked through upgrades
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Modifiers {
    /// Fire three projectiles in a spread instead of one
    pub triple_shot: bool,
    /// Add a homing missile to every volley
    pub homing_missile: bool,
    /// Radius of fired projectiles
    pub projectile_size: f32,
    /// Divides the attack cooldown
    pub attack_speed: f32,
    /// Multiplies collected XP
    pub xp_gain: f32,
    /// Multiplies the orb collection radius
    pub pickup_range: f32,
    /// Probability (0-1) a hit deals double damage
    pub crit_chance: f32,
    /// Fraction of max health regenerated per second
    pub regen: f32,
    /// Flat reduction of contact damage
    pub armor: f32,
    /// Level-up offers that may be redrawn
    pub rerolls: u32,
}

impl Default for Modifiers {
    fn default() -> Self {
        Self {
            triple_shot: false,
            homing_missile: false,
            projectile_size: PROJECTILE_SIZE,
            attack_speed: 1.0,
            xp_gain: 1.0,
            pickup_range: 1.0,
            crit_chance: 0.0,
            regen: 0.0,
            armor: 0.0,
            rerolls: 0,
        }
    }
}

/// The player's avatar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    /// Collision radius
    pub size: f32,
    /// Pixels per frame at full input
    pub speed: f32,
    pub health: f32,
    pub max_health: f32,
    /// XP toward the next level (fractional with XP gain bonuses)
    pub xp: f32,
    pub level: u32,
    pub xp_to_level: u32,
    pub modifiers: Modifiers,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            size: PLAYER_SIZE,
            speed: PLAYER_SPEED,
            health: PLAYER_MAX_HEALTH,
            max_health: PLAYER_MAX_HEALTH,
            xp: 0.0,
            level: 1,
            xp_to_level: PLAYER_START_XP_TO_LEVEL,
            modifiers: Modifiers::default(),
        }
    }

    /// Subtract health, never going below zero
    pub fn take_damage(&mut self, amount: f32) {
        self.health = (self.health - amount).max(0.0);
    }

    /// Add health, never exceeding max health
    pub fn heal(&mut self, amount: f32) {
        self.health = (self.health + amount).min(self.max_health);
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    /// Contact damage after armor; armor never makes the player immune
    pub fn contact_damage(&self) -> f32 {
        (CONTACT_DAMAGE - self.modifiers.armor).max(1.0)
    }

    /// Attack cooldown in milliseconds after attack speed
    pub fn attack_cooldown_ms(&self, base_ms: f64) -> f64 {
        base_ms / self.modifiers.attack_speed.max(f32::EPSILON) as f64
    }
}

/// A homing enemy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    pub size: f32,
    pub speed: f32,
    pub health: i32,
    pub max_health: i32,
    /// Walk-cycle counter for renderers (not gameplay-affecting)
    #[serde(default)]
    pub anim_frame: u32,
}

impl Enemy {
    pub fn new(id: u32, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            size: ENEMY_SIZE,
            speed: ENEMY_SPEED,
            health: ENEMY_HEALTH,
            max_health: ENEMY_HEALTH,
            anim_frame: 0,
        }
    }
}

/// A fired projectile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    /// Steers toward enemies instead of flying straight
    #[serde(default)]
    pub homing: bool,
    /// Frames spent homing; below `HOMING_ORBIT_FRAMES` the missile spirals
    #[serde(default)]
    pub orbit_phase: u32,
    /// Id of the enemy last steered toward
    #[serde(default)]
    pub target: Option<u32>,
}

impl Projectile {
    pub fn new(id: u32, pos: Vec2, vel: Vec2, size: f32) -> Self {
        Self {
            id,
            pos,
            vel,
            size,
            homing: false,
            orbit_phase: 0,
            target: None,
        }
    }

    pub fn homing(id: u32, pos: Vec2, vel: Vec2, size: f32) -> Self {
        Self {
            homing: true,
            ..Self::new(id, pos, vel, size)
        }
    }
}

/// Experience dropped by a dead enemy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XpOrb {
    pub id: u32,
    pub pos: Vec2,
    pub size: f32,
    pub value: u32,
    /// Frames left before the orb can be collected
    pub spawn_delay: u32,
    /// Seconds on the field
    #[serde(default)]
    pub age_secs: f32,
}

impl XpOrb {
    pub fn new(id: u32, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            size: ORB_SIZE,
            value: ORB_VALUE,
            spawn_delay: ORB_SPAWN_DELAY,
            age_secs: 0.0,
        }
    }

    pub fn is_collectible(&self) -> bool {
        self.spawn_delay == 0
    }
}

/// Current phase of gameplay
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Running,
    /// Paused by the host (menu, lost focus)
    Paused,
    /// Waiting for the player to pick one of the offered upgrades
    ChoosingUpgrade { choices: Vec<UpgradeKind> },
    /// Run ended
    GameOver,
}

impl GamePhase {
    pub fn is_running(&self) -> bool {
        matches!(self, GamePhase::Running)
    }
}

/// Edge-triggered events reported to the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// The player gained at least one level; simulation blocks until an upgrade is applied
    LevelUp { level: u32, choices: Vec<UpgradeKind> },
    /// The player died; simulation blocks until restart
    GameOver { level: u32, time_secs: f32 },
}

/// Complete simulation state, owned by the orchestrator
#[derive(Debug, Clone)]
pub struct GameState {
    /// Settings the run was created with
    pub settings: Settings,
    pub viewport: Viewport,
    /// Current phase
    pub phase: GamePhase,
    pub player: Player,
    /// Active enemies (insertion order)
    pub enemies: Vec<Enemy>,
    /// Active projectiles (insertion order)
    pub projectiles: Vec<Projectile>,
    /// Orbs on the field (insertion order)
    pub xp_orbs: Vec<XpOrb>,
    /// Simulated frames
    pub time_ticks: u64,
    /// Simulated milliseconds (only advances while running)
    pub time_ms: f64,
    /// Simulation time of the last volley
    pub last_shot_ms: f64,
    pub spawner: Spawner,
    /// Seeded RNG for spawns, offers and crits
    pub rng: Pcg32,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a fresh run with the player at the viewport center
    pub fn new(settings: Settings, viewport: Viewport) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(settings.seed),
            spawner: Spawner::new(settings.spawn_interval_ms),
            phase: GamePhase::Running,
            player: Player::new(viewport.center()),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            xp_orbs: Vec::new(),
            time_ticks: 0,
            time_ms: 0.0,
            last_shot_ms: 0.0,
            next_id: 1,
            viewport,
            settings,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Start over: new player, empty field, fresh timers. The RNG stream continues.
    pub fn reset(&mut self) {
        self.player = Player::new(self.viewport.center());
        self.enemies.clear();
        self.projectiles.clear();
        self.xp_orbs.clear();
        self.time_ticks = 0;
        self.time_ms = 0.0;
        self.last_shot_ms = 0.0;
        self.spawner.reset();
        self.phase = GamePhase::Running;
    }

    /// Add an enemy at `pos`, returning its id
    pub fn spawn_enemy(&mut self, pos: Vec2) -> u32 {
        let id = self.next_entity_id();
        self.enemies.push(Enemy::new(id, pos));
        id
    }

    /// Drop an orb at `pos`, returning its id
    pub fn drop_orb(&mut self, pos: Vec2) -> u32 {
        let id = self.next_entity_id();
        self.xp_orbs.push(XpOrb::new(id, pos));
        id
    }

    pub fn time_secs(&self) -> f32 {
        (self.time_ms / 1000.0) as f32
    }
}
