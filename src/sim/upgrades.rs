//! Level-up upgrade pool
//!
//! A closed set of upgrade kinds, each a total mutation of the player. Offers
//! are drawn without replacement; the same kind can come back at a later
//! level and stacks with itself.

use std::fmt;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::state::Player;

/// Upgrade kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UpgradeKind {
    MaxHealth,
    MoveSpeed,
    ProjectileSize,
    Heal,
    AttackSpeed,
    Area,
    XpGain,
    Magnet,
    CritChance,
    Regen,
    Armor,
    Reroll,
    TripleShot,
    HomingMissile,
}

impl UpgradeKind {
    /// The full pool, in display order
    pub const ALL: [UpgradeKind; 14] = [
        UpgradeKind::MaxHealth,
        UpgradeKind::MoveSpeed,
        UpgradeKind::ProjectileSize,
        UpgradeKind::Heal,
        UpgradeKind::AttackSpeed,
        UpgradeKind::Area,
        UpgradeKind::XpGain,
        UpgradeKind::Magnet,
        UpgradeKind::CritChance,
        UpgradeKind::Regen,
        UpgradeKind::Armor,
        UpgradeKind::Reroll,
        UpgradeKind::TripleShot,
        UpgradeKind::HomingMissile,
    ];

    /// Stable identifier used by hosts
    pub fn id(&self) -> &'static str {
        match self {
            UpgradeKind::MaxHealth => "max-health",
            UpgradeKind::MoveSpeed => "move-speed",
            UpgradeKind::ProjectileSize => "projectile-size",
            UpgradeKind::Heal => "heal",
            UpgradeKind::AttackSpeed => "attack-speed",
            UpgradeKind::Area => "area",
            UpgradeKind::XpGain => "xp-gain",
            UpgradeKind::Magnet => "magnet",
            UpgradeKind::CritChance => "crit-chance",
            UpgradeKind::Regen => "regen",
            UpgradeKind::Armor => "armor",
            UpgradeKind::Reroll => "reroll",
            UpgradeKind::TripleShot => "triple-shot",
            UpgradeKind::HomingMissile => "homing-missile",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.id() == id)
    }

    pub fn name(&self) -> &'static str {
        match self {
            UpgradeKind::MaxHealth => "Max Health +20",
            UpgradeKind::MoveSpeed => "Move Speed +20%",
            UpgradeKind::ProjectileSize => "Projectile Size +30%",
            UpgradeKind::Heal => "Heal 50%",
            UpgradeKind::AttackSpeed => "Attack Speed +20%",
            UpgradeKind::Area => "Area +25%",
            UpgradeKind::XpGain => "XP Gain +20%",
            UpgradeKind::Magnet => "Pickup Range +50%",
            UpgradeKind::CritChance => "Critical Chance +10%",
            UpgradeKind::Regen => "Regenerate 1% HP/sec",
            UpgradeKind::Armor => "Armor +1",
            UpgradeKind::Reroll => "Reroll",
            UpgradeKind::TripleShot => "Triple Shot",
            UpgradeKind::HomingMissile => "Homing Missile",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            UpgradeKind::MaxHealth => "Increase your max health by 20 and heal to full.",
            UpgradeKind::MoveSpeed => "Increase your movement speed by 20%.",
            UpgradeKind::ProjectileSize => "Increase your projectile size by 30%.",
            UpgradeKind::Heal => "Restore 50% of your max health.",
            UpgradeKind::AttackSpeed => "Increase your attack speed by 20%.",
            UpgradeKind::Area => "Increase the size of all your projectiles by 25%.",
            UpgradeKind::XpGain => "Gain 20% more XP from orbs.",
            UpgradeKind::Magnet => "Increase the range at which you collect XP orbs by 50%.",
            UpgradeKind::CritChance => "Gain a 10% chance to deal double damage.",
            UpgradeKind::Regen => "Regenerate 1% of your max health every second.",
            UpgradeKind::Armor => "Reduce all damage taken by 1.",
            UpgradeKind::Reroll => "Reroll your next level-up choices.",
            UpgradeKind::TripleShot => "Fire three projectiles in a 30 degree spread.",
            UpgradeKind::HomingMissile => "Every volley adds a missile that spirals in on the nearest enemy.",
        }
    }

    /// Apply this upgrade to the player
    pub fn apply(&self, player: &mut Player) {
        match self {
            UpgradeKind::MaxHealth => {
                player.max_health += 20.0;
                player.health = player.max_health;
            }
            UpgradeKind::MoveSpeed => player.speed *= 1.2,
            UpgradeKind::ProjectileSize => player.modifiers.projectile_size *= 1.3,
            UpgradeKind::Heal => {
                let amount = player.max_health * 0.5;
                player.heal(amount);
            }
            UpgradeKind::AttackSpeed => player.modifiers.attack_speed *= 1.2,
            UpgradeKind::Area => player.modifiers.projectile_size *= 1.25,
            UpgradeKind::XpGain => player.modifiers.xp_gain *= 1.2,
            UpgradeKind::Magnet => player.modifiers.pickup_range *= 1.5,
            UpgradeKind::CritChance => player.modifiers.crit_chance = (player.modifiers.crit_chance + 0.1).min(1.0),
            UpgradeKind::Regen => player.modifiers.regen += 0.01,
            UpgradeKind::Armor => player.modifiers.armor += 1.0,
            UpgradeKind::Reroll => player.modifiers.rerolls += 1,
            UpgradeKind::TripleShot => player.modifiers.triple_shot = true,
            UpgradeKind::HomingMissile => player.modifiers.homing_missile = true,
        }
    }
}

impl fmt::Display for UpgradeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Draw `count` distinct upgrades from the pool
pub fn random_choices<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<UpgradeKind> {
    let mut pool = UpgradeKind::ALL.to_vec();
    pool.shuffle(rng);
    pool.truncate(count);
    pool
}
