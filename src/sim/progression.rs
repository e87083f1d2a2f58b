//! XP collection and leveling

use super::collision::circles_overlap;
use super::state::{Player, XpOrb};
use crate::consts::LEVEL_UP_MAX_HEALTH_BONUS;

/// Outcome of one frame of orb handling
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OrbUpdate {
    /// Raw XP value of the orbs collected this frame
    pub collected_xp: u32,
    pub collected: usize,
    pub expired: usize,
}

/// Tick every orb: age it, count down its spawn delay, collect it if in range
///
/// Orbs still in their spawn delay are never collected, even under the
/// player. Orbs older than `lifetime_secs` disappear.
pub fn update_orbs(orbs: &mut Vec<XpOrb>, player: &Player, dt: f32, lifetime_secs: f32) -> OrbUpdate {
    let mut update = OrbUpdate::default();
    let range_scale = player.modifiers.pickup_range;

    orbs.retain_mut(|orb| {
        orb.age_secs += dt;
        if orb.age_secs >= lifetime_secs {
            update.expired += 1;
            return false;
        }

        if orb.spawn_delay > 0 {
            orb.spawn_delay -= 1;
            return true;
        }

        let in_range = circles_overlap(player.pos, player.size * range_scale, orb.pos, orb.size * range_scale);
        if in_range {
            update.collected_xp += orb.value;
            update.collected += 1;
            false
        } else {
            true
        }
    });

    update
}

/// Threshold for the level after one with threshold `current`: floor(current * 1.2) + 5
pub fn next_xp_threshold(current: u32) -> u32 {
    // Integer form of floor(current * 1.2) avoids float rounding at exact multiples
    current * 6 / 5 + 5
}

/// Add XP (scaled by the player's XP gain) and resolve every level it buys
///
/// Each level gained raises max health and heals fully. Returns the number
/// of levels gained.
pub fn award_xp(player: &mut Player, raw_xp: u32) -> u32 {
    if raw_xp == 0 {
        return 0;
    }
    player.xp += raw_xp as f32 * player.modifiers.xp_gain;

    let mut gained = 0;
    while player.xp >= player.xp_to_level as f32 {
        player.xp -= player.xp_to_level as f32;
        player.level += 1;
        player.xp_to_level = next_xp_threshold(player.xp_to_level);
        player.max_health += LEVEL_UP_MAX_HEALTH_BONUS;
        player.health = player.max_health;
        gained += 1;
    }
    gained
}

/// Regenerate the player's `regen` fraction of max health per second
pub fn regenerate(player: &mut Player, dt: f32) {
    if player.modifiers.regen > 0.0 && !player.is_dead() {
        let amount = player.max_health * player.modifiers.regen * dt;
        player.heal(amount);
    }
}
