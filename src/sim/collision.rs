//! Collision detection and combat resolution
//!
//! Everything is circle-vs-circle. Each pass first decides every hit against
//! the positions at the start of the pass and only then applies damage and
//! removals, so results never depend on mutations made earlier in the same
//! pass. Ties are broken by collection order.

use glam::Vec2;
use rand::Rng;

use super::state::{Enemy, Player, Projectile};
use crate::settings::ContactPolicy;

/// Strict overlap test between two circles
#[inline]
pub fn circles_overlap(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> bool {
    a.distance(b) < a_radius + b_radius
}

/// Result of the player-enemy pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactResult {
    /// Ids of enemies overlapping the player this frame, in collection order
    pub touching: Vec<u32>,
    /// Damage actually taken (zero or one hit's worth)
    pub damage: f32,
    /// Health reached zero
    pub player_dead: bool,
}

/// Damage the player at most once for any number of touching enemies
///
/// Only detects and damages; the enemy set is left alone so the projectile
/// pass of the same frame still sees every enemy. Removal happens in
/// [`apply_contact_policy`].
pub fn resolve_player_contacts(player: &mut Player, enemies: &[Enemy]) -> ContactResult {
    let touching: Vec<u32> = enemies
        .iter()
        .filter(|e| circles_overlap(player.pos, player.size, e.pos, e.size))
        .map(|e| e.id)
        .collect();

    if touching.is_empty() {
        return ContactResult::default();
    }

    let before = player.health;
    player.take_damage(player.contact_damage());
    ContactResult {
        touching,
        damage: before - player.health,
        player_dead: player.is_dead(),
    }
}

/// Remove the enemies that touched the player under [`ContactPolicy::Consume`]
///
/// Returns how many were removed. Enemies already gone (killed by
/// projectiles in the same frame) are simply skipped.
pub fn apply_contact_policy(enemies: &mut Vec<Enemy>, contact: &ContactResult, policy: ContactPolicy) -> usize {
    if policy != ContactPolicy::Consume || contact.touching.is_empty() {
        return 0;
    }
    let before = enemies.len();
    enemies.retain(|e| !contact.touching.contains(&e.id));
    before - enemies.len()
}

/// An enemy killed by projectiles this frame
#[derive(Debug, Clone, PartialEq)]
pub struct Kill {
    pub enemy_id: u32,
    /// Where the enemy died (orb drop point)
    pub pos: Vec2,
}

/// Result of the projectile-enemy pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CombatResult {
    /// Projectiles that registered a hit (all removed)
    pub hits: usize,
    /// Hits that rolled a critical
    pub crits: usize,
    pub kills: Vec<Kill>,
}

/// Resolve projectile hits against the enemies present at the start of the pass
///
/// Each projectile hits at most one enemy (the first overlapping one) and is
/// removed. Enemies accumulate damage from every projectile that hit them:
/// 1 per hit, 2 on a critical. Enemies at or below zero health are removed.
pub fn resolve_projectile_hits<R: Rng + ?Sized>(
    projectiles: &mut Vec<Projectile>,
    enemies: &mut Vec<Enemy>,
    crit_chance: f32,
    rng: &mut R,
) -> CombatResult {
    let mut result = CombatResult::default();
    let mut damage = vec![0i32; enemies.len()];
    let mut spent = vec![false; projectiles.len()];

    for (pi, projectile) in projectiles.iter().enumerate() {
        let Some(ei) = enemies
            .iter()
            .position(|e| circles_overlap(projectile.pos, projectile.size, e.pos, e.size))
        else {
            continue;
        };

        // Only roll when crits are possible so the RNG stream is untouched otherwise
        let crit = crit_chance > 0.0 && rng.random::<f32>() < crit_chance;
        damage[ei] += if crit { 2 } else { 1 };
        spent[pi] = true;
        result.hits += 1;
        if crit {
            result.crits += 1;
        }
    }

    if result.hits == 0 {
        return result;
    }

    for (enemy, dmg) in enemies.iter_mut().zip(&damage) {
        if *dmg > 0 {
            enemy.health -= dmg;
            if enemy.health <= 0 {
                result.kills.push(Kill {
                    enemy_id: enemy.id,
                    pos: enemy.pos,
                });
            }
        }
    }
    enemies.retain(|e| e.health > 0);

    let mut spent = spent.into_iter();
    projectiles.retain(|_| !spent.next().unwrap_or(false));

    result
}
