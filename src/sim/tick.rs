//! Fixed-frame simulation tick
//!
//! One call advances the whole world by one frame in a fixed order:
//! spawn, move, fire, player contacts, projectile hits, orbs and leveling.

use glam::Vec2;

use super::collision::{apply_contact_policy, resolve_player_contacts, resolve_projectile_hits};
use super::movement::{move_enemies, move_player, move_projectiles};
use super::progression::{award_xp, regenerate, update_orbs};
use super::spawner::border_spawn_point;
use super::state::{GameEvent, GamePhase, GameState};
use super::upgrades::random_choices;
use super::weapons::try_fire;
use crate::consts::UPGRADE_CHOICES;

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// Movement direction, each component in [-1, 1]
    pub direction: Vec2,
}

/// Advance the game state by one frame of `dt` seconds
///
/// Does nothing unless the phase is `Running`. Returns the event that ended
/// the frame, if any; either event leaves the state out of `Running`.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> Option<GameEvent> {
    if !state.phase.is_running() {
        return None;
    }

    state.time_ticks += 1;
    state.time_ms += dt as f64 * 1000.0;

    // Spawning
    if state.spawner.update(state.time_ms) {
        let (edge, pos) = border_spawn_point(&mut state.rng, state.viewport);
        let id = state.spawn_enemy(pos);
        log::debug!("Spawned enemy {} from {:?} at ({:.0}, {:.0})", id, edge, pos.x, pos.y);
    }

    // Movement
    state.player.pos = move_player(
        &state.player,
        input.direction,
        state.viewport,
        state.settings.bottom_blocker,
    );
    move_enemies(&mut state.enemies, state.player.pos);
    move_projectiles(&mut state.projectiles, &state.enemies, state.viewport);

    try_fire(state);

    // Player vs enemies; death ends the frame here
    let contact = resolve_player_contacts(&mut state.player, &state.enemies);
    let policy = state.settings.contact_policy;
    if contact.player_dead {
        apply_contact_policy(&mut state.enemies, &contact, policy);
        state.phase = GamePhase::GameOver;
        log::info!(
            "Game over at level {} after {:.1}s",
            state.player.level,
            state.time_secs()
        );
        return Some(GameEvent::GameOver {
            level: state.player.level,
            time_secs: state.time_secs(),
        });
    }

    // Projectiles vs every enemy present at the start of the frame,
    // including the ones that just touched the player
    let crit_chance = state.player.modifiers.crit_chance;
    let combat = resolve_projectile_hits(
        &mut state.projectiles,
        &mut state.enemies,
        crit_chance,
        &mut state.rng,
    );
    for kill in &combat.kills {
        state.drop_orb(kill.pos);
        log::debug!("Enemy {} killed", kill.enemy_id);
    }
    apply_contact_policy(&mut state.enemies, &contact, policy);

    // Progression
    regenerate(&mut state.player, dt);
    let orbs = update_orbs(
        &mut state.xp_orbs,
        &state.player,
        dt,
        state.settings.orb_lifetime_secs,
    );
    let levels = award_xp(&mut state.player, orbs.collected_xp);
    if levels > 0 {
        let choices = random_choices(&mut state.rng, UPGRADE_CHOICES);
        log::info!(
            "Level up to {} ({} gained), offering {:?}",
            state.player.level,
            levels,
            choices
        );
        state.phase = GamePhase::ChoosingUpgrade {
            choices: choices.clone(),
        };
        return Some(GameEvent::LevelUp {
            level: state.player.level,
            choices,
        });
    }

    None
}
