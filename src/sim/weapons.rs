//! Auto-fire at the nearest enemy

use glam::Vec2;

use super::movement::nearest_enemy;
use super::state::{GameState, Modifiers, Projectile};
use crate::consts::*;
use crate::{direction_to, velocity_from_angle};

/// A projectile to launch: velocity and whether it homes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    pub vel: Vec2,
    pub homing: bool,
}

/// Shots for one volley from `origin` at `target`
///
/// Empty when the target coincides with the origin.
pub fn volley(origin: Vec2, target: Vec2, modifiers: &Modifiers) -> Vec<Shot> {
    let Some(dir) = direction_to(origin, target, 0.0) else {
        return Vec::new();
    };

    let mut shots = Vec::with_capacity(4);
    if modifiers.triple_shot {
        let angle = dir.y.atan2(dir.x);
        for i in -1..=1 {
            let a = angle + i as f32 * TRIPLE_SHOT_SPREAD;
            shots.push(Shot {
                vel: velocity_from_angle(a, PROJECTILE_SPEED),
                homing: false,
            });
        }
    } else {
        shots.push(Shot {
            vel: dir * PROJECTILE_SPEED,
            homing: false,
        });
    }

    if modifiers.homing_missile {
        shots.push(Shot {
            vel: dir * HOMING_ORBIT_SPEED,
            homing: true,
        });
    }
    shots
}

/// Fire a volley if the attack cooldown has elapsed and there is something to shoot
///
/// Returns the number of projectiles launched. The cooldown only restarts
/// when a volley actually leaves.
pub fn try_fire(state: &mut GameState) -> usize {
    let cooldown = state.player.attack_cooldown_ms(state.settings.attack_cooldown_ms);
    if state.time_ms - state.last_shot_ms < cooldown {
        return 0;
    }
    let origin = state.player.pos;
    let Some(target) = nearest_enemy(origin, &state.enemies).map(|e| e.pos) else {
        return 0;
    };

    let shots = volley(origin, target, &state.player.modifiers);
    if shots.is_empty() {
        return 0;
    }

    let size = state.player.modifiers.projectile_size;
    for shot in &shots {
        let id = state.next_entity_id();
        let projectile = if shot.homing {
            Projectile::homing(id, origin, shot.vel, size)
        } else {
            Projectile::new(id, origin, shot.vel, size)
        };
        state.projectiles.push(projectile);
    }
    state.last_shot_ms = state.time_ms;
    log::debug!("Volley of {} at t={:.0}ms", shots.len(), state.time_ms);
    shots.len()
}
