//! Per-frame movement for the player, enemies and projectiles

use glam::Vec2;

use super::state::{Enemy, Player, Projectile, Viewport};
use crate::consts::*;
use crate::direction_to;

/// Enemies closer than this to the player stop instead of jittering
const ENEMY_ARRIVE_DIST: f32 = 1.0;

/// Next player position for an input direction, kept fully inside the playfield
///
/// Direction components are clamped to [-1, 1]. The playfield is the viewport
/// minus `bottom_blocker` pixels reserved for the HUD.
pub fn move_player(player: &Player, direction: Vec2, viewport: Viewport, bottom_blocker: f32) -> Vec2 {
    let direction = direction.clamp(Vec2::splat(-1.0), Vec2::splat(1.0));
    let next = player.pos + direction * player.speed;

    // min-then-max so a too-small viewport pins to the low edge instead of panicking
    let x = next.x.min(viewport.width_f() - player.size).max(player.size);
    let y = next
        .y
        .min(viewport.height_f() - bottom_blocker - player.size)
        .max(player.size);
    Vec2::new(x, y)
}

/// Step every enemy toward `target` at its own speed
pub fn move_enemies(enemies: &mut [Enemy], target: Vec2) {
    for enemy in enemies.iter_mut() {
        enemy.anim_frame = enemy.anim_frame.wrapping_add(1);
        if let Some(dir) = direction_to(enemy.pos, target, ENEMY_ARRIVE_DIST) {
            enemy.pos += dir * enemy.speed;
        }
    }
}

/// Advance projectiles one frame and drop the ones that left the viewport
///
/// Homing projectiles re-aim at the nearest enemy first; with no enemies
/// they keep their last velocity.
pub fn move_projectiles(projectiles: &mut Vec<Projectile>, enemies: &[Enemy], viewport: Viewport) {
    for projectile in projectiles.iter_mut() {
        if projectile.homing {
            steer_homing(projectile, enemies);
        }
        projectile.pos += projectile.vel;
    }
    projectiles.retain(|p| viewport.contains(p.pos));
}

/// Nearest enemy by Euclidean distance; ties go to the earlier enemy
pub fn nearest_enemy(pos: Vec2, enemies: &[Enemy]) -> Option<&Enemy> {
    let mut best: Option<(&Enemy, f32)> = None;
    for enemy in enemies {
        let dist_sq = pos.distance_squared(enemy.pos);
        match best {
            Some((_, best_sq)) if dist_sq >= best_sq => {}
            _ => best = Some((enemy, dist_sq)),
        }
    }
    best.map(|(enemy, _)| enemy)
}

/// Point on the shrinking spiral around `center` for a given orbit phase
///
/// Two full turns over the orbit window, with a sinusoidal wobble so the
/// path is not a clean circle.
pub fn spiral_point(center: Vec2, orbit_phase: u32) -> Vec2 {
    let phase = orbit_phase as f32;
    let progress = phase / HOMING_ORBIT_FRAMES as f32;
    let base_angle = progress * std::f32::consts::TAU * 2.0;
    let noise = (phase * 0.7).sin() * 0.7 + (phase * 1.3).cos() * 0.4;
    let angle = base_angle + noise;
    let radius = HOMING_ORBIT_RADIUS * (1.0 - progress) + HOMING_ORBIT_MIN_RADIUS;
    center + Vec2::new(angle.cos(), angle.sin()) * radius
}

/// Re-aim a homing projectile: spiral around the nearest enemy, then pursue it
fn steer_homing(projectile: &mut Projectile, enemies: &[Enemy]) {
    let Some(target) = nearest_enemy(projectile.pos, enemies) else {
        return;
    };

    let (aim, speed) = if projectile.orbit_phase < HOMING_ORBIT_FRAMES {
        (spiral_point(target.pos, projectile.orbit_phase), HOMING_ORBIT_SPEED)
    } else {
        (target.pos, HOMING_PURSUIT_SPEED)
    };

    // Sitting exactly on the aim point: no redirect this frame
    if let Some(dir) = direction_to(projectile.pos, aim, 0.0) {
        projectile.vel = dir * speed;
        projectile.orbit_phase += 1;
        projectile.target = Some(target.id);
    }
}
