//! Property tests for the simulation invariants

use glam::Vec2;
use proptest::prelude::*;

use swarm_survivor::ContactPolicy;
use swarm_survivor::consts::*;
use swarm_survivor::sim::collision::{apply_contact_policy, resolve_player_contacts};
use swarm_survivor::sim::progression::{award_xp, update_orbs};
use swarm_survivor::sim::{Enemy, Player, Viewport, XpOrb, move_enemies, move_player};

fn viewport() -> impl Strategy<Value = Viewport> {
    (100u32..2000, 200u32..2000).prop_map(|(w, h)| Viewport::new(w, h))
}

fn direction() -> impl Strategy<Value = Vec2> {
    (-5.0f32..5.0, -5.0f32..5.0).prop_map(|(x, y)| Vec2::new(x, y))
}

proptest! {
    #[test]
    fn player_stays_in_playfield(
        viewport in viewport(),
        fx in 0.0f32..1.0,
        fy in 0.0f32..1.0,
        dir in direction(),
        steps in 1usize..50,
    ) {
        let mut player = Player::new(Vec2::new(fx * viewport.width_f(), fy * viewport.height_f()));
        for _ in 0..steps {
            player.pos = move_player(&player, dir, viewport, BOTTOM_BLOCKER);
            prop_assert!(player.pos.x >= player.size);
            prop_assert!(player.pos.x <= viewport.width_f() - player.size);
            prop_assert!(player.pos.y >= player.size);
            prop_assert!(player.pos.y <= viewport.height_f() - BOTTOM_BLOCKER - player.size);
        }
    }

    #[test]
    fn zero_direction_is_fixed_point(
        viewport in viewport(),
        fx in 0.0f32..1.0,
        fy in 0.0f32..1.0,
    ) {
        let max_x = viewport.width_f() - PLAYER_SIZE;
        let max_y = viewport.height_f() - BOTTOM_BLOCKER - PLAYER_SIZE;
        let pos = Vec2::new(
            PLAYER_SIZE + fx * (max_x - PLAYER_SIZE),
            PLAYER_SIZE + fy * (max_y - PLAYER_SIZE),
        );
        let player = Player::new(pos);
        prop_assert_eq!(move_player(&player, Vec2::ZERO, viewport, BOTTOM_BLOCKER), pos);
    }

    #[test]
    fn enemies_never_move_away(
        ex in -100.0f32..1000.0,
        ey in -100.0f32..1000.0,
        tx in 0.0f32..800.0,
        ty in 0.0f32..600.0,
    ) {
        let target = Vec2::new(tx, ty);
        let mut enemies = vec![Enemy::new(1, Vec2::new(ex, ey))];
        let mut last = enemies[0].pos.distance(target);
        for _ in 0..20 {
            move_enemies(&mut enemies, target);
            let dist = enemies[0].pos.distance(target);
            prop_assert!(dist <= last + 1e-3);
            last = dist;
        }
    }

    #[test]
    fn contact_damage_is_one_hit_per_frame(count in 1usize..30, spread in 0.0f32..10.0) {
        let mut player = Player::new(Vec2::new(400.0, 300.0));
        let mut enemies: Vec<Enemy> = (0..count)
            .map(|i| Enemy::new(i as u32, player.pos + Vec2::new(spread, 0.0)))
            .collect();

        let result = resolve_player_contacts(&mut player, &enemies);
        apply_contact_policy(&mut enemies, &result, ContactPolicy::Consume);
        prop_assert_eq!(result.touching.len(), count);
        prop_assert_eq!(player.health, PLAYER_MAX_HEALTH - CONTACT_DAMAGE);
        prop_assert!(enemies.is_empty());
    }

    #[test]
    fn xp_stays_below_threshold(start in 0u32..10, award in 0u32..500) {
        let mut player = Player::new(Vec2::ZERO);
        player.xp = start as f32;
        let levels = award_xp(&mut player, award);
        prop_assert!(player.xp < player.xp_to_level as f32);
        prop_assert_eq!(player.level, 1 + levels);
    }

    #[test]
    fn delayed_orbs_are_never_collected(delay in 1u32..60) {
        let player = Player::new(Vec2::new(100.0, 100.0));
        let mut orb = XpOrb::new(1, player.pos);
        orb.spawn_delay = delay;
        let mut orbs = vec![orb];

        for _ in 0..delay {
            let update = update_orbs(&mut orbs, &player, FRAME_DT, ORB_LIFETIME_SECS);
            prop_assert_eq!(update.collected, 0);
        }
        let update = update_orbs(&mut orbs, &player, FRAME_DT, ORB_LIFETIME_SECS);
        prop_assert_eq!(update.collected, 1);
    }
}
