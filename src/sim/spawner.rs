//! Periodic enemy spawning at the viewport border.
//!
//! The timer runs on simulation time, which stands still while the game is
//! paused, so resuming never releases a backlog of missed spawns. At most
//! one enemy appears per frame.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::Viewport;
use crate::consts::SPAWN_OFFSET;

/// Viewport edge an enemy walks in from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Bottom, Edge::Left, Edge::Right];
}

/// Interval-gated spawn timer
#[derive(Debug, Clone)]
pub struct Spawner {
    /// Milliseconds between spawns
    pub interval_ms: f64,
    /// Simulation time of the last spawn
    pub last_spawn_ms: f64,
}

impl Spawner {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            last_spawn_ms: 0.0,
        }
    }

    /// True at most once per call when a full interval has passed since the last spawn
    pub fn update(&mut self, now_ms: f64) -> bool {
        if now_ms - self.last_spawn_ms >= self.interval_ms {
            self.last_spawn_ms = now_ms;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.last_spawn_ms = 0.0;
    }
}

/// Uniformly random point just outside a uniformly chosen viewport edge
pub fn border_spawn_point<R: Rng + ?Sized>(rng: &mut R, viewport: Viewport) -> (Edge, Vec2) {
    let edge = Edge::ALL[rng.random_range(0..Edge::ALL.len())];
    let along_x = rng.random::<f32>() * viewport.width_f();
    let along_y = rng.random::<f32>() * viewport.height_f();
    let pos = match edge {
        Edge::Top => Vec2::new(along_x, -SPAWN_OFFSET),
        Edge::Bottom => Vec2::new(along_x, viewport.height_f() + SPAWN_OFFSET),
        Edge::Left => Vec2::new(-SPAWN_OFFSET, along_y),
        Edge::Right => Vec2::new(viewport.width_f() + SPAWN_OFFSET, along_y),
    };
    (edge, pos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_spawn_points_sit_outside_their_edge() {
        let mut rng = Pcg32::seed_from_u64(42);
        let vp = Viewport::new(640, 480);
        let mut seen = [false; 4];

        for _ in 0..400 {
            let (edge, pos) = border_spawn_point(&mut rng, vp);
            match edge {
                Edge::Top => {
                    seen[0] = true;
                    assert_eq!(pos.y, -SPAWN_OFFSET);
                    assert!((0.0..640.0).contains(&pos.x));
                }
                Edge::Bottom => {
                    seen[1] = true;
                    assert_eq!(pos.y, 480.0 + SPAWN_OFFSET);
                    assert!((0.0..640.0).contains(&pos.x));
                }
                Edge::Left => {
                    seen[2] = true;
                    assert_eq!(pos.x, -SPAWN_OFFSET);
                    assert!((0.0..480.0).contains(&pos.y));
                }
                Edge::Right => {
                    seen[3] = true;
                    assert_eq!(pos.x, 640.0 + SPAWN_OFFSET);
                    assert!((0.0..480.0).contains(&pos.y));
                }
            }
            assert!(!vp.contains(pos));
        }
        assert!(seen.iter().all(|&s| s), "every edge should be used");
    }

    #[test]
    fn test_timer_fires_once_per_interval() {
        let mut spawner = Spawner::new(50.0);
        assert!(!spawner.update(20.0));
        assert!(!spawner.update(49.0));
        assert!(spawner.update(50.0));
        assert!(!spawner.update(60.0));
        assert!(spawner.update(100.0));
    }

    #[test]
    fn test_long_gap_yields_single_spawn() {
        let mut spawner = Spawner::new(50.0);
        // A huge jump in time still only triggers one spawn
        assert!(spawner.update(10_000.0));
        assert!(!spawner.update(10_010.0));
    }
}
