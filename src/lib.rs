//! Neon Strike - a wave-based vertical space shooter
//!
//! Core modules:
//! - `sim`: the simulation core (entities, waves, collisions, game state)
//! - `tuning`: data-driven archetype tables and difficulty scaling
//! - `settings`: difficulty selection and audio preferences
//! - `render`: Canvas 2D drawing of the live state (wasm)
//! - `audio`: procedurally generated sound effects (wasm)

pub mod settings;
pub mod sim;
pub mod tuning;

#[cfg(target_arch = "wasm32")]
pub mod audio;
#[cfg(target_arch = "wasm32")]
pub mod render;

pub use settings::{Difficulty, Settings};

use rand::Rng;

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions (logical pixels)
    pub const PLAYFIELD_WIDTH: f32 = 800.0;
    pub const PLAYFIELD_HEIGHT: f32 = 600.0;

    /// Player base hull size (scaled by the level table)
    pub const PLAYER_BASE_WIDTH: f32 = 40.0;
    pub const PLAYER_BASE_HEIGHT: f32 = 50.0;

    /// Post-hit invincibility window (ms)
    pub const INVINCIBLE_MS: f64 = 1500.0;
    /// Shield duration lost per absorbed hit (ms)
    pub const SHIELD_HIT_PENALTY_MS: f64 = 1000.0;
    /// Contact damage applied per frame of enemy/player overlap
    pub const CONTACT_DAMAGE: f32 = 20.0;

    /// Probability that a destroyed enemy drops a power-up
    pub const POWERUP_DROP_RATE: f32 = 0.3;
    /// Power-up fall speed (px/frame)
    pub const POWERUP_FALL_SPEED: f32 = 2.0;

    /// Rest period between waves (ms)
    pub const WAVE_REST_MS: f64 = 3000.0;
    /// Enemies spawn this far above the visible playfield
    pub const SPAWN_Y: f32 = -50.0;

    /// Homing missiles steer 5% of the way toward the pursuit vector per update
    pub const HOMING_LERP: f32 = 0.05;
    /// Projectiles are culled this far outside the playfield
    pub const BULLET_CULL_MARGIN: f32 = 20.0;
}

/// Linear interpolation
#[inline]
pub fn lerp(start: f32, end: f32, t: f32) -> f32 {
    start + (end - start) * t
}

/// Map a value from one range to another
#[inline]
pub fn map_range(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    if (in_max - in_min).abs() < f32::EPSILON {
        return out_min;
    }
    out_min + (value - in_min) / (in_max - in_min) * (out_max - out_min)
}

/// Euclidean distance between two points
#[inline]
pub fn distance(x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    ((x2 - x1).powi(2) + (y2 - y1).powi(2)).sqrt()
}

/// Pick an index from a weight table. Heavier entries win proportionally
/// more often. Returns the last index if rounding leaves the roll unspent.
pub fn weighted_index<R: Rng>(rng: &mut R, weights: &[f32]) -> usize {
    let total: f32 = weights.iter().sum();
    let mut roll = rng.random_range(0.0..total.max(f32::EPSILON));
    for (i, w) in weights.iter().enumerate() {
        roll -= w;
        if roll <= 0.0 {
            return i;
        }
    }
    weights.len().saturating_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_map_range() {
        assert!((map_range(5.0, 0.0, 10.0, 0.0, 100.0) - 50.0).abs() < 0.001);
        assert!((map_range(0.0, -1.0, 1.0, 0.0, 10.0) - 5.0).abs() < 0.001);
        // Degenerate input range collapses to out_min
        assert_eq!(map_range(3.0, 2.0, 2.0, 7.0, 9.0), 7.0);
    }

    #[test]
    fn test_distance() {
        assert!((distance(0.0, 0.0, 3.0, 4.0) - 5.0).abs() < 0.001);
    }

    #[test]
    fn test_weighted_index_respects_zero_weights() {
        let mut rng = Pcg32::seed_from_u64(7);
        let weights = [0.0, 1.0, 0.0];
        for _ in 0..100 {
            assert_eq!(weighted_index(&mut rng, &weights), 1);
        }
    }

    #[test]
    fn test_weighted_index_in_bounds() {
        let mut rng = Pcg32::seed_from_u64(42);
        let weights = [3.0, 2.0, 1.0, 1.0, 4.0, 2.0, 2.0];
        for _ in 0..1000 {
            assert!(weighted_index(&mut rng, &weights) < weights.len());
        }
    }
}
