//! Falling power-up pickups

use glam::Vec2;
use rand::Rng;

use super::collision::Hitbox;
use crate::consts::{POWERUP_DROP_RATE, POWERUP_FALL_SPEED};
use crate::tuning::{POWERUP_DROPS, PowerupKind};
use crate::weighted_index;

/// A falling pickup
#[derive(Debug, Clone)]
pub struct Powerup {
    pub pos: Vec2,
    pub kind: PowerupKind,
    pub width: f32,
    pub height: f32,
    fall_speed: f32,
    /// Cosmetic spin/pulse for rendering
    pub rotation: f32,
    pub pulse_phase: f32,
}

impl Powerup {
    pub fn new(pos: Vec2, kind: PowerupKind) -> Self {
        Self {
            pos,
            kind,
            width: 30.0,
            height: 30.0,
            fall_speed: POWERUP_FALL_SPEED,
            rotation: 0.0,
            pulse_phase: 0.0,
        }
    }

    pub fn update(&mut self) {
        self.pos.y += self.fall_speed;
        self.rotation += 0.05;
        self.pulse_phase += 0.1;
    }

    pub fn hitbox(&self) -> Hitbox {
        Hitbox::centered(self.pos, self.width, self.height)
    }

    pub fn is_out_of_bounds(&self, playfield_height: f32) -> bool {
        self.pos.y > playfield_height + self.height
    }
}

/// The live pickup collection
#[derive(Debug, Clone, Default)]
pub struct PowerupPool {
    pub powerups: Vec<Powerup>,
}

impl PowerupPool {
    /// Roll a drop at a destroyed enemy's position. Most rolls produce
    /// nothing; the rest draw a kind from the weighted table.
    pub fn spawn_random(&mut self, pos: Vec2, rng: &mut impl Rng) {
        if rng.random::<f32>() > POWERUP_DROP_RATE {
            return;
        }
        let weights: Vec<f32> = POWERUP_DROPS.iter().map(|(_, w)| *w).collect();
        let (kind, _) = POWERUP_DROPS[weighted_index(rng, &weights)];
        self.powerups.push(Powerup::new(pos, kind));
    }

    pub fn update(&mut self, playfield_height: f32) {
        for powerup in &mut self.powerups {
            powerup.update();
        }
        self.powerups.retain(|p| !p.is_out_of_bounds(playfield_height));
    }

    /// Collect the first pickup overlapping the player, if any. At most one
    /// pickup is collected per call even when several overlap.
    pub fn collect(&mut self, player_hitbox: &Hitbox) -> Option<PowerupKind> {
        let idx = self
            .powerups
            .iter()
            .position(|p| p.hitbox().intersects(player_hitbox))?;
        Some(self.powerups.remove(idx).kind)
    }

    pub fn clear(&mut self) {
        self.powerups.clear();
    }

    pub fn len(&self) -> usize {
        self.powerups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.powerups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_falls_and_culls() {
        let mut pool = PowerupPool::default();
        pool.powerups.push(Powerup::new(Vec2::new(400.0, 595.0), PowerupKind::Health));
        for _ in 0..20 {
            pool.update(600.0);
        }
        assert!(pool.is_empty());
    }

    #[test]
    fn test_collect_at_most_one() {
        let mut pool = PowerupPool::default();
        // Two pickups stacked on the same spot
        pool.powerups.push(Powerup::new(Vec2::new(400.0, 500.0), PowerupKind::Shield));
        pool.powerups.push(Powerup::new(Vec2::new(400.0, 500.0), PowerupKind::Health));

        let player = Hitbox::centered(Vec2::new(400.0, 500.0), 40.0, 50.0);
        // First in storage order wins
        assert_eq!(pool.collect(&player), Some(PowerupKind::Shield));
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.collect(&player), Some(PowerupKind::Health));
        assert_eq!(pool.collect(&player), None);
    }

    #[test]
    fn test_spawn_rate_roughly_matches() {
        let mut rng = Pcg32::seed_from_u64(99);
        let mut pool = PowerupPool::default();
        for _ in 0..1000 {
            pool.spawn_random(Vec2::new(100.0, 100.0), &mut rng);
        }
        // 30% drop rate; allow generous slack for the seed
        assert!(pool.len() > 200 && pool.len() < 400, "got {}", pool.len());
    }
}
