//! Cosmetic particle pool
//!
//! Purely visual: nothing in gameplay reads particle state. The pool is owned
//! by the simulation state so effects survive pause and render consistently.

use glam::Vec2;
use rand::Rng;

/// Visual particle shape tags for the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleShape {
    Dot,
    Line,
    Spark,
}

#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Remaining life fraction; the particle dies at 0
    pub life: f32,
    pub max_life: f32,
    pub decay: f32,
    pub color: &'static str,
    pub size: f32,
    pub shape: ParticleShape,
    pub angle: f32,
    pub length: f32,
}

impl Particle {
    pub fn update(&mut self) {
        self.pos += self.vel;
        self.life -= self.decay;
        // Drag
        self.vel *= 0.98;
    }

    pub fn is_dead(&self) -> bool {
        self.life <= 0.0
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParticlePool {
    pub particles: Vec<Particle>,
}

impl ParticlePool {
    pub fn update(&mut self) {
        for particle in &mut self.particles {
            particle.update();
        }
        self.particles.retain(|p| !p.is_dead());
    }

    /// Radial line burst with trailing sparks
    pub fn explosion(&mut self, pos: Vec2, color: &'static str, count: u32, rng: &mut impl Rng) {
        for i in 0..count {
            let angle = (std::f32::consts::TAU / count as f32) * i as f32
                + rng.random_range(-0.3..0.3);
            let speed = rng.random_range(2.0..6.0);
            self.particles.push(Particle {
                pos,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                life: rng.random_range(0.5..1.0),
                max_life: 1.0,
                decay: 0.02,
                color,
                size: 2.0,
                shape: ParticleShape::Line,
                angle,
                length: rng.random_range(10.0..25.0),
            });
        }
        for _ in 0..count / 2 {
            let angle = rng.random_range(0.0..std::f32::consts::TAU);
            let speed = rng.random_range(3.0..8.0);
            self.particles.push(Particle {
                pos,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                life: rng.random_range(0.3..0.6),
                max_life: 0.6,
                decay: 0.03,
                color,
                size: 2.0,
                shape: ParticleShape::Spark,
                angle,
                length: 10.0,
            });
        }
    }

    /// Small spark puff where a bullet connects
    pub fn hit_effect(&mut self, pos: Vec2, color: &'static str, rng: &mut impl Rng) {
        for _ in 0..8 {
            let angle = rng.random_range(0.0..std::f32::consts::TAU);
            let speed = rng.random_range(1.0..3.0);
            self.particles.push(Particle {
                pos,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                life: 0.3,
                max_life: 0.3,
                decay: 0.03,
                color,
                size: 2.0,
                shape: ParticleShape::Spark,
                angle,
                length: 10.0,
            });
        }
    }

    /// Single exhaust dot behind the player's engine
    pub fn engine_trail(&mut self, pos: Vec2, color: &'static str, rng: &mut impl Rng) {
        self.particles.push(Particle {
            pos,
            vel: Vec2::new(rng.random_range(-0.5..0.5), rng.random_range(2.0..4.0)),
            life: 0.3,
            max_life: 0.3,
            decay: 0.03,
            color,
            size: rng.random_range(1.0..3.0),
            shape: ParticleShape::Dot,
            angle: 0.0,
            length: 0.0,
        });
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_particles_decay_and_die() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut pool = ParticlePool::default();
        pool.explosion(Vec2::new(100.0, 100.0), "#00ffff", 20, &mut rng);
        assert_eq!(pool.len(), 30); // 20 lines + 10 sparks

        for _ in 0..100 {
            pool.update();
        }
        assert_eq!(pool.len(), 0);
    }

    #[test]
    fn test_drag_slows_particles() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut pool = ParticlePool::default();
        pool.hit_effect(Vec2::ZERO, "#ffffff", &mut rng);
        let initial_speed = pool.particles[0].vel.length();
        pool.update();
        assert!(pool.particles[0].vel.length() < initial_speed);
    }
}
