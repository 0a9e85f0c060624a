//! Enemy entities and the live enemy pool

use glam::Vec2;
use rand::Rng;

use super::collision::Hitbox;
use super::weapon::{Bullet, Weapon};
use crate::tuning::{self, DifficultyScaling, EnemyKind, WeaponKind};

/// Per-frame advance of the movement phase accumulator
const MOVE_PHASE_STEP: f32 = 0.03;
/// Boss holds position at this altitude and sweeps laterally
const BOSS_HOLD_Y: f32 = 100.0;

/// Movement pattern tags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovePattern {
    /// Constant descent
    Straight,
    /// Descent with lateral sine-modulated jitter
    Zigzag,
    /// Descent with a lateral sweep around a fixed base X
    Sine,
    /// Descend to a hold altitude, then sweep in a wide sine arc
    Boss,
}

/// A live enemy
#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub health: f32,
    pub max_health: f32,
    pub speed: f32,
    pub score: u32,
    pub exp_value: u32,
    pub color: &'static str,
    pub weapon: Weapon,
    pub move_pattern: MovePattern,
    pub move_phase: f32,
    base_x: f32,
    /// Boss attack cycle position (spread -> single -> double)
    attack_pattern: u8,
    pub dead: bool,
}

impl Enemy {
    pub fn new(
        id: u32,
        pos: Vec2,
        kind: EnemyKind,
        scaling: &DifficultyScaling,
        rng: &mut impl Rng,
    ) -> Self {
        let archetype = tuning::enemy_archetype(kind);

        let health = (archetype.health * scaling.enemy_health).ceil();
        let score = (archetype.score as f32 * scaling.score).ceil() as u32;

        let mut weapon = Weapon::enemy(archetype.weapon);
        weapon.fire_interval_ms = (archetype.fire_interval_ms * scaling.enemy_fire_interval).ceil();
        weapon.damage = (weapon.damage * scaling.enemy_damage).ceil();
        weapon.color = archetype.color;

        let move_pattern = if kind == EnemyKind::Boss {
            MovePattern::Boss
        } else {
            match rng.random_range(0..3) {
                0 => MovePattern::Straight,
                1 => MovePattern::Zigzag,
                _ => MovePattern::Sine,
            }
        };

        Self {
            id,
            kind,
            pos,
            width: archetype.width,
            height: archetype.height,
            health,
            max_health: health,
            speed: archetype.speed * scaling.enemy_speed,
            score,
            // Experience is worth half the (scaled) score
            exp_value: (score as f32 * 0.5).ceil() as u32,
            color: archetype.color,
            weapon,
            move_pattern,
            move_phase: rng.random_range(0.0..std::f32::consts::TAU),
            base_x: pos.x,
            attack_pattern: 0,
            dead: false,
        }
    }

    /// Advance one frame of movement; X is clamped into the playfield
    pub fn update(&mut self, playfield_width: f32) {
        self.move_phase += MOVE_PHASE_STEP;

        match self.move_pattern {
            MovePattern::Straight => {
                self.pos.y += self.speed;
            }
            MovePattern::Zigzag => {
                self.pos.y += self.speed;
                self.pos.x += (self.move_phase * 3.0).sin() * 2.0;
            }
            MovePattern::Sine => {
                self.pos.y += self.speed;
                self.pos.x = self.base_x + self.move_phase.sin() * 50.0;
            }
            MovePattern::Boss => {
                if self.pos.y < BOSS_HOLD_Y {
                    self.pos.y += self.speed;
                } else {
                    self.pos.x = playfield_width / 2.0
                        + self.move_phase.sin() * (playfield_width / 3.0);
                }
            }
        }

        let half = self.width / 2.0;
        self.pos.x = self.pos.x.clamp(half, playfield_width - half);
    }

    /// Fire if off cooldown. The boss cycles its weapon kind on each
    /// successful shot to vary its attack.
    pub fn shoot(&mut self, now_ms: f64) -> Vec<Bullet> {
        if !self.weapon.can_fire(now_ms) {
            return Vec::new();
        }

        if self.kind == EnemyKind::Boss {
            self.attack_pattern = (self.attack_pattern + 1) % 3;
            let kind = match self.attack_pattern {
                0 => WeaponKind::Spread,
                1 => WeaponKind::Basic,
                _ => WeaponKind::Double,
            };
            self.weapon.set_kind(kind);
        }

        let muzzle = self.pos + Vec2::new(0.0, self.height / 2.0);
        self.weapon.fire(muzzle, now_ms, None)
    }

    /// Apply damage. Returns true exactly on the transition from alive to
    /// dead; further calls on a dead enemy are no-ops.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if self.dead {
            return false;
        }
        self.health -= amount;
        if self.health <= 0.0 {
            self.health = 0.0;
            self.dead = true;
            return true;
        }
        false
    }

    pub fn hitbox(&self) -> Hitbox {
        Hitbox::centered(self.pos, self.width, self.height)
    }

    pub fn is_out_of_bounds(&self, playfield_height: f32) -> bool {
        self.pos.y > playfield_height + self.height
    }

    /// Health fraction for the HUD bar
    pub fn health_ratio(&self) -> f32 {
        if self.max_health <= 0.0 {
            0.0
        } else {
            self.health / self.max_health
        }
    }
}

/// The live enemy collection, owned by the simulation state
#[derive(Debug, Clone, Default)]
pub struct EnemyPool {
    pub enemies: Vec<Enemy>,
    next_id: u32,
}

impl EnemyPool {
    pub fn spawn(
        &mut self,
        pos: Vec2,
        kind: EnemyKind,
        scaling: &DifficultyScaling,
        rng: &mut impl Rng,
    ) -> u32 {
        self.next_id += 1;
        let id = self.next_id;
        self.enemies.push(Enemy::new(id, pos, kind, scaling, rng));
        id
    }

    /// Advance every enemy, then cull the dead and anything that exited the
    /// playfield bottom. Dead enemies are normally removed by collision
    /// resolution; this pass is the backstop so wave-completion counts never
    /// see a corpse.
    pub fn update(&mut self, playfield_width: f32, playfield_height: f32) {
        for enemy in &mut self.enemies {
            enemy.update(playfield_width);
        }
        self.enemies
            .retain(|e| !e.dead && !e.is_out_of_bounds(playfield_height));
    }

    /// Collect this frame's bullets from every enemy
    pub fn shoot_all(&mut self, now_ms: f64) -> Vec<Bullet> {
        let mut bullets = Vec::new();
        for enemy in &mut self.enemies {
            bullets.extend(enemy.shoot(now_ms));
        }
        bullets
    }

    pub fn get(&self, id: u32) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.enemies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }

    pub fn has_boss(&self) -> bool {
        self.enemies.iter().any(|e| e.kind == EnemyKind::Boss)
    }

    pub fn clear(&mut self) {
        self.enemies.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Difficulty;
    use crate::tuning::difficulty_scaling;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn normal() -> DifficultyScaling {
        difficulty_scaling(Difficulty::Normal)
    }

    #[test]
    fn test_take_damage_reports_kill_exactly_once() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut enemy = Enemy::new(1, Vec2::new(400.0, 100.0), EnemyKind::Fighter, &normal(), &mut rng);
        assert!(!enemy.take_damage(1.0));
        assert!(!enemy.take_damage(1.0));
        assert!(enemy.take_damage(5.0)); // crosses zero here
        assert_eq!(enemy.health, 0.0);
        assert!(!enemy.take_damage(100.0)); // already dead
        assert_eq!(enemy.health, 0.0);
    }

    #[test]
    fn test_update_clamps_to_playfield() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut enemy = Enemy::new(1, Vec2::new(5.0, 100.0), EnemyKind::Scout, &normal(), &mut rng);
        enemy.move_pattern = MovePattern::Sine;
        for _ in 0..300 {
            enemy.update(800.0);
            let half = enemy.width / 2.0;
            assert!(enemy.pos.x >= half && enemy.pos.x <= 800.0 - half);
        }
    }

    #[test]
    fn test_boss_holds_altitude() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut boss = Enemy::new(1, Vec2::new(400.0, -50.0), EnemyKind::Boss, &normal(), &mut rng);
        for _ in 0..500 {
            boss.update(800.0);
        }
        assert!(boss.pos.y >= 100.0 && boss.pos.y < 102.0);
    }

    #[test]
    fn test_boss_attack_cycle() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut boss = Enemy::new(1, Vec2::new(400.0, 100.0), EnemyKind::Boss, &normal(), &mut rng);

        // First successful shot advances the cycle to single
        let mut now = 10_000.0;
        assert!(!boss.shoot(now).is_empty());
        assert_eq!(boss.weapon.kind, WeaponKind::Basic);

        now += 20_000.0;
        assert!(!boss.shoot(now).is_empty());
        assert_eq!(boss.weapon.kind, WeaponKind::Double);

        now += 20_000.0;
        assert!(!boss.shoot(now).is_empty());
        assert_eq!(boss.weapon.kind, WeaponKind::Spread);

        // Gated shot does not advance the cycle
        assert!(boss.shoot(now + 1.0).is_empty());
        assert_eq!(boss.weapon.kind, WeaponKind::Spread);
    }

    #[test]
    fn test_difficulty_scaling_ceils_health() {
        let mut rng = Pcg32::seed_from_u64(5);
        let hard = difficulty_scaling(Difficulty::Hard);
        // Scout: 1 hp * 1.5 -> ceil(1.5) = 2
        let enemy = Enemy::new(1, Vec2::new(400.0, 0.0), EnemyKind::Scout, &hard, &mut rng);
        assert_eq!(enemy.health, 2.0);
        assert_eq!(enemy.exp_value, 75); // ceil(ceil(100 * 1.5) * 0.5)
    }

    #[test]
    fn test_pool_culls_dead_and_out_of_bounds() {
        let mut rng = Pcg32::seed_from_u64(6);
        let scaling = normal();
        let mut pool = EnemyPool::default();
        let survivor = pool.spawn(Vec2::new(100.0, 100.0), EnemyKind::Scout, &scaling, &mut rng);
        pool.spawn(Vec2::new(200.0, 700.0), EnemyKind::Scout, &scaling, &mut rng);
        pool.spawn(Vec2::new(300.0, 100.0), EnemyKind::Scout, &scaling, &mut rng);
        pool.enemies[2].take_damage(10.0);

        // Lateral patterns shift x during the update, so identify by id
        pool.update(800.0, 600.0);
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.enemies[0].id, survivor);
    }

    #[test]
    fn test_pool_ids_unique_and_resolvable() {
        let mut rng = Pcg32::seed_from_u64(7);
        let scaling = normal();
        let mut pool = EnemyPool::default();
        let a = pool.spawn(Vec2::new(100.0, 100.0), EnemyKind::Scout, &scaling, &mut rng);
        let b = pool.spawn(Vec2::new(200.0, 100.0), EnemyKind::Heavy, &scaling, &mut rng);
        assert_ne!(a, b);
        assert_eq!(pool.get(b).unwrap().kind, EnemyKind::Heavy);
        assert!(pool.get(9999).is_none());
    }
}
