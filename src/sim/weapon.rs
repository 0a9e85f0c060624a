//! Weapons and projectiles
//!
//! A weapon is owned by exactly one player or enemy. Firing is gated on an
//! absolute millisecond clock; switching weapon kind resets damage/rate/pattern
//! but deliberately keeps the previous `last_fire` timestamp, so a freshly
//! granted weapon inherits any remaining cooldown.

use glam::Vec2;

use super::collision::Hitbox;
use crate::consts::{BULLET_CULL_MARGIN, HOMING_LERP};
use crate::lerp;
use crate::tuning::{self, FirePattern, WeaponKind};

/// Pursuit speed for homing missiles (px/frame), independent of launch speed
const HOMING_PURSUIT_SPEED: f32 = 6.0;

/// Fixed angular offsets for the spread pattern (degrees off the firing axis)
const SPREAD_ANGLES: [f32; 5] = [-30.0, -15.0, 0.0, 15.0, 30.0];

/// A projectile in flight
#[derive(Debug, Clone)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    pub damage: f32,
    pub width: f32,
    pub height: f32,
    pub kind: WeaponKind,
    pub enemy_fired: bool,
    /// Piercing bullets survive hits and keep traveling
    pub piercing: bool,
    /// Homing target by enemy id. Non-owning: if the target is gone the
    /// bullet keeps its last heading.
    pub target: Option<u32>,
    pub color: &'static str,
}

impl Bullet {
    /// Advance one frame. `target_pos` is the tracked enemy's current
    /// position, resolved by the orchestrator; `None` means target lost.
    pub fn update(&mut self, target_pos: Option<Vec2>) {
        if self.kind == WeaponKind::Missile {
            if let Some(target) = target_pos {
                let to_target = target - self.pos;
                let angle = to_target.y.atan2(to_target.x);
                self.vel.x = lerp(self.vel.x, angle.cos() * HOMING_PURSUIT_SPEED, HOMING_LERP);
                self.vel.y = lerp(self.vel.y, angle.sin() * HOMING_PURSUIT_SPEED, HOMING_LERP);
            }
        }
        self.pos += self.vel;
    }

    pub fn hitbox(&self) -> Hitbox {
        Hitbox::centered(self.pos, self.width, self.height)
    }

    pub fn is_out_of_bounds(&self, playfield_width: f32, playfield_height: f32) -> bool {
        self.pos.y < -BULLET_CULL_MARGIN
            || self.pos.y > playfield_height + BULLET_CULL_MARGIN
            || self.pos.x < -BULLET_CULL_MARGIN
            || self.pos.x > playfield_width + BULLET_CULL_MARGIN
    }
}

/// A fireable weapon instance
#[derive(Debug, Clone)]
pub struct Weapon {
    pub kind: WeaponKind,
    pub name: &'static str,
    pub damage: f32,
    /// Minimum time between shots (ms)
    pub fire_interval_ms: f64,
    pub bullet_speed: f32,
    pub pattern: FirePattern,
    pub piercing: bool,
    pub homing: bool,
    pub color: &'static str,
    pub enemy_side: bool,
    /// Absolute game-clock timestamp of the last successful fire (ms)
    pub last_fire_ms: f64,
}

impl Weapon {
    pub fn player(kind: WeaponKind) -> Self {
        Self::new(kind, false)
    }

    pub fn enemy(kind: WeaponKind) -> Self {
        Self::new(kind, true)
    }

    fn new(kind: WeaponKind, enemy_side: bool) -> Self {
        let mut weapon = Self {
            kind,
            name: "",
            damage: 0.0,
            fire_interval_ms: 0.0,
            bullet_speed: 0.0,
            pattern: FirePattern::Single,
            piercing: false,
            homing: false,
            color: "",
            enemy_side,
            last_fire_ms: 0.0,
        };
        weapon.set_kind(kind);
        weapon
    }

    /// Swap to another weapon kind. Stats are reset from the archetype table;
    /// `last_fire_ms` is preserved (cooldown carryover).
    pub fn set_kind(&mut self, kind: WeaponKind) {
        let archetype = if self.enemy_side {
            tuning::enemy_weapon(kind)
        } else {
            tuning::player_weapon(kind)
        };
        self.kind = kind;
        self.name = archetype.name;
        self.damage = archetype.damage;
        self.fire_interval_ms = archetype.fire_interval_ms;
        self.bullet_speed = archetype.bullet_speed;
        self.pattern = archetype.pattern;
        self.piercing = archetype.piercing;
        self.homing = archetype.homing;
        self.color = archetype.color;
    }

    pub fn can_fire(&self, now_ms: f64) -> bool {
        now_ms - self.last_fire_ms >= self.fire_interval_ms
    }

    /// Fire from `origin`. Returns an empty list while on cooldown; otherwise
    /// stamps `last_fire_ms` and emits projectiles per the pattern. `target`
    /// is only attached to homing weapons.
    pub fn fire(&mut self, origin: Vec2, now_ms: f64, target: Option<u32>) -> Vec<Bullet> {
        if !self.can_fire(now_ms) {
            return Vec::new();
        }
        self.last_fire_ms = now_ms;

        let direction = if self.enemy_side { 1.0 } else { -1.0 };
        let mut bullets = Vec::new();

        match self.pattern {
            FirePattern::Single => {
                bullets.push(Bullet {
                    pos: origin,
                    vel: Vec2::new(0.0, self.bullet_speed * direction),
                    damage: self.damage,
                    width: 4.0,
                    height: if self.kind == WeaponKind::Laser { 30.0 } else { 15.0 },
                    kind: self.kind,
                    enemy_fired: self.enemy_side,
                    piercing: self.piercing,
                    target: if self.homing { target } else { None },
                    color: self.color,
                });
            }
            FirePattern::Double => {
                for offset in [-10.0, 10.0] {
                    bullets.push(Bullet {
                        pos: origin + Vec2::new(offset, 0.0),
                        vel: Vec2::new(0.0, self.bullet_speed * direction),
                        damage: self.damage,
                        width: 4.0,
                        height: 15.0,
                        kind: self.kind,
                        enemy_fired: self.enemy_side,
                        piercing: false,
                        target: None,
                        color: self.color,
                    });
                }
            }
            FirePattern::Spread => {
                let axis = if self.enemy_side { 90.0 } else { -90.0 };
                for angle in SPREAD_ANGLES {
                    let rad = (angle + axis).to_radians();
                    bullets.push(Bullet {
                        pos: origin,
                        vel: Vec2::new(rad.cos(), rad.sin()) * self.bullet_speed,
                        damage: self.damage,
                        width: 3.0,
                        height: 8.0,
                        kind: WeaponKind::Spread,
                        enemy_fired: self.enemy_side,
                        piercing: false,
                        target: None,
                        color: self.color,
                    });
                }
            }
        }

        bullets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_cooldown_gating() {
        let mut weapon = Weapon::player(WeaponKind::Basic);
        assert_eq!(weapon.fire(Vec2::ZERO, 1000.0, None).len(), 1);
        // 199ms later: still on cooldown
        assert!(weapon.fire(Vec2::ZERO, 1199.0, None).is_empty());
        // Exactly at the interval boundary: fires
        assert_eq!(weapon.fire(Vec2::ZERO, 1200.0, None).len(), 1);
    }

    #[test]
    fn test_failed_fire_keeps_timestamp() {
        let mut weapon = Weapon::player(WeaponKind::Basic);
        weapon.fire(Vec2::ZERO, 1000.0, None);
        weapon.fire(Vec2::ZERO, 1100.0, None); // gated
        assert_eq!(weapon.last_fire_ms, 1000.0);
    }

    #[test]
    fn test_double_pattern_offsets() {
        let mut weapon = Weapon::player(WeaponKind::Double);
        let bullets = weapon.fire(Vec2::new(100.0, 500.0), 1000.0, None);
        assert_eq!(bullets.len(), 2);
        assert_eq!(bullets[0].pos.x, 90.0);
        assert_eq!(bullets[1].pos.x, 110.0);
        // Player bullets travel upward
        assert!(bullets.iter().all(|b| b.vel.y < 0.0));
    }

    #[test]
    fn test_spread_pattern_symmetric() {
        let mut weapon = Weapon::player(WeaponKind::Spread);
        let bullets = weapon.fire(Vec2::new(400.0, 500.0), 1000.0, None);
        assert_eq!(bullets.len(), 5);
        // Lateral velocities cancel out across the fan
        let vx_sum: f32 = bullets.iter().map(|b| b.vel.x).sum();
        assert!(vx_sum.abs() < 0.001);
        // Center ray is straight up at full speed
        assert!(bullets[2].vel.x.abs() < 0.001);
        assert!((bullets[2].vel.y + weapon.bullet_speed).abs() < 0.001);
    }

    #[test]
    fn test_enemy_spread_points_down() {
        let mut weapon = Weapon::enemy(WeaponKind::Spread);
        // A fresh weapon starts with last_fire_ms = 0, so it is gated until
        // its full interval (2000ms here) has elapsed once.
        assert!(weapon.fire(Vec2::new(400.0, 50.0), 1000.0, None).is_empty());

        let bullets = weapon.fire(Vec2::new(400.0, 50.0), 2500.0, None);
        assert_eq!(bullets.len(), 5);
        assert!(bullets.iter().all(|b| b.vel.y > 0.0));
    }

    #[test]
    fn test_switch_preserves_cooldown() {
        let mut weapon = Weapon::player(WeaponKind::Basic);
        weapon.fire(Vec2::ZERO, 1000.0, None);
        weapon.set_kind(WeaponKind::Missile);
        assert_eq!(weapon.last_fire_ms, 1000.0);
        // Missile interval is 800ms; the carried-over stamp gates it
        assert!(weapon.fire(Vec2::ZERO, 1500.0, None).is_empty());
        assert_eq!(weapon.fire(Vec2::ZERO, 1800.0, None).len(), 1);
    }

    #[test]
    fn test_homing_attaches_target_only_when_homing() {
        let mut missile = Weapon::player(WeaponKind::Missile);
        let bullets = missile.fire(Vec2::ZERO, 1000.0, Some(7));
        assert_eq!(bullets[0].target, Some(7));

        let mut basic = Weapon::player(WeaponKind::Basic);
        let bullets = basic.fire(Vec2::ZERO, 1000.0, Some(7));
        assert_eq!(bullets[0].target, None);
    }

    #[test]
    fn test_homing_steers_toward_target() {
        let mut weapon = Weapon::player(WeaponKind::Missile);
        let mut bullet = weapon.fire(Vec2::new(100.0, 500.0), 1000.0, Some(1)).remove(0);
        let initial_vx = bullet.vel.x;
        // Target far to the right: vx should creep positive
        for _ in 0..50 {
            bullet.update(Some(Vec2::new(700.0, 100.0)));
        }
        assert!(bullet.vel.x > initial_vx);

        // Target lost: heading stays fixed
        let frozen = bullet.vel;
        bullet.update(None);
        assert_eq!(bullet.vel, frozen);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut weapon = Weapon::player(WeaponKind::Basic);
        let mut bullet = weapon.fire(Vec2::new(400.0, 10.0), 1000.0, None).remove(0);
        assert!(!bullet.is_out_of_bounds(800.0, 600.0));
        for _ in 0..10 {
            bullet.update(None);
        }
        assert!(bullet.is_out_of_bounds(800.0, 600.0));
    }

    proptest! {
        /// Successful fires are always separated by at least the interval,
        /// no matter how the caller hammers the trigger.
        #[test]
        fn prop_fire_respects_interval(offsets in proptest::collection::vec(0.0f64..500.0, 1..60)) {
            let mut weapon = Weapon::player(WeaponKind::Spread);
            let mut now = 0.0;
            let mut last_success: Option<f64> = None;
            for offset in offsets {
                now += offset;
                if !weapon.fire(Vec2::ZERO, now, None).is_empty() {
                    if let Some(prev) = last_success {
                        prop_assert!(now - prev >= weapon.fire_interval_ms);
                    }
                    last_success = Some(now);
                }
            }
        }
    }
}
