//! Data-driven game balance
//!
//! Enemy, weapon, and power-up "types" are archetype records selected by tag,
//! not a class hierarchy. Construction copies the matching record onto the
//! instance, scaled by the active difficulty. Unknown tags fall back to the
//! base archetype rather than failing the run.

use serde::{Deserialize, Serialize};

use crate::settings::Difficulty;

/// Spatial arrangement of projectiles emitted per fire event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirePattern {
    /// One projectile straight along the firing axis
    Single,
    /// Two projectiles offset +-10 px laterally
    Double,
    /// Five projectiles at {-30, -15, 0, 15, 30} degrees off the firing axis
    Spread,
}

/// Weapon type tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeaponKind {
    Basic,
    Double,
    Spread,
    Laser,
    Missile,
}

/// Static stats for one weapon type
#[derive(Debug, Clone, Copy)]
pub struct WeaponArchetype {
    pub name: &'static str,
    pub damage: f32,
    /// Minimum time between shots (ms)
    pub fire_interval_ms: f64,
    pub bullet_speed: f32,
    pub pattern: FirePattern,
    pub piercing: bool,
    pub homing: bool,
    pub color: &'static str,
}

/// Player-side weapon table
pub fn player_weapon(kind: WeaponKind) -> &'static WeaponArchetype {
    match kind {
        WeaponKind::Basic => &WeaponArchetype {
            name: "Pulse Cannon",
            damage: 1.0,
            fire_interval_ms: 200.0,
            bullet_speed: 10.0,
            pattern: FirePattern::Single,
            piercing: false,
            homing: false,
            color: "#00ffff",
        },
        WeaponKind::Double => &WeaponArchetype {
            name: "Twin Cannon",
            damage: 1.0,
            fire_interval_ms: 200.0,
            bullet_speed: 10.0,
            pattern: FirePattern::Double,
            piercing: false,
            homing: false,
            color: "#00ffff",
        },
        WeaponKind::Spread => &WeaponArchetype {
            name: "Scatter Gun",
            damage: 0.5,
            fire_interval_ms: 400.0,
            bullet_speed: 8.0,
            pattern: FirePattern::Spread,
            piercing: false,
            homing: false,
            color: "#66ffff",
        },
        WeaponKind::Laser => &WeaponArchetype {
            name: "Beam Laser",
            damage: 2.0,
            fire_interval_ms: 100.0,
            bullet_speed: 15.0,
            pattern: FirePattern::Single,
            piercing: true,
            homing: false,
            color: "#ff00ff",
        },
        WeaponKind::Missile => &WeaponArchetype {
            name: "Seeker Missile",
            damage: 5.0,
            fire_interval_ms: 800.0,
            bullet_speed: 5.0,
            pattern: FirePattern::Single,
            piercing: false,
            homing: true,
            color: "#ffaa00",
        },
    }
}

/// Enemy-side weapon table. Enemies only field basic/double/spread hardware;
/// any other tag behaves as basic (fallback-to-default policy).
pub fn enemy_weapon(kind: WeaponKind) -> &'static WeaponArchetype {
    match kind {
        WeaponKind::Double => &WeaponArchetype {
            name: "Twin Bolt",
            damage: 10.0,
            fire_interval_ms: 1200.0,
            bullet_speed: 5.0,
            pattern: FirePattern::Double,
            piercing: false,
            homing: false,
            color: "#ff3366",
        },
        WeaponKind::Spread => &WeaponArchetype {
            name: "Flak Burst",
            damage: 8.0,
            fire_interval_ms: 2000.0,
            bullet_speed: 4.0,
            pattern: FirePattern::Spread,
            piercing: false,
            homing: false,
            color: "#ff6699",
        },
        _ => &WeaponArchetype {
            name: "Bolt",
            damage: 10.0,
            fire_interval_ms: 1500.0,
            bullet_speed: 4.0,
            pattern: FirePattern::Single,
            piercing: false,
            homing: false,
            color: "#ff3366",
        },
    }
}

/// Enemy type tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    Scout,
    Fighter,
    Heavy,
    Boss,
}

/// Static stats for one enemy type, before difficulty scaling
#[derive(Debug, Clone, Copy)]
pub struct EnemyArchetype {
    pub name: &'static str,
    pub health: f32,
    pub speed: f32,
    pub score: u32,
    pub width: f32,
    pub height: f32,
    pub weapon: WeaponKind,
    /// Overrides the weapon table's interval for this hull
    pub fire_interval_ms: f64,
    pub color: &'static str,
}

pub fn enemy_archetype(kind: EnemyKind) -> &'static EnemyArchetype {
    match kind {
        EnemyKind::Scout => &EnemyArchetype {
            name: "Scout",
            health: 1.0,
            speed: 3.0,
            score: 100,
            width: 25.0,
            height: 30.0,
            weapon: WeaponKind::Basic,
            fire_interval_ms: 2000.0,
            color: "#ff3366",
        },
        EnemyKind::Fighter => &EnemyArchetype {
            name: "Fighter",
            health: 3.0,
            speed: 2.0,
            score: 200,
            width: 35.0,
            height: 40.0,
            weapon: WeaponKind::Double,
            fire_interval_ms: 1500.0,
            color: "#ff3366",
        },
        EnemyKind::Heavy => &EnemyArchetype {
            name: "Heavy",
            health: 6.0,
            speed: 1.5,
            score: 300,
            width: 45.0,
            height: 50.0,
            weapon: WeaponKind::Spread,
            fire_interval_ms: 2500.0,
            color: "#ff6699",
        },
        EnemyKind::Boss => &EnemyArchetype {
            name: "Boss",
            health: 30.0,
            speed: 1.0,
            score: 1000,
            width: 80.0,
            height: 90.0,
            weapon: WeaponKind::Spread,
            fire_interval_ms: 1000.0,
            color: "#ff0000",
        },
    }
}

/// What a collected power-up does
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PowerupEffect {
    /// Swap the player's weapon (permanent until replaced)
    Weapon(WeaponKind),
    /// Restore health, clamped to max
    Heal(f32),
    /// Shield for the given duration (ms)
    Shield { duration_ms: f64 },
    /// Score multiplier for the given duration (ms)
    ScoreMultiplier { multiplier: u32, duration_ms: f64 },
}

/// Power-up type tags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerupKind {
    WeaponDouble,
    WeaponSpread,
    WeaponLaser,
    WeaponMissile,
    Health,
    Shield,
    ScoreBoost,
}

#[derive(Debug, Clone, Copy)]
pub struct PowerupArchetype {
    pub name: &'static str,
    pub color: &'static str,
    pub effect: PowerupEffect,
}

pub fn powerup_archetype(kind: PowerupKind) -> &'static PowerupArchetype {
    match kind {
        PowerupKind::WeaponDouble => &PowerupArchetype {
            name: "Twin Cannon",
            color: "#00ffff",
            effect: PowerupEffect::Weapon(WeaponKind::Double),
        },
        PowerupKind::WeaponSpread => &PowerupArchetype {
            name: "Scatter Gun",
            color: "#66ffff",
            effect: PowerupEffect::Weapon(WeaponKind::Spread),
        },
        PowerupKind::WeaponLaser => &PowerupArchetype {
            name: "Beam Laser",
            color: "#ff00ff",
            effect: PowerupEffect::Weapon(WeaponKind::Laser),
        },
        PowerupKind::WeaponMissile => &PowerupArchetype {
            name: "Seeker Missile",
            color: "#ffaa00",
            effect: PowerupEffect::Weapon(WeaponKind::Missile),
        },
        PowerupKind::Health => &PowerupArchetype {
            name: "Repair Kit",
            color: "#00ff00",
            effect: PowerupEffect::Heal(30.0),
        },
        PowerupKind::Shield => &PowerupArchetype {
            name: "Shield",
            color: "#9966ff",
            effect: PowerupEffect::Shield { duration_ms: 5000.0 },
        },
        PowerupKind::ScoreBoost => &PowerupArchetype {
            name: "Score x2",
            color: "#ffff00",
            effect: PowerupEffect::ScoreMultiplier {
                multiplier: 2,
                duration_ms: 10000.0,
            },
        },
    }
}

/// Drop table: kinds with relative weights. Weapon grants are rarer than
/// repairs so a run isn't flooded with weapon swaps.
pub const POWERUP_DROPS: [(PowerupKind, f32); 7] = [
    (PowerupKind::WeaponDouble, 3.0),
    (PowerupKind::WeaponSpread, 2.0),
    (PowerupKind::WeaponLaser, 1.0),
    (PowerupKind::WeaponMissile, 1.0),
    (PowerupKind::Health, 4.0),
    (PowerupKind::Shield, 2.0),
    (PowerupKind::ScoreBoost, 2.0),
];

/// Per-level player stats. `exp_required` is the cumulative experience needed
/// to reach the level.
#[derive(Debug, Clone, Copy)]
pub struct LevelStats {
    pub exp_required: u32,
    pub max_health: f32,
    pub size: f32,
    pub speed: f32,
    pub damage_multiplier: f32,
    pub color: &'static str,
}

/// Level progression curve, level 1 at index 0
pub const PLAYER_LEVELS: [LevelStats; 10] = [
    LevelStats { exp_required: 0, max_health: 100.0, size: 1.00, speed: 5.0, damage_multiplier: 1.0, color: "#00ffff" },
    LevelStats { exp_required: 150, max_health: 110.0, size: 1.05, speed: 5.2, damage_multiplier: 1.2, color: "#00ffcc" },
    LevelStats { exp_required: 400, max_health: 125.0, size: 1.10, speed: 5.4, damage_multiplier: 1.4, color: "#33ff99" },
    LevelStats { exp_required: 800, max_health: 140.0, size: 1.15, speed: 5.6, damage_multiplier: 1.6, color: "#66ff66" },
    LevelStats { exp_required: 1400, max_health: 160.0, size: 1.20, speed: 5.8, damage_multiplier: 1.9, color: "#99ff33" },
    LevelStats { exp_required: 2200, max_health: 180.0, size: 1.25, speed: 6.0, damage_multiplier: 2.2, color: "#ccff00" },
    LevelStats { exp_required: 3200, max_health: 205.0, size: 1.30, speed: 6.2, damage_multiplier: 2.5, color: "#ffcc00" },
    LevelStats { exp_required: 4500, max_health: 230.0, size: 1.35, speed: 6.4, damage_multiplier: 2.8, color: "#ff9933" },
    LevelStats { exp_required: 6000, max_health: 260.0, size: 1.40, speed: 6.6, damage_multiplier: 3.2, color: "#ff6666" },
    LevelStats { exp_required: 8000, max_health: 300.0, size: 1.45, speed: 6.8, damage_multiplier: 3.6, color: "#ff33ff" },
];

pub const MAX_LEVEL: u32 = PLAYER_LEVELS.len() as u32;

/// Multipliers applied when constructing enemies and scheduling waves.
/// Read once at construction time, never re-read mid-run.
#[derive(Debug, Clone, Copy)]
pub struct DifficultyScaling {
    pub enemy_health: f32,
    pub enemy_speed: f32,
    /// Scales fire *intervals*: >1.0 means slower shooting
    pub enemy_fire_interval: f64,
    pub enemy_damage: f32,
    /// Scales wave spawn intervals
    pub spawn_interval: f64,
    pub score: f32,
}

pub fn difficulty_scaling(difficulty: Difficulty) -> DifficultyScaling {
    match difficulty {
        Difficulty::Easy => DifficultyScaling {
            enemy_health: 0.7,
            enemy_speed: 0.8,
            enemy_fire_interval: 1.3,
            enemy_damage: 0.7,
            spawn_interval: 1.2,
            score: 0.8,
        },
        Difficulty::Normal => DifficultyScaling {
            enemy_health: 1.0,
            enemy_speed: 1.0,
            enemy_fire_interval: 1.0,
            enemy_damage: 1.0,
            spawn_interval: 1.0,
            score: 1.0,
        },
        Difficulty::Hard => DifficultyScaling {
            enemy_health: 1.5,
            enemy_speed: 1.2,
            enemy_fire_interval: 0.75,
            enemy_damage: 1.3,
            spawn_interval: 0.85,
            score: 1.5,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enemy_weapon_fallback() {
        // Laser/missile have no enemy-side entry; they behave as basic
        let basic = enemy_weapon(WeaponKind::Basic);
        let laser = enemy_weapon(WeaponKind::Laser);
        assert_eq!(laser.damage, basic.damage);
        assert_eq!(laser.pattern, basic.pattern);
        assert!(!laser.piercing);
    }

    #[test]
    fn test_level_curve_ascending() {
        for pair in PLAYER_LEVELS.windows(2) {
            assert!(pair[1].exp_required > pair[0].exp_required);
            assert!(pair[1].max_health >= pair[0].max_health);
            assert!(pair[1].damage_multiplier >= pair[0].damage_multiplier);
        }
    }

    #[test]
    fn test_drop_weights_positive() {
        for (_, w) in POWERUP_DROPS {
            assert!(w > 0.0);
        }
    }
}
