//! Player ship: movement, firing, damage states, leveling

use glam::Vec2;

use super::collision::Hitbox;
use super::enemy::EnemyPool;
use super::weapon::{Bullet, Weapon};
use crate::consts::{
    INVINCIBLE_MS, PLAYER_BASE_HEIGHT, PLAYER_BASE_WIDTH, SHIELD_HIT_PENALTY_MS,
};
use crate::distance;
use crate::tuning::{MAX_LEVEL, PLAYER_LEVELS, WeaponKind};

/// Level-up halo effect duration (frames)
const LEVEL_UP_EFFECT_FRAMES: u32 = 60;

/// Movement/fire intent flags supplied by the input collaborator
#[derive(Debug, Clone, Copy, Default)]
pub struct InputState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub fire: bool,
}

/// The player-controlled ship
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    pub health: f32,
    pub max_health: f32,
    pub weapon: Weapon,
    pub dead: bool,

    // Leveling
    pub level: u32,
    pub exp: u32,
    pub size_scale: f32,
    pub damage_multiplier: f32,
    pub ship_color: &'static str,

    // Transient states, expiry on the absolute game clock (ms)
    pub invincible: bool,
    pub invincible_until: f64,
    pub shield: bool,
    pub shield_until: f64,
    pub score_multiplier: u32,
    pub multiplier_until: f64,

    pub auto_fire: bool,
    pub input: InputState,

    // Cosmetic
    pub engine_phase: f32,
    pub level_up_frames: u32,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        let stats = &PLAYER_LEVELS[0];
        Self {
            pos,
            width: PLAYER_BASE_WIDTH,
            height: PLAYER_BASE_HEIGHT,
            speed: stats.speed,
            health: stats.max_health,
            max_health: stats.max_health,
            weapon: Weapon::player(WeaponKind::Basic),
            dead: false,
            level: 1,
            exp: 0,
            size_scale: stats.size,
            damage_multiplier: stats.damage_multiplier,
            ship_color: stats.color,
            invincible: false,
            invincible_until: 0.0,
            shield: false,
            shield_until: 0.0,
            score_multiplier: 1,
            multiplier_until: 0.0,
            auto_fire: false,
            input: InputState::default(),
            engine_phase: 0.0,
            level_up_frames: 0,
        }
    }

    /// Accumulate experience. Returns true if this grant crossed the next
    /// level's threshold. Only the immediately next level is checked; a
    /// large grant never cascades multiple level-ups in one call.
    pub fn add_exp(&mut self, amount: u32) -> bool {
        self.exp += amount;
        if self.level < MAX_LEVEL {
            let next = &PLAYER_LEVELS[self.level as usize];
            if self.exp >= next.exp_required {
                self.level_up();
                return true;
            }
        }
        false
    }

    /// Advance one level, rescaling stats from the table. Current health
    /// keeps its *percentage* of the new maximum.
    pub fn level_up(&mut self) {
        if self.level >= MAX_LEVEL {
            return;
        }
        self.level += 1;
        let stats = &PLAYER_LEVELS[(self.level - 1) as usize];

        let health_percent = self.health / self.max_health;
        self.max_health = stats.max_health;
        self.health = (self.max_health * health_percent).ceil();
        self.size_scale = stats.size;
        self.speed = stats.speed;
        self.damage_multiplier = stats.damage_multiplier;
        self.ship_color = stats.color;
        self.width = PLAYER_BASE_WIDTH * self.size_scale;
        self.height = PLAYER_BASE_HEIGHT * self.size_scale;

        self.level_up_frames = LEVEL_UP_EFFECT_FRAMES;
        log::info!("Level up -> {}", self.level);
    }

    /// Experience progress toward the next level, 0..=1
    pub fn exp_progress(&self) -> f32 {
        if self.level >= MAX_LEVEL {
            return 1.0;
        }
        let current = PLAYER_LEVELS[(self.level - 1) as usize].exp_required;
        let next = PLAYER_LEVELS[self.level as usize].exp_required;
        (self.exp.saturating_sub(current)) as f32 / (next - current) as f32
    }

    /// Advance one frame: movement, bounds clamp, timed-state expiry
    pub fn update(&mut self, now_ms: f64, playfield_width: f32, playfield_height: f32) {
        if self.input.up {
            self.pos.y -= self.speed;
        }
        if self.input.down {
            self.pos.y += self.speed;
        }
        if self.input.left {
            self.pos.x -= self.speed;
        }
        if self.input.right {
            self.pos.x += self.speed;
        }

        let half_w = self.width / 2.0;
        let half_h = self.height / 2.0;
        self.pos.x = self.pos.x.clamp(half_w, playfield_width - half_w);
        self.pos.y = self.pos.y.clamp(half_h, playfield_height - half_h);

        if self.invincible && now_ms > self.invincible_until {
            self.invincible = false;
        }
        if self.shield && now_ms > self.shield_until {
            self.shield = false;
        }
        if self.score_multiplier > 1 && now_ms > self.multiplier_until {
            self.score_multiplier = 1;
        }

        self.engine_phase += 0.2;
        self.level_up_frames = self.level_up_frames.saturating_sub(1);
    }

    /// Fire if the fire intent or auto-fire is set. Homing weapons lock the
    /// nearest live enemy (first found wins ties). The level damage
    /// multiplier is applied to the emitted bullets.
    pub fn shoot(&mut self, now_ms: f64, enemies: &EnemyPool) -> Vec<Bullet> {
        if !self.input.fire && !self.auto_fire {
            return Vec::new();
        }

        let target = if self.weapon.homing {
            let mut nearest: Option<(u32, f32)> = None;
            for enemy in &enemies.enemies {
                let d = distance(self.pos.x, self.pos.y, enemy.pos.x, enemy.pos.y);
                if nearest.is_none_or(|(_, best)| d < best) {
                    nearest = Some((enemy.id, d));
                }
            }
            nearest.map(|(id, _)| id)
        } else {
            None
        };

        let muzzle = self.pos - Vec2::new(0.0, self.height / 2.0);
        let mut bullets = self.weapon.fire(muzzle, now_ms, target);
        for bullet in &mut bullets {
            bullet.damage *= self.damage_multiplier;
            bullet.color = self.ship_color;
        }
        bullets
    }

    /// Apply damage. Invincibility and shields absorb the hit and return
    /// false; an absorbed shield hit costs 1000 ms of remaining shield time.
    /// An applied hit opens the invincibility window and may set `dead`.
    pub fn take_damage(&mut self, amount: f32, now_ms: f64) -> bool {
        if self.invincible || self.shield {
            if self.shield {
                self.shield_until -= SHIELD_HIT_PENALTY_MS;
            }
            return false;
        }

        self.health -= amount;
        self.invincible = true;
        self.invincible_until = now_ms + INVINCIBLE_MS;

        if self.health <= 0.0 {
            self.health = 0.0;
            self.dead = true;
        }
        true
    }

    pub fn heal(&mut self, amount: f32) {
        self.health = (self.health + amount).min(self.max_health);
    }

    pub fn set_weapon(&mut self, kind: WeaponKind) {
        self.weapon.set_kind(kind);
    }

    pub fn activate_shield(&mut self, duration_ms: f64, now_ms: f64) {
        self.shield = true;
        self.shield_until = now_ms + duration_ms;
    }

    pub fn activate_score_multiplier(&mut self, multiplier: u32, duration_ms: f64, now_ms: f64) {
        self.score_multiplier = multiplier;
        self.multiplier_until = now_ms + duration_ms;
    }

    pub fn toggle_auto_fire(&mut self) -> bool {
        self.auto_fire = !self.auto_fire;
        self.auto_fire
    }

    /// Hitbox is inset a few pixels from the drawn hull for forgiveness
    pub fn hitbox(&self) -> Hitbox {
        Hitbox::new(
            self.pos.x - self.width / 2.0 + 5.0,
            self.pos.y - self.height / 2.0 + 5.0,
            self.width - 10.0,
            self.height - 10.0,
        )
    }

    /// Shift every stored absolute timestamp forward by the paused duration
    pub fn rebase_timers(&mut self, delta_ms: f64) {
        self.invincible_until += delta_ms;
        self.shield_until += delta_ms;
        self.multiplier_until += delta_ms;
        self.weapon.last_fire_ms += delta_ms;
    }
}
