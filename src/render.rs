//! Canvas 2D renderer
//!
//! Draws the live simulation state in a neon wireframe style: stroked hulls
//! with a glow, additive-looking particles, and a parallax starfield. The
//! renderer is stateless with respect to gameplay; it only reads `GameState`.

use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use web_sys::CanvasRenderingContext2d;

use crate::consts::{PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH};
use crate::map_range;
use crate::settings::Settings;
use crate::sim::{Enemy, GamePhase, GameState, ParticleShape, Powerup};
use crate::tuning::{EnemyKind, powerup_archetype};

const STAR_COUNT: usize = 80;

struct Star {
    x: f32,
    y: f32,
    speed: f32,
    size: f32,
}

pub struct Renderer {
    ctx: CanvasRenderingContext2d,
    stars: Vec<Star>,
}

impl Renderer {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        let mut rng = Pcg32::seed_from_u64(0xCAFE);
        let stars = (0..STAR_COUNT)
            .map(|_| Star {
                x: rng.random_range(0.0..PLAYFIELD_WIDTH),
                y: rng.random_range(0.0..PLAYFIELD_HEIGHT),
                speed: rng.random_range(0.5..3.0),
                size: rng.random_range(0.5..2.0),
            })
            .collect();
        Self { ctx, stars }
    }

    /// Draw one frame
    pub fn draw(&mut self, state: &GameState, settings: &Settings) {
        self.clear();

        if settings.starfield {
            let scrolling = state.phase == GamePhase::Playing;
            self.draw_starfield(scrolling);
        }

        if state.phase == GamePhase::Menu {
            return;
        }

        if settings.particles {
            self.draw_particles(state);
        }
        for powerup in &state.powerups.powerups {
            self.draw_powerup(powerup);
        }
        for bullet in state.player_bullets.iter().chain(&state.enemy_bullets) {
            self.draw_bullet(bullet);
        }
        for enemy in &state.enemies.enemies {
            self.draw_enemy(enemy);
        }
        if !state.player.dead {
            self.draw_player(state);
        }
    }

    fn clear(&self) {
        self.ctx.set_shadow_blur(0.0);
        self.ctx.set_global_alpha(1.0);
        self.ctx.set_fill_style_str("#000011");
        self.ctx
            .fill_rect(0.0, 0.0, PLAYFIELD_WIDTH as f64, PLAYFIELD_HEIGHT as f64);
    }

    fn draw_starfield(&mut self, scrolling: bool) {
        self.ctx.set_fill_style_str("#ffffff");
        for star in &mut self.stars {
            if scrolling {
                star.y += star.speed;
                if star.y > PLAYFIELD_HEIGHT {
                    star.y -= PLAYFIELD_HEIGHT;
                }
            }
            // Faster stars are brighter (closer)
            let alpha = map_range(star.speed, 0.5, 3.0, 0.25, 1.0);
            self.ctx.set_global_alpha(alpha as f64);
            self.ctx.fill_rect(
                star.x as f64,
                star.y as f64,
                star.size as f64,
                star.size as f64,
            );
        }
        self.ctx.set_global_alpha(1.0);
    }

    fn draw_player(&self, state: &GameState) {
        let player = &state.player;
        self.ctx.save();
        let _ = self.ctx.translate(player.pos.x as f64, player.pos.y as f64);
        let _ = self
            .ctx
            .scale(player.size_scale as f64, player.size_scale as f64);

        // Invincibility flicker
        if player.invincible && (player.engine_phase * 5.0) as u32 % 2 == 0 {
            self.ctx.set_global_alpha(0.5);
        }

        // Level-up halo
        if player.level_up_frames > 0 {
            self.ctx.set_stroke_style_str("#ffff00");
            self.ctx.set_shadow_color("#ffff00");
            self.ctx
                .set_shadow_blur(20.0 + player.level_up_frames as f64 / 2.0);
            self.ctx.set_line_width(3.0);
        } else {
            self.ctx.set_stroke_style_str(player.ship_color);
            self.ctx.set_shadow_color(player.ship_color);
            self.ctx.set_shadow_blur(10.0);
            self.ctx.set_line_width(2.0);
        }

        // Hull grows extra fins with level tier
        let w = crate::consts::PLAYER_BASE_WIDTH as f64;
        let h = crate::consts::PLAYER_BASE_HEIGHT as f64;
        self.ctx.begin_path();
        self.ctx.move_to(0.0, -h / 2.0);
        self.ctx.line_to(-w / 2.0, h / 2.0);
        self.ctx.line_to(0.0, h / 2.0 - 10.0);
        self.ctx.line_to(w / 2.0, h / 2.0);
        self.ctx.close_path();
        self.ctx.stroke();

        if player.level >= 3 {
            // Side cannons
            self.ctx.begin_path();
            self.ctx.move_to(-w / 2.0 - 6.0, h / 4.0);
            self.ctx.line_to(-w / 2.0 - 6.0, -h / 6.0);
            self.ctx.move_to(w / 2.0 + 6.0, h / 4.0);
            self.ctx.line_to(w / 2.0 + 6.0, -h / 6.0);
            self.ctx.stroke();
        }
        if player.level >= 5 {
            // Swept wings
            self.ctx.begin_path();
            self.ctx.move_to(-w / 2.0, h / 4.0);
            self.ctx.line_to(-w, h / 2.0);
            self.ctx.move_to(w / 2.0, h / 4.0);
            self.ctx.line_to(w, h / 2.0);
            self.ctx.stroke();
        }
        if player.level >= 7 {
            // Canopy
            self.ctx.begin_path();
            let _ = self.ctx.arc(0.0, 0.0, 6.0, 0.0, std::f64::consts::TAU);
            self.ctx.stroke();
        }
        if player.level >= 9 {
            // Outer halo
            self.ctx.begin_path();
            let _ = self
                .ctx
                .arc(0.0, 0.0, w * 0.9, 0.0, std::f64::consts::TAU);
            self.ctx.stroke();
        }

        // Engine glow pulses with the flight phase
        let glow = 0.5 + (player.engine_phase.sin() * 0.3) as f64;
        self.ctx.set_global_alpha(glow);
        self.ctx.set_fill_style_str("#ffaa00");
        self.ctx.begin_path();
        self.ctx.move_to(-5.0, h / 2.0);
        self.ctx.line_to(0.0, h / 2.0 + 10.0);
        self.ctx.line_to(5.0, h / 2.0);
        self.ctx.close_path();
        self.ctx.fill();

        self.ctx.restore();

        if player.shield {
            self.ctx.save();
            self.ctx.set_stroke_style_str("#9966ff");
            self.ctx.set_shadow_color("#9966ff");
            self.ctx.set_shadow_blur(15.0);
            self.ctx.set_line_width(2.0);
            self.ctx.set_global_alpha(0.7);
            self.ctx.begin_path();
            let _ = self.ctx.arc(
                player.pos.x as f64,
                player.pos.y as f64,
                (player.width * 0.9) as f64,
                0.0,
                std::f64::consts::TAU,
            );
            self.ctx.stroke();
            self.ctx.restore();
        }
    }

    fn draw_enemy(&self, enemy: &Enemy) {
        self.ctx.save();
        let _ = self.ctx.translate(enemy.pos.x as f64, enemy.pos.y as f64);

        self.ctx.set_stroke_style_str(enemy.color);
        self.ctx.set_shadow_color(enemy.color);
        self.ctx.set_shadow_blur(8.0);
        self.ctx.set_line_width(2.0);

        let w = enemy.width as f64;
        let h = enemy.height as f64;
        match enemy.kind {
            EnemyKind::Scout => {
                // Small inverted dart
                self.ctx.begin_path();
                self.ctx.move_to(0.0, h / 2.0);
                self.ctx.line_to(-w / 2.0, -h / 2.0);
                self.ctx.line_to(0.0, -h / 2.0 + 10.0);
                self.ctx.line_to(w / 2.0, -h / 2.0);
                self.ctx.close_path();
                self.ctx.stroke();
            }
            EnemyKind::Fighter => {
                // Diamond hull
                self.ctx.begin_path();
                self.ctx.move_to(0.0, h / 2.0);
                self.ctx.line_to(-w / 2.0, 0.0);
                self.ctx.line_to(0.0, -h / 2.0);
                self.ctx.line_to(w / 2.0, 0.0);
                self.ctx.close_path();
                self.ctx.stroke();
            }
            EnemyKind::Heavy => {
                // Broad hexagon
                self.ctx.begin_path();
                self.ctx.move_to(-w / 4.0, h / 2.0);
                self.ctx.line_to(-w / 2.0, 0.0);
                self.ctx.line_to(-w / 4.0, -h / 2.0);
                self.ctx.line_to(w / 4.0, -h / 2.0);
                self.ctx.line_to(w / 2.0, 0.0);
                self.ctx.line_to(w / 4.0, h / 2.0);
                self.ctx.close_path();
                self.ctx.stroke();
            }
            EnemyKind::Boss => {
                // Wide fortress with a core
                self.ctx.begin_path();
                self.ctx.move_to(-w / 2.0, -h / 4.0);
                self.ctx.line_to(-w / 4.0, -h / 2.0);
                self.ctx.line_to(w / 4.0, -h / 2.0);
                self.ctx.line_to(w / 2.0, -h / 4.0);
                self.ctx.line_to(w / 2.0, h / 4.0);
                self.ctx.line_to(0.0, h / 2.0);
                self.ctx.line_to(-w / 2.0, h / 4.0);
                self.ctx.close_path();
                self.ctx.stroke();
                self.ctx.begin_path();
                let _ = self.ctx.arc(0.0, 0.0, w / 6.0, 0.0, std::f64::consts::TAU);
                self.ctx.stroke();
            }
        }

        // Health bar for the tougher hulls once damaged
        if matches!(enemy.kind, EnemyKind::Heavy | EnemyKind::Boss)
            && enemy.health < enemy.max_health
        {
            self.ctx.set_shadow_blur(0.0);
            self.ctx.set_fill_style_str("#330000");
            self.ctx.fill_rect(-w / 2.0, -h / 2.0 - 10.0, w, 4.0);
            self.ctx.set_fill_style_str("#ff3333");
            self.ctx.fill_rect(
                -w / 2.0,
                -h / 2.0 - 10.0,
                w * enemy.health_ratio() as f64,
                4.0,
            );
        }

        self.ctx.restore();
    }

    fn draw_bullet(&self, bullet: &crate::sim::Bullet) {
        self.ctx.save();
        self.ctx.set_fill_style_str(bullet.color);
        self.ctx.set_shadow_color(bullet.color);
        self.ctx.set_shadow_blur(6.0);
        self.ctx.fill_rect(
            (bullet.pos.x - bullet.width / 2.0) as f64,
            (bullet.pos.y - bullet.height / 2.0) as f64,
            bullet.width as f64,
            bullet.height as f64,
        );
        self.ctx.restore();
    }

    fn draw_powerup(&self, powerup: &Powerup) {
        let archetype = powerup_archetype(powerup.kind);
        let pulse = 1.0 + powerup.pulse_phase.sin() * 0.15;
        let r = (powerup.width / 2.0 * pulse) as f64;

        self.ctx.save();
        let _ = self
            .ctx
            .translate(powerup.pos.x as f64, powerup.pos.y as f64);
        let _ = self.ctx.rotate(powerup.rotation as f64);

        self.ctx.set_stroke_style_str(archetype.color);
        self.ctx.set_shadow_color(archetype.color);
        self.ctx.set_shadow_blur(12.0);
        self.ctx.set_line_width(2.0);
        self.ctx.begin_path();
        self.ctx.move_to(0.0, -r);
        self.ctx.line_to(r, 0.0);
        self.ctx.line_to(0.0, r);
        self.ctx.line_to(-r, 0.0);
        self.ctx.close_path();
        self.ctx.stroke();

        self.ctx.restore();
    }

    fn draw_particles(&self, state: &GameState) {
        self.ctx.save();
        self.ctx.set_shadow_blur(0.0);
        for particle in &state.particles.particles {
            let alpha = (particle.life / particle.max_life).clamp(0.0, 1.0) as f64;
            self.ctx.set_global_alpha(alpha);
            match particle.shape {
                ParticleShape::Dot | ParticleShape::Spark => {
                    self.ctx.set_fill_style_str(particle.color);
                    self.ctx.fill_rect(
                        (particle.pos.x - particle.size / 2.0) as f64,
                        (particle.pos.y - particle.size / 2.0) as f64,
                        particle.size as f64,
                        particle.size as f64,
                    );
                }
                ParticleShape::Line => {
                    self.ctx.set_stroke_style_str(particle.color);
                    self.ctx.set_line_width(particle.size as f64);
                    self.ctx.begin_path();
                    self.ctx
                        .move_to(particle.pos.x as f64, particle.pos.y as f64);
                    self.ctx.line_to(
                        (particle.pos.x + particle.angle.cos() * particle.length) as f64,
                        (particle.pos.y + particle.angle.sin() * particle.length) as f64,
                    );
                    self.ctx.stroke();
                }
            }
        }
        self.ctx.restore();
    }
}
