//! Per-frame simulation step
//!
//! `tick` is the only way the outside world advances the game. It is called
//! once per display frame with the current input snapshot and the absolute
//! game clock in milliseconds. Entity motion is expressed per frame; all
//! cooldowns and expiries compare against the clock.

use rand::Rng;

use crate::consts::{CONTACT_DAMAGE, PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH};
use crate::tuning::{PowerupEffect, powerup_archetype};

use super::player::InputState;
use super::state::{GameEvent, GamePhase, GameState};

/// One frame of input: held movement/fire state plus edge-triggered actions.
/// Edges must be reported for exactly one tick by the input collaborator.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    pub movement: InputState,
    /// Toggle pause (edge)
    pub pause: bool,
    /// Toggle auto-fire (edge)
    pub toggle_auto_fire: bool,
    /// Start a new run from the menu or game-over screen (edge)
    pub start: bool,
    /// Abandon the run (edge)
    pub quit: bool,
}

/// Advance the simulation one frame
pub fn tick(state: &mut GameState, input: &TickInput, now_ms: f64) {
    match state.phase {
        GamePhase::Menu | GamePhase::GameOver => {
            if input.start {
                state.start(now_ms);
            }
            return;
        }
        GamePhase::Paused => {
            if input.pause {
                state.resume(now_ms);
            } else if input.quit {
                state.quit_to_menu();
            }
            return;
        }
        GamePhase::Playing => {
            if input.pause {
                state.pause(now_ms);
                return;
            }
            if input.quit {
                state.quit_to_menu();
                return;
            }
        }
    }

    if input.toggle_auto_fire {
        state.player.toggle_auto_fire();
    }
    state.player.input = input.movement;

    let scaling = state.scaling;
    if state
        .wave
        .update(now_ms, PLAYFIELD_WIDTH, &mut state.enemies, &scaling, &mut state.rng)
    {
        state.events.push(GameEvent::WaveStart(state.wave.current_wave));
    }

    state
        .player
        .update(now_ms, PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT);
    if state.rng.random::<f32>() < 0.5 {
        let exhaust = state.player.pos + glam::Vec2::new(0.0, state.player.height / 2.0);
        state.particles.engine_trail(exhaust, "#ffaa00", &mut state.rng);
    }

    let fired = state.player.shoot(now_ms, &state.enemies);
    if !fired.is_empty() {
        state.events.push(GameEvent::Shoot(state.player.weapon.kind));
        state.player_bullets.extend(fired);
    }

    state.enemies.update(PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT);
    state.enemy_bullets.extend(state.enemies.shoot_all(now_ms));

    advance_bullets(state);
    state.powerups.update(PLAYFIELD_HEIGHT);
    state.particles.update();

    resolve_collisions(state, now_ms);

    if state.player.dead {
        state.particles.explosion(
            state.player.pos,
            state.player.ship_color,
            30,
            &mut state.rng,
        );
        state.events.push(GameEvent::PlayerDestroyed);
        state.phase = GamePhase::GameOver;
        log::info!("Game over at {} points, wave {}", state.score, state.wave.current_wave);
    }
}

/// Move every projectile and cull the ones that left the playfield. Homing
/// targets are resolved by id here; a lost target is cleared so the bullet
/// flies straight on its last heading from then on.
fn advance_bullets(state: &mut GameState) {
    for bullet in &mut state.player_bullets {
        let target_pos = bullet
            .target
            .and_then(|id| state.enemies.get(id))
            .map(|e| e.pos);
        if target_pos.is_none() {
            bullet.target = None;
        }
        bullet.update(target_pos);
    }
    state
        .player_bullets
        .retain(|b| !b.is_out_of_bounds(PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT));

    for bullet in &mut state.enemy_bullets {
        bullet.update(None);
    }
    state
        .enemy_bullets
        .retain(|b| !b.is_out_of_bounds(PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT));
}

/// Resolve this frame's overlaps in a fixed order: player bullets against
/// enemies, enemy bullets against the player, enemy hulls against the player,
/// then pickups.
fn resolve_collisions(state: &mut GameState, now_ms: f64) {
    // Player bullets vs enemies. Bullets and enemies are checked in storage
    // order; a non-piercing bullet stops at its first hit.
    let mut bullets = std::mem::take(&mut state.player_bullets);
    bullets.retain_mut(|bullet| {
        let hitbox = bullet.hitbox();
        for enemy in &mut state.enemies.enemies {
            if enemy.dead || !hitbox.intersects(&enemy.hitbox()) {
                continue;
            }

            let killed = enemy.take_damage(bullet.damage);
            state.events.push(GameEvent::EnemyHit);
            state
                .particles
                .hit_effect(bullet.pos, bullet.color, &mut state.rng);

            if killed {
                state.score += enemy.score * state.player.score_multiplier;
                state
                    .particles
                    .explosion(enemy.pos, enemy.color, 15, &mut state.rng);
                state.powerups.spawn_random(enemy.pos, &mut state.rng);
                state.events.push(GameEvent::EnemyDestroyed);
                if state.player.add_exp(enemy.exp_value) {
                    state.events.push(GameEvent::LevelUp(state.player.level));
                }
            }

            if !bullet.piercing {
                return false;
            }
        }
        true
    });
    state.player_bullets = bullets;
    state.enemies.enemies.retain(|e| !e.dead);

    // Enemy bullets vs the player. A connecting bullet is always removed,
    // even when invincibility or a shield absorbed the hit.
    let player_hitbox = state.player.hitbox();
    let mut enemy_bullets = std::mem::take(&mut state.enemy_bullets);
    enemy_bullets.retain(|bullet| {
        if !bullet.hitbox().intersects(&player_hitbox) {
            return true;
        }
        if state.player.take_damage(bullet.damage, now_ms) {
            state.events.push(GameEvent::PlayerHit);
            state
                .particles
                .hit_effect(bullet.pos, "#ff3366", &mut state.rng);
        } else if state.player.shield {
            state.events.push(GameEvent::ShieldAbsorb);
        }
        false
    });
    state.enemy_bullets = enemy_bullets;

    // Enemy hulls vs the player: flat contact damage per frame of overlap.
    // The enemy is unharmed by the collision.
    let player_hitbox = state.player.hitbox();
    for enemy in &state.enemies.enemies {
        if enemy.hitbox().intersects(&player_hitbox) {
            if state.player.take_damage(CONTACT_DAMAGE, now_ms) {
                state.events.push(GameEvent::PlayerHit);
            } else if state.player.shield {
                state.events.push(GameEvent::ShieldAbsorb);
            }
        }
    }

    // Pickups: at most one collected per frame
    if let Some(kind) = state.powerups.collect(&state.player.hitbox()) {
        match powerup_archetype(kind).effect {
            PowerupEffect::Weapon(weapon) => state.player.set_weapon(weapon),
            PowerupEffect::Heal(amount) => state.player.heal(amount),
            PowerupEffect::Shield { duration_ms } => {
                state.player.activate_shield(duration_ms, now_ms)
            }
            PowerupEffect::ScoreMultiplier {
                multiplier,
                duration_ms,
            } => state
                .player
                .activate_score_multiplier(multiplier, duration_ms, now_ms),
        }
        state.events.push(GameEvent::PowerupCollected(kind));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Difficulty;
    use crate::sim::enemy::MovePattern;
    use crate::tuning::{EnemyKind, PowerupKind, WeaponKind};
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const FRAME_MS: f64 = 1000.0 / 60.0;

    fn started_state() -> GameState {
        let mut state = GameState::new(Difficulty::Normal, 7);
        state.start(1000.0);
        state.drain_events();
        state
    }

    fn run_frames(state: &mut GameState, input: &TickInput, start_ms: f64, frames: u32) -> (f64, Vec<GameEvent>) {
        let mut now = start_ms;
        let mut events = Vec::new();
        for _ in 0..frames {
            now += FRAME_MS;
            tick(state, input, now);
            events.extend(state.drain_events());
        }
        (now, events)
    }

    #[test]
    fn test_start_from_menu() {
        let mut state = GameState::new(Difficulty::Normal, 1);
        tick(&mut state, &TickInput::default(), 1000.0);
        assert_eq!(state.phase, GamePhase::Menu);

        let input = TickInput { start: true, ..Default::default() };
        tick(&mut state, &input, 1000.0);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.drain_events().contains(&GameEvent::WaveStart(1)));
    }

    #[test]
    fn test_bullet_kills_scout_awards_score_and_exp() {
        let mut state = started_state();
        let scaling = state.scaling;
        let mut rng = Pcg32::seed_from_u64(2);
        // Scout directly above the player, well inside the first spawn window
        state.enemies.spawn(
            Vec2::new(state.player.pos.x, 300.0),
            EnemyKind::Scout,
            &scaling,
            &mut rng,
        );
        state.enemies.enemies[0].move_pattern = MovePattern::Straight;

        let input = TickInput {
            movement: InputState { fire: true, ..Default::default() },
            ..Default::default()
        };
        let (_, events) = run_frames(&mut state, &input, 1000.0, 60);

        assert!(events.contains(&GameEvent::EnemyDestroyed));
        assert_eq!(state.score, 100);
        assert_eq!(state.player.exp, 50);
    }

    #[test]
    fn test_pause_freezes_and_resume_rebases() {
        let mut state = started_state();
        let input = TickInput {
            movement: InputState { fire: true, ..Default::default() },
            ..Default::default()
        };
        // Fire once to stamp the weapon cooldown
        tick(&mut state, &input, 1000.0);
        assert_eq!(state.player.weapon.last_fire_ms, 1000.0);
        let enemies_before = state.enemies.len();

        let pause = TickInput { pause: true, ..Default::default() };
        tick(&mut state, &pause, 1100.0);
        assert_eq!(state.phase, GamePhase::Paused);

        // A long paused stretch: nothing moves, nothing spawns
        let (_, _) = run_frames(&mut state, &TickInput::default(), 1100.0, 300);
        assert_eq!(state.enemies.len(), enemies_before);
        assert_eq!(state.player.weapon.last_fire_ms, 1000.0);

        tick(&mut state, &pause, 11_100.0);
        assert_eq!(state.phase, GamePhase::Playing);
        // Cooldown stamp shifted by the 10s pause
        assert_eq!(state.player.weapon.last_fire_ms, 11_000.0);
    }

    #[test]
    fn test_contact_damage_once_per_invincibility_window() {
        let mut state = started_state();
        let scaling = state.scaling;
        let mut rng = Pcg32::seed_from_u64(3);
        // Park a heavy on top of the player
        state.enemies.spawn(state.player.pos, EnemyKind::Heavy, &scaling, &mut rng);
        state.enemies.enemies[0].speed = 0.0;
        state.enemies.enemies[0].move_pattern = MovePattern::Straight;
        state.enemies.enemies[0].weapon.last_fire_ms = 1_000_000.0;

        let (_, events) = run_frames(&mut state, &TickInput::default(), 1000.0, 10);
        let hits = events.iter().filter(|e| **e == GameEvent::PlayerHit).count();
        assert_eq!(hits, 1);
        assert_eq!(state.player.health, state.player.max_health - CONTACT_DAMAGE);
    }

    #[test]
    fn test_powerup_collected_applies_effect() {
        let mut state = started_state();
        state.player.health = 50.0;
        state
            .powerups
            .powerups
            .push(crate::sim::powerup::Powerup::new(
                state.player.pos,
                PowerupKind::Health,
            ));

        let (_, events) = run_frames(&mut state, &TickInput::default(), 1000.0, 1);
        assert!(events.contains(&GameEvent::PowerupCollected(PowerupKind::Health)));
        assert_eq!(state.player.health, 80.0);
        assert!(state.powerups.is_empty());
    }

    #[test]
    fn test_weapon_powerup_swaps_weapon() {
        let mut state = started_state();
        state
            .powerups
            .powerups
            .push(crate::sim::powerup::Powerup::new(
                state.player.pos,
                PowerupKind::WeaponLaser,
            ));
        run_frames(&mut state, &TickInput::default(), 1000.0, 1);
        assert_eq!(state.player.weapon.kind, WeaponKind::Laser);
    }

    #[test]
    fn test_piercing_bullet_hits_multiple_enemies() {
        let mut state = started_state();
        state.player.set_weapon(WeaponKind::Laser);
        let scaling = state.scaling;
        let mut rng = Pcg32::seed_from_u64(4);
        // Two fighters stacked in the firing line
        for y in [300.0, 360.0] {
            let id = state.enemies.spawn(
                Vec2::new(state.player.pos.x, y),
                EnemyKind::Fighter,
                &scaling,
                &mut rng,
            );
            let enemy = state.enemies.enemies.iter_mut().find(|e| e.id == id).unwrap();
            enemy.move_pattern = MovePattern::Straight;
            enemy.speed = 0.0;
            // Keep them from firing back during the test
            enemy.weapon.last_fire_ms = 1_000_000.0;
        }

        let input = TickInput {
            movement: InputState { fire: true, ..Default::default() },
            ..Default::default()
        };
        let (_, events) = run_frames(&mut state, &input, 1000.0, 90);
        let kills = events.iter().filter(|e| **e == GameEvent::EnemyDestroyed).count();
        assert_eq!(kills, 2);
    }

    #[test]
    fn test_game_over_on_player_death() {
        let mut state = started_state();
        state.player.health = 1.0;
        let scaling = state.scaling;
        let mut rng = Pcg32::seed_from_u64(5);
        state.enemies.spawn(state.player.pos, EnemyKind::Scout, &scaling, &mut rng);
        state.enemies.enemies[0].speed = 0.0;
        state.enemies.enemies[0].move_pattern = MovePattern::Straight;

        let (_, events) = run_frames(&mut state, &TickInput::default(), 1000.0, 5);
        assert!(events.contains(&GameEvent::PlayerDestroyed));
        assert_eq!(state.phase, GamePhase::GameOver);

        // Restart from game over works
        let input = TickInput { start: true, ..Default::default() };
        tick(&mut state, &input, 50_000.0);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_quit_returns_to_menu() {
        let mut state = started_state();
        let input = TickInput { quit: true, ..Default::default() };
        tick(&mut state, &input, 2000.0);
        assert_eq!(state.phase, GamePhase::Menu);
    }

    #[test]
    fn test_auto_fire_toggle_shoots_without_intent() {
        let mut state = started_state();
        let toggle = TickInput { toggle_auto_fire: true, ..Default::default() };
        tick(&mut state, &toggle, 1500.0);
        assert!(state.player.auto_fire);
        state.drain_events();

        // With auto-fire on, shots keep coming with no fire intent held
        let (_, events) = run_frames(&mut state, &TickInput::default(), 1500.0, 20);
        assert!(events.iter().any(|e| matches!(e, GameEvent::Shoot(_))));
        assert!(!state.player_bullets.is_empty());
    }

    #[test]
    fn test_kill_score_respects_multiplier() {
        let mut state = started_state();
        state.player.activate_score_multiplier(2, 60_000.0, 1000.0);
        let scaling = state.scaling;
        let mut rng = Pcg32::seed_from_u64(6);
        state.enemies.spawn(
            Vec2::new(state.player.pos.x, 300.0),
            EnemyKind::Scout,
            &scaling,
            &mut rng,
        );
        state.enemies.enemies[0].move_pattern = MovePattern::Straight;

        let input = TickInput {
            movement: InputState { fire: true, ..Default::default() },
            ..Default::default()
        };
        let (_, events) = run_frames(&mut state, &input, 1000.0, 60);
        assert!(events.contains(&GameEvent::EnemyDestroyed));
        assert_eq!(state.score, 200);
        // Experience is not multiplied
        assert_eq!(state.player.exp, 50);
    }

    #[test]
    fn test_wave_progression_reaches_boss() {
        let mut state = started_state();
        // Make the player unkillable and disarm its weapon so waves drain
        // purely by enemies flying off the bottom.
        state.player.pos = Vec2::new(40.0, 560.0);

        let mut now = 1000.0;
        let input = TickInput::default();
        let mut saw_boss = false;
        // Waves 1-4 drain by scroll-through; wave 5 must be the boss
        for _ in 0..200_000 {
            now += FRAME_MS;
            state.player.health = state.player.max_health;
            state.player.dead = false;
            tick(&mut state, &input, now);
            state.drain_events();
            if state.wave.current_wave == 5 {
                if state.enemies.has_boss() {
                    saw_boss = true;
                }
                if saw_boss {
                    break;
                }
            }
            assert!(state.wave.current_wave <= 5);
        }
        assert!(saw_boss);
        assert!(state.wave.boss_wave);
    }
}
