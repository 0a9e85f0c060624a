//! Top-level game state container
//!
//! Owns every entity pool plus the run-scoped scalars (score, phase, clock
//! bookkeeping). Systems never reach for globals; everything routes through
//! this struct so a whole run can be reset or cloned in one place.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::enemy::EnemyPool;
use super::particle::ParticlePool;
use super::player::Player;
use super::powerup::PowerupPool;
use super::wave::WaveScheduler;
use super::weapon::Bullet;
use crate::consts::{PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH};
use crate::settings::Difficulty;
use crate::tuning::{self, DifficultyScaling, PowerupKind, WeaponKind};

/// Coarse run phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Title screen; no run in progress
    Menu,
    /// Live run
    Playing,
    /// Run frozen; the clock keeps advancing and timers are rebased on resume
    Paused,
    /// Player destroyed; final score on display
    GameOver,
}

/// Things that happened this tick which the shell may want to sound or flash.
/// Drained by the caller after each tick; the simulation never inspects them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    Shoot(WeaponKind),
    EnemyHit,
    EnemyDestroyed,
    PlayerHit,
    ShieldAbsorb,
    PlayerDestroyed,
    PowerupCollected(PowerupKind),
    WaveStart(u32),
    LevelUp(u32),
}

/// Complete simulation state for one session
#[derive(Debug, Clone)]
pub struct GameState {
    pub phase: GamePhase,
    pub score: u32,
    pub difficulty: Difficulty,
    pub scaling: DifficultyScaling,

    pub player: Player,
    pub enemies: EnemyPool,
    pub player_bullets: Vec<Bullet>,
    pub enemy_bullets: Vec<Bullet>,
    pub powerups: PowerupPool,
    pub particles: ParticlePool,
    pub wave: WaveScheduler,

    pub events: Vec<GameEvent>,
    pub rng: Pcg32,

    /// Game-clock timestamp at which the current pause began
    pub(super) paused_at: f64,
}

impl GameState {
    pub fn new(difficulty: Difficulty, seed: u64) -> Self {
        Self {
            phase: GamePhase::Menu,
            score: 0,
            difficulty,
            scaling: tuning::difficulty_scaling(difficulty),
            player: Self::fresh_player(),
            enemies: EnemyPool::default(),
            player_bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            powerups: PowerupPool::default(),
            particles: ParticlePool::default(),
            wave: WaveScheduler::default(),
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            paused_at: 0.0,
        }
    }

    fn fresh_player() -> Player {
        Player::new(Vec2::new(
            PLAYFIELD_WIDTH / 2.0,
            PLAYFIELD_HEIGHT - 80.0,
        ))
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        self.scaling = tuning::difficulty_scaling(difficulty);
    }

    /// Begin a fresh run: everything from any previous run is discarded in
    /// the same call, so no stale entity can leak into the new session.
    pub fn start(&mut self, now_ms: f64) {
        self.score = 0;
        self.player = Self::fresh_player();
        self.enemies.clear();
        self.player_bullets.clear();
        self.enemy_bullets.clear();
        self.powerups.clear();
        self.particles.clear();
        self.events.clear();
        self.wave.start(now_ms, &self.scaling);
        self.events.push(GameEvent::WaveStart(1));
        self.phase = GamePhase::Playing;
        log::info!("Run started ({:?})", self.difficulty);
    }

    /// Abandon the run and return to the menu. Same atomic teardown as
    /// `start`, minus beginning a new wave.
    pub fn quit_to_menu(&mut self) {
        self.enemies.clear();
        self.player_bullets.clear();
        self.enemy_bullets.clear();
        self.powerups.clear();
        self.particles.clear();
        self.events.clear();
        self.wave = WaveScheduler::default();
        self.phase = GamePhase::Menu;
    }

    pub fn pause(&mut self, now_ms: f64) {
        if self.phase == GamePhase::Playing {
            self.phase = GamePhase::Paused;
            self.paused_at = now_ms;
        }
    }

    /// Resume from pause, shifting every stored absolute timestamp forward by
    /// the paused duration. Timer rebasing happens only here so no owner of a
    /// timestamp can be missed.
    pub fn resume(&mut self, now_ms: f64) {
        if self.phase != GamePhase::Paused {
            return;
        }
        let delta = now_ms - self.paused_at;
        self.wave.rebase_timers(delta);
        self.player.rebase_timers(delta);
        for enemy in &mut self.enemies.enemies {
            enemy.weapon.last_fire_ms += delta;
        }
        self.phase = GamePhase::Playing;
        log::debug!("Resumed after {delta:.0}ms pause");
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::EnemyKind;
    use rand::Rng;

    #[test]
    fn test_start_discards_previous_run() {
        let mut state = GameState::new(Difficulty::Normal, 1);
        state.start(0.0);
        let scaling = state.scaling;
        let mut rng = Pcg32::seed_from_u64(2);
        state
            .enemies
            .spawn(Vec2::new(100.0, 100.0), EnemyKind::Heavy, &scaling, &mut rng);
        state.score = 5000;
        state.player.health = 10.0;

        state.start(100.0);
        assert_eq!(state.score, 0);
        assert!(state.enemies.is_empty());
        assert_eq!(state.player.health, state.player.max_health);
        assert_eq!(state.wave.current_wave, 1);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_quit_returns_to_menu_clean() {
        let mut state = GameState::new(Difficulty::Normal, 1);
        state.start(0.0);
        state.quit_to_menu();
        assert_eq!(state.phase, GamePhase::Menu);
        assert!(state.enemies.is_empty());
        assert!(state.player_bullets.is_empty());
        assert_eq!(state.wave.current_wave, 0);
    }

    #[test]
    fn test_pause_only_from_playing() {
        let mut state = GameState::new(Difficulty::Normal, 1);
        state.pause(100.0); // still in menu
        assert_eq!(state.phase, GamePhase::Menu);

        state.start(0.0);
        state.pause(100.0);
        assert_eq!(state.phase, GamePhase::Paused);

        // Resume rebases and returns to playing
        state.resume(600.0);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_resume_rebases_enemy_weapons() {
        let mut state = GameState::new(Difficulty::Normal, 1);
        state.start(0.0);
        let scaling = state.scaling;
        let mut rng = Pcg32::seed_from_u64(3);
        state
            .enemies
            .spawn(Vec2::new(100.0, 100.0), EnemyKind::Scout, &scaling, &mut rng);
        state.enemies.enemies[0].weapon.last_fire_ms = 1000.0;

        state.pause(2000.0);
        state.resume(7000.0);
        assert_eq!(state.enemies.enemies[0].weapon.last_fire_ms, 6000.0);
    }

    #[test]
    fn test_seeded_rng_is_deterministic() {
        let mut a = GameState::new(Difficulty::Normal, 42);
        let mut b = GameState::new(Difficulty::Normal, 42);
        for _ in 0..10 {
            assert_eq!(a.rng.random::<u32>(), b.rng.random::<u32>());
        }
    }
}
