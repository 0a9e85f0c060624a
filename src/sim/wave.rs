//! Wave scheduler state machine
//!
//! Drives spawn cadence, rest intervals, and boss cycles. All timestamps are
//! absolute game-clock values; pause is handled by rebasing them, not by
//! stopping the clock.

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;

use super::enemy::EnemyPool;
use crate::consts::{SPAWN_Y, WAVE_REST_MS};
use crate::tuning::{DifficultyScaling, EnemyKind};

/// Every 5th wave is a boss wave
const BOSS_WAVE_INTERVAL: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WavePhase {
    /// No run in progress
    Idle,
    /// Spawning and/or waiting for the field to clear
    Active,
    /// Between-wave rest
    Resting,
}

#[derive(Debug, Clone)]
pub struct WaveScheduler {
    pub phase: WavePhase,
    pub current_wave: u32,
    pub enemies_spawned: u32,
    pub enemies_per_wave: u32,
    pub spawn_interval_ms: f64,
    pub boss_wave: bool,
    wave_start_ms: f64,
    last_spawn_ms: f64,
    rest_start_ms: f64,
}

impl Default for WaveScheduler {
    fn default() -> Self {
        Self {
            phase: WavePhase::Idle,
            current_wave: 0,
            enemies_spawned: 0,
            enemies_per_wave: 0,
            spawn_interval_ms: 0.0,
            boss_wave: false,
            wave_start_ms: 0.0,
            last_spawn_ms: 0.0,
            rest_start_ms: 0.0,
        }
    }
}

impl WaveScheduler {
    /// Begin a run at wave 1
    pub fn start(&mut self, now_ms: f64, scaling: &DifficultyScaling) {
        *self = Self::default();
        self.start_wave(1, now_ms, scaling);
    }

    fn start_wave(&mut self, wave: u32, now_ms: f64, scaling: &DifficultyScaling) {
        self.current_wave = wave;
        self.enemies_spawned = 0;
        self.wave_start_ms = now_ms;
        self.last_spawn_ms = now_ms;
        self.phase = WavePhase::Active;
        self.boss_wave = wave % BOSS_WAVE_INTERVAL == 0;

        if self.boss_wave {
            self.enemies_per_wave = 1;
            self.spawn_interval_ms = 0.0;
        } else {
            self.enemies_per_wave = (5 + (wave as f32 * 1.5) as u32).min(20);
            self.spawn_interval_ms =
                (2000.0 - wave as f64 * 100.0).max(800.0) * scaling.spawn_interval;
        }

        log::info!(
            "Wave {} started (boss: {}, quota: {}, interval: {}ms)",
            wave,
            self.boss_wave,
            self.enemies_per_wave,
            self.spawn_interval_ms
        );
    }

    /// Advance the state machine one frame. Spawns at most one enemy.
    /// Returns true when a new wave started this update.
    pub fn update(
        &mut self,
        now_ms: f64,
        playfield_width: f32,
        enemies: &mut EnemyPool,
        scaling: &DifficultyScaling,
        rng: &mut impl Rng,
    ) -> bool {
        match self.phase {
            WavePhase::Idle => false,
            WavePhase::Resting => {
                if now_ms - self.rest_start_ms >= WAVE_REST_MS {
                    self.start_wave(self.current_wave + 1, now_ms, scaling);
                    return true;
                }
                false
            }
            WavePhase::Active => {
                if self.enemies_spawned < self.enemies_per_wave
                    && now_ms - self.last_spawn_ms >= self.spawn_interval_ms
                {
                    self.spawn_enemy(playfield_width, enemies, scaling, rng);
                    self.last_spawn_ms = now_ms;
                }

                // A wave ends only when the quota is spent AND the field is
                // clear; stragglers hold the wave open.
                if self.enemies_spawned >= self.enemies_per_wave && enemies.is_empty() {
                    self.phase = WavePhase::Resting;
                    self.rest_start_ms = now_ms;
                }
                false
            }
        }
    }

    fn spawn_enemy(
        &mut self,
        playfield_width: f32,
        enemies: &mut EnemyPool,
        scaling: &DifficultyScaling,
        rng: &mut impl Rng,
    ) {
        if self.boss_wave {
            enemies.spawn(
                Vec2::new(playfield_width / 2.0, SPAWN_Y),
                EnemyKind::Boss,
                scaling,
                rng,
            );
        } else {
            let candidates = self.candidate_kinds();
            let kind = *candidates.choose(rng).unwrap_or(&EnemyKind::Scout);
            let x = rng.random_range(50.0..playfield_width - 50.0);
            enemies.spawn(Vec2::new(x, SPAWN_Y), kind, scaling, rng);
        }
        self.enemies_spawned += 1;
    }

    /// Spawnable enemy kinds for the current wave. Earlier-unlocked kinds
    /// appear multiple times to bias the uniform draw toward them.
    fn candidate_kinds(&self) -> Vec<EnemyKind> {
        let wave = self.current_wave;
        let mut kinds = vec![EnemyKind::Scout];
        if wave >= 2 {
            kinds.push(EnemyKind::Scout);
        }
        if wave >= 3 {
            kinds.push(EnemyKind::Fighter);
        }
        if wave >= 5 {
            kinds.push(EnemyKind::Fighter);
        }
        if wave >= 7 {
            kinds.push(EnemyKind::Heavy);
        }
        if wave >= 10 {
            kinds.push(EnemyKind::Heavy);
        }
        kinds
    }

    pub fn is_resting(&self) -> bool {
        self.phase == WavePhase::Resting
    }

    /// Shift every stored absolute timestamp forward by the paused duration
    pub fn rebase_timers(&mut self, delta_ms: f64) {
        self.wave_start_ms += delta_ms;
        self.last_spawn_ms += delta_ms;
        self.rest_start_ms += delta_ms;
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
    fn test_quota_and_interval_formulas() {
        let scaling = normal();
        let mut wave = WaveScheduler::default();
        wave.start_wave(1, 0.0, &scaling);
        assert_eq!(wave.enemies_per_wave, 6); // 5 + floor(1.5)
        assert_eq!(wave.spawn_interval_ms, 1900.0);

        wave.start_wave(13, 0.0, &scaling);
        assert_eq!(wave.enemies_per_wave, 20); // capped
        assert_eq!(wave.spawn_interval_ms, 800.0); // floored

        wave.start_wave(5, 0.0, &scaling);
        assert!(wave.boss_wave);
        assert_eq!(wave.enemies_per_wave, 1);
        assert_eq!(wave.spawn_interval_ms, 0.0);
    }

    #[test]
    fn test_difficulty_scales_spawn_interval() {
        let hard = difficulty_scaling(Difficulty::Hard);
        let mut wave = WaveScheduler::default();
        wave.start_wave(1, 0.0, &hard);
        assert_eq!(wave.spawn_interval_ms, 1900.0 * 0.85);
    }

    #[test]
    fn test_boss_wave_spawns_exactly_one_boss() {
        let scaling = normal();
        let mut rng = Pcg32::seed_from_u64(10);
        let mut enemies = EnemyPool::default();
        let mut wave = WaveScheduler::default();
        wave.start_wave(5, 0.0, &scaling);

        // Boss spawns with no inter-spawn delay; further updates spawn nothing
        wave.update(1.0, 800.0, &mut enemies, &scaling, &mut rng);
        wave.update(2.0, 800.0, &mut enemies, &scaling, &mut rng);
        wave.update(5000.0, 800.0, &mut enemies, &scaling, &mut rng);
        assert_eq!(enemies.len(), 1);
        assert!(enemies.has_boss());
        assert_eq!(wave.enemies_spawned, 1);
    }

    #[test]
    fn test_wave_holds_until_field_clears() {
        let scaling = normal();
        let mut rng = Pcg32::seed_from_u64(20);
        let mut enemies = EnemyPool::default();
        let mut wave = WaveScheduler::default();
        wave.start(0.0, &scaling);

        // Drive spawning until the quota is exhausted
        let mut now = 0.0;
        while wave.enemies_spawned < wave.enemies_per_wave {
            now += wave.spawn_interval_ms.max(1.0);
            wave.update(now, 800.0, &mut enemies, &scaling, &mut rng);
        }
        assert_eq!(wave.phase, WavePhase::Active);

        // Quota met, but enemies still alive: wave must not end
        wave.update(now + 1.0, 800.0, &mut enemies, &scaling, &mut rng);
        assert_eq!(wave.phase, WavePhase::Active);

        // Field cleared: wave rests
        enemies.clear();
        wave.update(now + 2.0, 800.0, &mut enemies, &scaling, &mut rng);
        assert_eq!(wave.phase, WavePhase::Resting);
    }

    #[test]
    fn test_rest_duration_then_next_wave() {
        let scaling = normal();
        let mut rng = Pcg32::seed_from_u64(30);
        let mut enemies = EnemyPool::default();
        let mut wave = WaveScheduler::default();
        wave.start_wave(5, 0.0, &scaling); // boss wave, quota 1
        wave.update(1.0, 800.0, &mut enemies, &scaling, &mut rng);
        enemies.clear();
        wave.update(10.0, 800.0, &mut enemies, &scaling, &mut rng);
        assert!(wave.is_resting());

        // Not yet rested
        assert!(!wave.update(10.0 + WAVE_REST_MS - 1.0, 800.0, &mut enemies, &scaling, &mut rng));
        assert!(wave.is_resting());

        // Rest elapses: wave 6 starts and update reports it
        assert!(wave.update(10.0 + WAVE_REST_MS, 800.0, &mut enemies, &scaling, &mut rng));
        assert_eq!(wave.current_wave, 6);
        assert_eq!(wave.phase, WavePhase::Active);
    }

    #[test]
    fn test_candidate_kinds_unlock_by_wave() {
        let mut wave = WaveScheduler::default();

        wave.current_wave = 1;
        assert_eq!(wave.candidate_kinds(), vec![EnemyKind::Scout]);

        wave.current_wave = 3;
        assert!(wave.candidate_kinds().contains(&EnemyKind::Fighter));
        assert!(!wave.candidate_kinds().contains(&EnemyKind::Heavy));

        wave.current_wave = 7;
        assert!(wave.candidate_kinds().contains(&EnemyKind::Heavy));

        // Scouts stay double-weighted from wave 2 on
        wave.current_wave = 10;
        let kinds = wave.candidate_kinds();
        assert_eq!(kinds.iter().filter(|k| **k == EnemyKind::Scout).count(), 2);
        assert_eq!(kinds.iter().filter(|k| **k == EnemyKind::Heavy).count(), 2);
    }

    #[test]
    fn test_rebase_preserves_remaining_rest() {
        let scaling = normal();
        let mut rng = Pcg32::seed_from_u64(40);
        let mut enemies = EnemyPool::default();
        let mut wave = WaveScheduler::default();
        wave.start_wave(5, 0.0, &scaling);
        wave.update(1.0, 800.0, &mut enemies, &scaling, &mut rng);
        enemies.clear();
        wave.update(100.0, 800.0, &mut enemies, &scaling, &mut rng);
        assert!(wave.is_resting()); // rest started at 100

        // 1000ms into the rest, a 5000ms pause happens
        wave.rebase_timers(5000.0);

        // Clock continues from 6100: remaining rest is still 2000ms
        assert!(!wave.update(6100.0 + 1999.0, 800.0, &mut enemies, &scaling, &mut rng));
        assert!(wave.update(6100.0 + 2000.0, 800.0, &mut enemies, &scaling, &mut rng));
        assert_eq!(wave.current_wave, 6);
    }
}
