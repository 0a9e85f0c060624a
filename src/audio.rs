//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects - no external files needed!

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::sim::GameEvent;
use crate::tuning::WeaponKind;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Standard cannon shot
    Shoot,
    /// Laser pulse
    Laser,
    /// Missile launch
    MissileLaunch,
    /// Bullet connects with an enemy
    EnemyHit,
    /// Enemy destroyed
    Explosion,
    /// Player takes a hit
    PlayerHit,
    /// Shield absorbs a hit
    ShieldAbsorb,
    /// Power-up collected
    PowerupCollect,
    /// New wave incoming
    WaveStart,
    /// Player leveled up
    LevelUp,
    /// Player destroyed
    GameOver,
}

impl SoundEffect {
    /// Map a simulation event to its sound, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        Some(match event {
            GameEvent::Shoot(WeaponKind::Laser) => Self::Laser,
            GameEvent::Shoot(WeaponKind::Missile) => Self::MissileLaunch,
            GameEvent::Shoot(_) => Self::Shoot,
            GameEvent::EnemyHit => Self::EnemyHit,
            GameEvent::EnemyDestroyed => Self::Explosion,
            GameEvent::PlayerHit => Self::PlayerHit,
            GameEvent::ShieldAbsorb => Self::ShieldAbsorb,
            GameEvent::PowerupCollected(_) => Self::PowerupCollect,
            GameEvent::WaveStart(_) => Self::WaveStart,
            GameEvent::LevelUp(_) => Self::LevelUp,
            GameEvent::PlayerDestroyed => Self::GameOver,
        })
    }
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Get effective volume
    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::Shoot => self.play_shoot(ctx, vol),
            SoundEffect::Laser => self.play_laser(ctx, vol),
            SoundEffect::MissileLaunch => self.play_missile(ctx, vol),
            SoundEffect::EnemyHit => self.play_enemy_hit(ctx, vol),
            SoundEffect::Explosion => self.play_explosion(ctx, vol),
            SoundEffect::PlayerHit => self.play_player_hit(ctx, vol),
            SoundEffect::ShieldAbsorb => self.play_shield_absorb(ctx, vol),
            SoundEffect::PowerupCollect => self.play_powerup(ctx, vol),
            SoundEffect::WaveStart => self.play_wave_start(ctx, vol),
            SoundEffect::LevelUp => self.play_level_up(ctx, vol),
            SoundEffect::GameOver => self.play_game_over(ctx, vol),
        }
    }

    // === Sound generators ===

    /// Create an oscillator with gain envelope
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Cannon shot - short pew
    fn play_shoot(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 880.0, OscillatorType::Square) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.15, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.08)
            .ok();
        osc.frequency().set_value_at_time(880.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(220.0, t + 0.08)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.1).ok();
    }

    /// Laser - thin rising zap
    fn play_laser(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 1200.0, OscillatorType::Sawtooth) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.1, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.06)
            .ok();
        osc.frequency().set_value_at_time(1200.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(2400.0, t + 0.05)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.08).ok();
    }

    /// Missile - low whoosh with a falling tail
    fn play_missile(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 300.0, OscillatorType::Sawtooth) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.25, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.25)
            .ok();
        osc.frequency().set_value_at_time(300.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(80.0, t + 0.25)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.3).ok();
    }

    /// Bullet connects - soft tap
    fn play_enemy_hit(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 300.0, OscillatorType::Triangle) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.2, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.05)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.08).ok();
    }

    /// Explosion - boom!
    fn play_explosion(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();

        if let Some((osc, gain)) = self.create_osc(ctx, 100.0, OscillatorType::Sawtooth) {
            gain.gain().set_value_at_time(vol * 0.5, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.4)
                .ok();
            osc.frequency().set_value_at_time(100.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(30.0, t + 0.4)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.5).ok();
        }

        // High crackle on top
        if let Some((osc, gain)) = self.create_osc(ctx, 3000.0, OscillatorType::Square) {
            gain.gain().set_value_at_time(vol * 0.08, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.12)
                .ok();
            osc.frequency().set_value_at_time(3000.0, t).ok();
            osc.frequency().set_value_at_time(1500.0, t + 0.04).ok();
            osc.frequency().set_value_at_time(2200.0, t + 0.08).ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.15).ok();
        }
    }

    /// Player hit - harsh buzz
    fn play_player_hit(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 150.0, OscillatorType::Sawtooth) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.4, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.2)
            .ok();
        osc.frequency().set_value_at_time(150.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(50.0, t + 0.2)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.25).ok();
    }

    /// Shield absorb - hollow metallic ring
    fn play_shield_absorb(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 600.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.3, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.15)
            .ok();
        osc.frequency().set_value_at_time(600.0, t).ok();
        osc.frequency().set_value_at_time(450.0, t + 0.05).ok();
        osc.frequency().set_value_at_time(550.0, t + 0.1).ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.18).ok();
    }

    /// Power-up collect - cheerful ascending arpeggio
    fn play_powerup(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();
        for (i, freq) in [523.25, 659.25, 783.99].iter().enumerate() {
            let offset = i as f64 * 0.06;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Square) {
                gain.gain().set_value_at_time(vol * 0.2, t + offset).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + offset + 0.1)
                    .ok();
                osc.start_with_when(t + offset).ok();
                osc.stop_with_when(t + offset + 0.12).ok();
            }
        }
    }

    /// Wave start - two-note alarm
    fn play_wave_start(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();
        for (i, freq) in [440.0, 587.33].iter().enumerate() {
            let offset = i as f64 * 0.15;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) {
                gain.gain().set_value_at_time(vol * 0.3, t + offset).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + offset + 0.2)
                    .ok();
                osc.start_with_when(t + offset).ok();
                osc.stop_with_when(t + offset + 0.25).ok();
            }
        }
    }

    /// Level up - triumphant rising fifth
    fn play_level_up(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();
        for (i, freq) in [392.0, 523.25, 783.99, 1046.5].iter().enumerate() {
            let offset = i as f64 * 0.08;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                gain.gain().set_value_at_time(vol * 0.25, t + offset).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + offset + 0.2)
                    .ok();
                osc.start_with_when(t + offset).ok();
                osc.stop_with_when(t + offset + 0.25).ok();
            }
        }
    }

    /// Game over - slow descending dirge
    fn play_game_over(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();
        for (i, freq) in [392.0, 349.23, 311.13, 261.63].iter().enumerate() {
            let offset = i as f64 * 0.3;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) {
                gain.gain().set_value_at_time(vol * 0.35, t + offset).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + offset + 0.35)
                    .ok();
                osc.start_with_when(t + offset).ok();
                osc.stop_with_when(t + offset + 0.4).ok();
            }
        }

        // Final low rumble
        if let Some((osc, gain)) = self.create_osc(ctx, 60.0, OscillatorType::Sawtooth) {
            gain.gain().set_value_at_time(vol * 0.3, t + 1.2).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 2.0)
                .ok();
            osc.start_with_when(t + 1.2).ok();
            osc.stop_with_when(t + 2.1).ok();
        }
    }
}
