//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per display frame, driven by an absolute millisecond clock
//! - Seeded RNG only
//! - Stable iteration order (storage order; enemies resolvable by ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod enemy;
pub mod particle;
pub mod player;
pub mod powerup;
pub mod state;
pub mod tick;
pub mod wave;
pub mod weapon;

pub use collision::Hitbox;
pub use enemy::{Enemy, EnemyPool, MovePattern};
pub use particle::{Particle, ParticlePool, ParticleShape};
pub use player::{InputState, Player};
pub use powerup::{Powerup, PowerupPool};
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{TickInput, tick};
pub use wave::{WavePhase, WaveScheduler};
pub use weapon::{Bullet, Weapon};
