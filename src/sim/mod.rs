//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only advances through tick deltas
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod geometry;
pub mod motion;
pub mod powerups;
pub mod progression;
pub mod slice;
pub mod spawn;
pub mod state;
pub mod tick;

pub use geometry::{path_intersects_circle, segment_intersects_circle};
pub use powerups::PowerupTimers;
pub use progression::{Achievement, Progression};
pub use state::{
    BackgroundParticle, Fruit, FruitKind, GameEvent, GamePhase, GameState, KindTraits, Particle,
    ParticleKind, Playfield, PointerPath, Powerup, PowerupKind, SliceTrail, Wobble,
};
pub use tick::{PointerEvent, TickInput, apply_pointer, tick};
