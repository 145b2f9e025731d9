//! Fruit Slice - A browser slicing arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (motion, slicing, scoring, spawning)
//! - `renderer`: Read-only snapshots plus the Canvas2D drawer
//! - `persistence`: Ranked score storage
//! - `settings`: Player preferences
//! - `assets` / `audio`: Asset provider with built-in fallbacks

pub mod assets;
pub mod audio;
pub mod error;
pub mod highscores;
pub mod notifications;
pub mod persistence;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{InitError, StorageError};
pub use highscores::HighScores;
pub use notifications::NotificationQueue;
pub use settings::{QualityPreset, Settings};

/// Game configuration constants
///
/// Motion constants are per frame tick, timers are in milliseconds.
pub mod consts {
    /// Fruit gravity (added to vel.y every tick)
    pub const FRUIT_GRAVITY: f32 = 0.3;
    /// Powerups float a little longer
    pub const POWERUP_GRAVITY: f32 = 0.2;
    pub const PARTICLE_GRAVITY: f32 = 0.1;
    /// Time scale applied to fruits while freeze is active
    pub const FREEZE_TIME_SCALE: f32 = 0.5;

    /// Entities are dropped once they fall this far below the canvas
    pub const OFFSCREEN_MARGIN: f32 = 100.0;
    /// Spawn height below the bottom edge
    pub const SPAWN_DEPTH: f32 = 50.0;
    /// Horizontal inset for spawn positions
    pub const SPAWN_INSET: f32 = 50.0;

    /// Hit radii (scaled by entity scale)
    pub const FRUIT_HIT_RADIUS: f32 = 40.0;
    pub const POWERUP_HIT_RADIUS: f32 = 30.0;
    pub const FRUIT_SCALE: f32 = 1.2;
    pub const POWERUP_SCALE: f32 = 1.0;

    /// Spawn cadence
    pub const BASE_SPAWN_INTERVAL_MS: f32 = 1500.0;
    pub const MIN_SPAWN_INTERVAL_MS: f32 = 800.0;
    pub const SPAWN_INTERVAL_STEP_MS: f32 = 100.0;
    pub const BOMB_CHANCE: f64 = 0.15;
    pub const POWERUP_CHANCE: f64 = 0.1;
    pub const CRITICAL_CHANCE: f64 = 0.2;
    pub const OPENING_VOLLEY: usize = 3;

    /// Magnet pull
    pub const MAGNET_RANGE: f32 = 200.0;
    pub const MAGNET_PULL: f32 = 0.5;

    /// Powerups
    pub const POWERUP_DURATION_MS: f32 = 5000.0;

    /// Slicing and scoring
    pub const SLICE_TRAIL_LIFE_MS: f32 = 500.0;
    pub const BASE_POINTS: u64 = 10;
    pub const MAX_COMBO_TIMER_MS: f32 = 3000.0;
    pub const STARTING_LIVES: u8 = 3;
    pub const FIRST_LEVEL_XP: u64 = 100;

    /// Achievement thresholds
    pub const SLICE_ACHIEVEMENT_COUNT: u32 = 10;
    pub const COMBO_ACHIEVEMENT: u32 = 5;
    pub const SCORE_ACHIEVEMENT: u64 = 100;

    /// Visual effects
    pub const MAX_PARTICLES: usize = 600;
    pub const BACKGROUND_PARTICLES: usize = 50;
    pub const NOTIFICATION_LIFE_MS: f32 = 3000.0;
}

/// Convert an HSL colour (h in degrees, s/l in 0..=1) to packed 0xRRGGBB
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> u32 {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let hp = (h.rem_euclid(360.0)) / 60.0;
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
    let (r, g, b) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = l - c / 2.0;
    let to_byte = |v: f32| (((v + m) * 255.0).round().clamp(0.0, 255.0)) as u32;
    (to_byte(r) << 16) | (to_byte(g) << 8) | to_byte(b)
}

/// Format a packed colour as a CSS hex string
pub fn css_color(rgb: u32) -> String {
    format!("#{:06x}", rgb & 0xFF_FFFF)
}
