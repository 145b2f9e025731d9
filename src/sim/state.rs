//! Game state and core simulation types
//!
//! Everything the frame orchestrator mutates lives in [`GameState`]. The
//! entity collections are owned here and only touched from inside a tick or
//! a pointer event.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::powerups::PowerupTimers;
use super::progression::{Achievement, Progression};
use crate::consts::*;
use crate::settings::Settings;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Start screen, nothing moves
    Ready,
    /// Active gameplay
    Playing,
    /// Run ended
    GameOver,
}

/// Per-kind lookup table for colour, hit radius and gravity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KindTraits {
    /// Packed 0xRRGGBB used for juice and placeholders
    pub color: u32,
    /// Hit radius before scaling
    pub hit_radius: f32,
    /// Added to vel.y every tick
    pub gravity: f32,
}

/// Fruit types (bombs fly along with them)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FruitKind {
    Apple,
    Banana,
    Orange,
    Watermelon,
    Pineapple,
    Strawberry,
    Bomb,
}

impl FruitKind {
    /// Kinds that score when sliced
    pub const REGULAR: [FruitKind; 6] = [
        FruitKind::Apple,
        FruitKind::Banana,
        FruitKind::Orange,
        FruitKind::Watermelon,
        FruitKind::Pineapple,
        FruitKind::Strawberry,
    ];

    pub fn is_bomb(self) -> bool {
        self == FruitKind::Bomb
    }

    pub const fn traits(self) -> KindTraits {
        let color = match self {
            FruitKind::Apple => 0xFF0000,
            FruitKind::Banana => 0xFFFF00,
            FruitKind::Orange => 0xFFA500,
            FruitKind::Watermelon => 0xFF6666,
            FruitKind::Pineapple => 0xFFCC00,
            FruitKind::Strawberry => 0xFF3366,
            FruitKind::Bomb => 0x333333,
        };
        KindTraits {
            color,
            hit_radius: FRUIT_HIT_RADIUS,
            gravity: FRUIT_GRAVITY,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FruitKind::Apple => "apple",
            FruitKind::Banana => "banana",
            FruitKind::Orange => "orange",
            FruitKind::Watermelon => "watermelon",
            FruitKind::Pineapple => "pineapple",
            FruitKind::Strawberry => "strawberry",
            FruitKind::Bomb => "bomb",
        }
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PowerupKind {
    /// Halves fruit speed and doubles the spawn interval
    Freeze,
    /// Doubles points per fruit
    Double,
    /// Pulls fruits toward the pointer
    Magnet,
}

impl PowerupKind {
    pub const ALL: [PowerupKind; 3] = [PowerupKind::Freeze, PowerupKind::Double, PowerupKind::Magnet];

    /// Slot in per-kind arrays
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            PowerupKind::Freeze => 0,
            PowerupKind::Double => 1,
            PowerupKind::Magnet => 2,
        }
    }

    pub const fn traits(self) -> KindTraits {
        let color = match self {
            PowerupKind::Freeze => 0x00AAFF,
            PowerupKind::Double => 0xFFCC00,
            PowerupKind::Magnet => 0xFF3366,
        };
        KindTraits {
            color,
            hit_radius: POWERUP_HIT_RADIUS,
            gravity: POWERUP_GRAVITY,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PowerupKind::Freeze => "freeze",
            PowerupKind::Double => "double",
            PowerupKind::Magnet => "magnet",
        }
    }
}

/// Lateral sway applied to fruits (visual only)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Wobble {
    pub amplitude: f32,
    pub frequency: f32,
    pub phase: f32,
}

impl Wobble {
    /// Horizontal offset at the given run time
    #[inline]
    pub fn offset(&self, elapsed_ms: f64) -> f32 {
        ((elapsed_ms * self.frequency as f64 + self.phase as f64).sin() as f32) * self.amplitude
    }
}

/// A fruit or bomb in flight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fruit {
    pub id: u32,
    pub kind: FruitKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub rotation: f32,
    pub rotation_speed: f32,
    pub scale: f32,
    pub wobble: Wobble,
    /// Critical fruits score double base points
    #[serde(default)]
    pub critical: bool,
}

impl Fruit {
    /// A still, upright fruit at `pos` (spawning randomizes the rest)
    pub fn new(id: u32, kind: FruitKind, pos: Vec2, vel: Vec2) -> Self {
        Self {
            id,
            kind,
            pos,
            vel,
            rotation: 0.0,
            rotation_speed: 0.0,
            scale: FRUIT_SCALE,
            wobble: Wobble::default(),
            critical: false,
        }
    }

    #[inline]
    pub fn hit_radius(&self) -> f32 {
        self.kind.traits().hit_radius * self.scale
    }
}

/// A power-up capsule in flight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Powerup {
    pub id: u32,
    pub kind: PowerupKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub rotation: f32,
    pub rotation_speed: f32,
    pub scale: f32,
    /// Glow intensity 0-1 for rendering
    pub glow: f32,
}

impl Powerup {
    pub fn new(id: u32, kind: PowerupKind, pos: Vec2, vel: Vec2) -> Self {
        Self {
            id,
            kind,
            pos,
            vel,
            rotation: 0.0,
            rotation_speed: 0.0,
            scale: POWERUP_SCALE,
            glow: 0.0,
        }
    }

    #[inline]
    pub fn hit_radius(&self) -> f32 {
        self.kind.traits().hit_radius * self.scale
    }
}

/// Particle shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    /// Round droplet
    Juice,
    /// Square fruit chip
    Chip,
}

/// A particle for visual effects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub kind: ParticleKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub color: u32,
    pub rotation: f32,
    pub rotation_speed: f32,
    /// Remaining life in ms
    pub life: f32,
    pub initial_life: f32,
}

impl Particle {
    /// Opacity fading with remaining life
    pub fn alpha(&self) -> f32 {
        if self.initial_life <= 0.0 {
            0.0
        } else {
            (self.life / self.initial_life).clamp(0.0, 1.0)
        }
    }
}

/// One fading segment of the drawn slice
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SliceTrail {
    pub start: Vec2,
    pub end: Vec2,
    /// Remaining life in ms
    pub life: f32,
}

impl SliceTrail {
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self {
            start,
            end,
            life: SLICE_TRAIL_LIFE_MS,
        }
    }

    pub fn alpha(&self) -> f32 {
        (self.life / SLICE_TRAIL_LIFE_MS).clamp(0.0, 1.0)
    }
}

/// Sampled points of the drag in progress
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointerPath {
    points: Vec<Vec2>,
}

impl PointerPath {
    /// Start a new drag at `point`
    pub fn begin(&mut self, point: Vec2) {
        self.points.clear();
        self.points.push(point);
    }

    pub fn push(&mut self, point: Vec2) {
        self.points.push(point);
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// Most recent sample
    pub fn last(&self) -> Option<Vec2> {
        self.points.last().copied()
    }

    /// A drag is in progress while the path holds any point
    pub fn is_dragging(&self) -> bool {
        !self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Drifting ambient mote behind the play area
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BackgroundParticle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub opacity: f32,
}

/// Canvas dimensions in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Playfield {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Entities at or below this y are gone
    #[inline]
    pub fn kill_line(&self) -> f32 {
        self.height + OFFSCREEN_MARGIN
    }

    /// Spawn y just below the visible area
    #[inline]
    pub fn spawn_line(&self) -> f32 {
        self.height + SPAWN_DEPTH
    }
}

impl Default for Playfield {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

/// Discrete outcomes for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A regular fruit was sliced
    FruitSliced {
        kind: FruitKind,
        pos: Vec2,
        /// Points before the double power-up and combo
        base_points: u64,
        /// Points actually scored
        points: u64,
        critical: bool,
        /// Combo after this hit
        combo: u32,
    },
    /// A bomb was sliced
    BombHit { pos: Vec2 },
    PowerupActivated(PowerupKind),
    PowerupExpired(PowerupKind),
    AchievementUnlocked(Achievement),
    LevelUp { level: u32 },
    /// Combo timer ran out
    ComboReset,
    GameOver { score: u64, level: u32 },
}

impl GameEvent {
    /// Stable string key for notification sinks
    pub fn key(&self) -> &'static str {
        match self {
            GameEvent::FruitSliced { .. } => "fruit_sliced",
            GameEvent::BombHit { .. } => "bomb_hit",
            GameEvent::PowerupActivated(_) => "powerup_activated",
            GameEvent::PowerupExpired(_) => "powerup_expired",
            GameEvent::AchievementUnlocked(_) => "achievement_unlocked",
            GameEvent::LevelUp { .. } => "level_up",
            GameEvent::ComboReset => "combo_reset",
            GameEvent::GameOver { .. } => "game_over",
        }
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Seeded RNG, the only randomness source of the simulation
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub playfield: Playfield,
    /// Run time (sum of tick deltas, ms)
    pub elapsed_ms: f64,
    /// Run time of the last spawn
    pub last_spawn_ms: f64,
    /// Current base spawn interval (shrinks with level)
    pub spawn_interval_ms: f32,
    /// Score, lives, combo, XP and achievements
    pub progression: Progression,
    /// Active power-up timers
    pub effects: PowerupTimers,
    /// Live fruits and bombs (ordered by id)
    pub fruits: Vec<Fruit>,
    /// Live power-up capsules (ordered by id)
    pub powerups: Vec<Powerup>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    /// Fading slice segments
    pub slices: Vec<SliceTrail>,
    /// Drag in progress
    pub pointer: PointerPath,
    /// Ambient motes
    pub background: Vec<BackgroundParticle>,
    /// Events produced since the last drain
    pub events: Vec<GameEvent>,
    /// Particle cap
    pub max_particles: usize,
    /// Ambient mote count
    pub background_count: usize,
    next_id: u32,
}

impl GameState {
    /// Create a new game state with the given seed
    pub fn new(seed: u64, playfield: Playfield) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Ready,
            playfield,
            elapsed_ms: 0.0,
            last_spawn_ms: 0.0,
            spawn_interval_ms: BASE_SPAWN_INTERVAL_MS,
            progression: Progression::default(),
            effects: PowerupTimers::default(),
            fruits: Vec::new(),
            powerups: Vec::new(),
            particles: Vec::new(),
            slices: Vec::new(),
            pointer: PointerPath::default(),
            background: Vec::new(),
            events: Vec::new(),
            max_particles: MAX_PARTICLES,
            background_count: BACKGROUND_PARTICLES,
            next_id: 1,
        };

        super::spawn::populate_background(&mut state);

        state
    }

    /// Create a state honouring the player's effect settings
    pub fn with_settings(seed: u64, playfield: Playfield, settings: &Settings) -> Self {
        let mut state = Self::new(seed, playfield);
        state.apply_settings(settings);
        state
    }

    /// Apply the particle cap and ambient mote count
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.max_particles = settings.max_particles();
        let excess = self.particles.len().saturating_sub(self.max_particles);
        self.particles.drain(..excess);
        if settings.background_particles() != self.background_count {
            self.background_count = settings.background_particles();
            super::spawn::populate_background(self);
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Begin a run and throw the opening volley
    ///
    /// Level, XP, achievements and the level-tightened spawn interval carry
    /// over from earlier runs. The first scheduled spawn fires on the first
    /// tick.
    pub fn start(&mut self) {
        self.phase = GamePhase::Playing;
        self.elapsed_ms = 0.0;
        self.last_spawn_ms = f64::NEG_INFINITY;
        self.progression.begin_run();
        self.effects = PowerupTimers::default();
        self.fruits.clear();
        self.powerups.clear();
        self.particles.clear();
        self.slices.clear();
        self.pointer.clear();
        self.events.clear();

        for _ in 0..OPENING_VOLLEY {
            super::spawn::spawn_fruit(self);
        }

        log::info!(
            "Run started (seed {}, canvas {}x{})",
            self.seed,
            self.playfield.width,
            self.playfield.height
        );
    }

    /// Canvas changed size; ambient motes are redistributed
    pub fn resize(&mut self, width: f32, height: f32) {
        self.playfield = Playfield::new(width, height);
        super::spawn::populate_background(self);
    }

    /// Add a particle, dropping the oldest past the cap
    pub fn push_particle(&mut self, particle: Particle) {
        if self.max_particles == 0 {
            return;
        }
        if self.particles.len() >= self.max_particles {
            self.particles.remove(0);
        }
        self.particles.push(particle);
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Activate a power-up directly (HUD button or hotkey)
    pub fn activate_powerup(&mut self, kind: PowerupKind) -> bool {
        if self.effects.activate(kind) {
            log::info!("Powerup activated: {}", kind.as_str());
            self.events.push(GameEvent::PowerupActivated(kind));
            true
        } else {
            false
        }
    }

    /// End the run
    pub fn game_over(&mut self) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.pointer.clear();
        log::info!(
            "Game over: score {}, level {}",
            self.progression.score,
            self.progression.level
        );
        self.events.push(GameEvent::GameOver {
            score: self.progression.score,
            level: self.progression.level,
        });
    }
}
