//! Canvas 2D rendering module
//!
//! The simulation hands the renderer a borrowed [`Snapshot`] each frame and
//! never reads anything back. Score popups are presentation-only and live
//! here too.

use glam::Vec2;

use crate::sim::{BackgroundParticle, Fruit, GameEvent, GameState, Particle, Powerup, SliceTrail};

#[cfg(target_arch = "wasm32")]
mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;

/// How long a score popup floats
pub const POPUP_LIFE_MS: f32 = 1000.0;
/// Upward drift per frame
pub const POPUP_RISE: f32 = 1.0;

/// Read-only view of everything drawn in a frame
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub background: &'a [BackgroundParticle],
    pub particles: &'a [Particle],
    pub fruits: &'a [Fruit],
    pub powerups: &'a [Powerup],
    pub slices: &'a [SliceTrail],
    /// Drag in progress
    pub pointer: &'a [Vec2],
}

impl<'a> Snapshot<'a> {
    pub fn of(state: &'a GameState) -> Self {
        Self {
            background: &state.background,
            particles: &state.particles,
            fruits: &state.fruits,
            powerups: &state.powerups,
            slices: &state.slices,
            pointer: state.pointer.points(),
        }
    }

    /// Number of sliceable entities on screen
    pub fn targets(&self) -> usize {
        self.fruits.len() + self.powerups.len()
    }
}

/// Floating "+N" over a sliced fruit, showing the fruit's base value
#[derive(Debug, Clone, PartialEq)]
pub struct ScorePopup {
    pub text: String,
    pub pos: Vec2,
    pub critical: bool,
    pub life: f32,
}

impl ScorePopup {
    pub fn alpha(&self) -> f32 {
        (self.life / POPUP_LIFE_MS).clamp(0.0, 1.0)
    }
}

/// Popup label for a scored hit
pub fn popup_text(points: u64, critical: bool) -> String {
    if critical {
        format!("CRITICAL! +{}", points)
    } else {
        format!("+{}", points)
    }
}

/// Live score popups
#[derive(Debug, Clone, Default)]
pub struct PopupLayer {
    popups: Vec<ScorePopup>,
}

impl PopupLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a popup for fruit hits; other events are ignored
    pub fn push_event(&mut self, event: &GameEvent) {
        if let GameEvent::FruitSliced {
            pos,
            base_points,
            critical,
            ..
        } = event
        {
            self.popups.push(ScorePopup {
                text: popup_text(*base_points, *critical),
                pos: *pos,
                critical: *critical,
                life: POPUP_LIFE_MS,
            });
        }
    }

    pub fn update(&mut self, dt_ms: f32) {
        self.popups.retain_mut(|p| {
            p.pos.y -= POPUP_RISE;
            p.life -= dt_ms;
            p.life > 0.0
        });
    }

    pub fn popups(&self) -> &[ScorePopup] {
        &self.popups
    }

    pub fn clear(&mut self) {
        self.popups.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{FruitKind, Playfield};

    #[test]
    fn test_snapshot_borrows_state() {
        let mut state = GameState::new(3, Playfield::default());
        state.start();
        state.pointer.begin(Vec2::new(1.0, 2.0));
        let snap = Snapshot::of(&state);
        assert_eq!(snap.targets(), state.fruits.len());
        assert_eq!(snap.pointer, &[Vec2::new(1.0, 2.0)]);
        assert_eq!(snap.background.len(), state.background.len());
    }

    #[test]
    fn test_popup_text() {
        assert_eq!(popup_text(30, false), "+30");
        assert_eq!(popup_text(20, true), "CRITICAL! +20");
    }

    #[test]
    fn test_popups_rise_and_expire() {
        let mut layer = PopupLayer::new();
        layer.push_event(&GameEvent::ComboReset);
        assert!(layer.popups().is_empty());

        layer.push_event(&GameEvent::FruitSliced {
            kind: FruitKind::Apple,
            pos: Vec2::new(100.0, 100.0),
            base_points: 20,
            points: 120,
            critical: true,
            combo: 4,
        });
        layer.update(500.0);
        let popup = &layer.popups()[0];
        assert_eq!(popup.text, "CRITICAL! +20");
        assert_eq!(popup.pos.y, 99.0);
        assert!((popup.alpha() - 0.5).abs() < 1e-6);

        layer.update(500.0);
        assert!(layer.popups().is_empty());
    }
}
