//! Frame orchestrator
//!
//! One call per display frame. Pointer samples queued since the previous
//! frame are resolved first, against the positions the player saw, then time
//! advances and everything moves.

use glam::Vec2;

use super::state::{GameEvent, GamePhase, GameState, PowerupKind};
use super::{motion, slice, spawn};

/// Canvas-relative pointer samples
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(Vec2),
    Move(Vec2),
    Up,
}

/// Inputs collected for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer samples in arrival order
    pub pointer: Vec<PointerEvent>,
    /// Power-ups triggered from the HUD
    pub activate: Vec<PowerupKind>,
}

impl TickInput {
    pub fn is_empty(&self) -> bool {
        self.pointer.is_empty() && self.activate.is_empty()
    }

    pub fn clear(&mut self) {
        self.pointer.clear();
        self.activate.clear();
    }
}

/// Feed one pointer sample to the slice resolver
pub fn apply_pointer(state: &mut GameState, event: PointerEvent) {
    match event {
        PointerEvent::Down(p) => slice::begin_slice(state, p),
        PointerEvent::Move(p) => slice::extend_slice(state, p),
        PointerEvent::Up => slice::end_slice(state),
    }
}

/// Advance the game by one frame of `dt_ms` milliseconds
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: f32) {
    if state.phase != GamePhase::Playing {
        return;
    }

    for &kind in &input.activate {
        state.activate_powerup(kind);
    }
    for &event in &input.pointer {
        apply_pointer(state, event);
        if state.phase != GamePhase::Playing {
            return;
        }
    }

    state.elapsed_ms += dt_ms as f64;

    if state.progression.tick_combo(dt_ms) {
        state.events.push(GameEvent::ComboReset);
    }
    state.effects.tick(dt_ms, &mut state.events);

    spawn::update_spawner(state);
    motion::advance(state, dt_ms);
}
