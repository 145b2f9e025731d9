//! Slice resolution
//!
//! A drag builds a [`PointerPath`](super::state::PointerPath). On every move
//! sample the whole path is tested against every live fruit and power-up, so
//! one gesture can take out several targets, and a target that drifts into
//! an older part of the path is still cut.

use glam::Vec2;

use super::geometry::path_intersects_circle;
use super::progression::Progression;
use super::spawn;
use super::state::{Fruit, GameEvent, GamePhase, GameState, Powerup, SliceTrail};

/// Pointer pressed: start a fresh path
pub fn begin_slice(state: &mut GameState, point: Vec2) {
    if state.phase != GamePhase::Playing {
        return;
    }
    state.pointer.begin(point);
}

/// Pointer moved while pressed: extend the path and resolve hits
pub fn extend_slice(state: &mut GameState, point: Vec2) {
    if state.phase != GamePhase::Playing {
        return;
    }
    let Some(prev) = state.pointer.last() else {
        return;
    };
    state.pointer.push(point);
    state.slices.push(SliceTrail::new(prev, point));
    resolve_hits(state);
}

/// Pointer released
pub fn end_slice(state: &mut GameState) {
    state.pointer.clear();
}

/// Test the current path against every live entity
///
/// Each entity is removed on its first intersecting segment. A bomb ends the
/// run on the spot; entities not yet tested stay live.
pub fn resolve_hits(state: &mut GameState) {
    if state.pointer.len() < 2 {
        return;
    }
    let path = state.pointer.points().to_vec();

    let fruits = std::mem::take(&mut state.fruits);
    let mut survivors = Vec::with_capacity(fruits.len());
    for fruit in fruits {
        if state.phase == GamePhase::Playing
            && path_intersects_circle(&path, fruit.pos, fruit.hit_radius())
        {
            if fruit.kind.is_bomb() {
                hit_bomb(state, &fruit);
            } else {
                hit_fruit(state, &fruit);
            }
        } else {
            survivors.push(fruit);
        }
    }
    state.fruits = survivors;

    if state.phase != GamePhase::Playing {
        return;
    }

    let powerups = std::mem::take(&mut state.powerups);
    let mut survivors = Vec::with_capacity(powerups.len());
    for powerup in powerups {
        if path_intersects_circle(&path, powerup.pos, powerup.hit_radius()) {
            hit_powerup(state, &powerup);
        } else {
            survivors.push(powerup);
        }
    }
    state.powerups = survivors;
}

fn hit_bomb(state: &mut GameState, bomb: &Fruit) {
    state.progression.lose_life();
    spawn::explosion(state, bomb.pos);
    state.progression.reset_combo();
    state.events.push(GameEvent::BombHit { pos: bomb.pos });
    state.game_over();
}

fn hit_fruit(state: &mut GameState, fruit: &Fruit) {
    let multiplier = state.effects.point_multiplier();
    let points = state.progression.award_fruit(fruit.critical, multiplier);

    state.events.push(GameEvent::FruitSliced {
        kind: fruit.kind,
        pos: fruit.pos,
        base_points: Progression::base_points(fruit.critical),
        points,
        critical: fruit.critical,
        combo: state.progression.combo,
    });

    spawn::burst_fruit(state, fruit);

    if fruit.critical {
        state
            .progression
            .unlock(super::progression::Achievement::Critical, &mut state.events);
    }
    state.progression.check_achievements(&mut state.events);

    let levels = state.progression.check_level_up(&mut state.events);
    for _ in 0..levels {
        state.spawn_interval_ms = spawn::tightened_interval(state.spawn_interval_ms);
    }
}

fn hit_powerup(state: &mut GameState, powerup: &Powerup) {
    state.activate_powerup(powerup.kind);
    spawn::burst_powerup(state, powerup);
}
