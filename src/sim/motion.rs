//! Per-tick entity integration
//!
//! Velocities are in pixels per frame tick, lifetimes in milliseconds.

use glam::Vec2;

use super::state::{BackgroundParticle, Fruit, GameState, Particle, Playfield, Powerup, SliceTrail};
use crate::consts::{MAGNET_PULL, MAGNET_RANGE, PARTICLE_GRAVITY};

/// Inputs the fruit integrator needs from the rest of the state
#[derive(Debug, Clone, Copy)]
pub struct FruitMotion {
    /// 0.5 while freeze is active
    pub time_scale: f32,
    /// Run time for the wobble phase
    pub elapsed_ms: f64,
    /// Latest pointer sample while the magnet is active
    pub magnet_target: Option<Vec2>,
    /// Fruits at or past this y are dropped
    pub kill_line: f32,
}

/// Advance fruits and drop those that fell out of the playfield
pub fn advance_fruits(fruits: &mut Vec<Fruit>, motion: &FruitMotion) {
    let s = motion.time_scale;
    fruits.retain_mut(|fruit| {
        fruit.pos += fruit.vel * s;
        fruit.vel.y += fruit.kind.traits().gravity * s;
        fruit.rotation += fruit.rotation_speed * s;

        fruit.pos.x += fruit.wobble.offset(motion.elapsed_ms);

        if let Some(target) = motion.magnet_target {
            let to_target = target - fruit.pos;
            if !fruit.kind.is_bomb() && to_target.length() < MAGNET_RANGE {
                fruit.vel += to_target.normalize_or_zero() * MAGNET_PULL;
            }
        }

        fruit.pos.y < motion.kill_line
    });
}

/// Advance power-up capsules (no freeze, wobble or magnet)
pub fn advance_powerups(powerups: &mut Vec<Powerup>, elapsed_ms: f64, kill_line: f32) {
    let glow = (((elapsed_ms * 0.005).sin() + 1.0) * 0.5) as f32;
    powerups.retain_mut(|p| {
        p.pos += p.vel;
        p.vel.y += p.kind.traits().gravity;
        p.rotation += p.rotation_speed;
        p.glow = glow;
        p.pos.y < kill_line
    });
}

pub fn advance_particles(particles: &mut Vec<Particle>, dt_ms: f32) {
    particles.retain_mut(|p| {
        p.pos += p.vel;
        p.vel.y += PARTICLE_GRAVITY;
        p.rotation += p.rotation_speed;
        p.life -= dt_ms;
        p.life > 0.0
    });
}

pub fn advance_slices(slices: &mut Vec<SliceTrail>, dt_ms: f32) {
    slices.retain_mut(|s| {
        s.life -= dt_ms;
        s.life > 0.0
    });
}

/// Drift ambient motes, wrapping at the canvas edges
pub fn advance_background(motes: &mut [BackgroundParticle], field: Playfield) {
    for mote in motes {
        mote.pos += mote.vel;
        if mote.pos.x < 0.0 {
            mote.pos.x = field.width;
        } else if mote.pos.x > field.width {
            mote.pos.x = 0.0;
        }
        if mote.pos.y < 0.0 {
            mote.pos.y = field.height;
        } else if mote.pos.y > field.height {
            mote.pos.y = 0.0;
        }
    }
}

/// Integrate every entity collection for one tick
pub fn advance(state: &mut GameState, dt_ms: f32) {
    let kill_line = state.playfield.kill_line();
    let motion = FruitMotion {
        time_scale: state.effects.time_scale(),
        elapsed_ms: state.elapsed_ms,
        magnet_target: if state.effects.magnet_active() {
            state.pointer.last()
        } else {
            None
        },
        kill_line,
    };

    advance_fruits(&mut state.fruits, &motion);
    advance_powerups(&mut state.powerups, state.elapsed_ms, kill_line);
    advance_slices(&mut state.slices, dt_ms);
    advance_particles(&mut state.particles, dt_ms);
    advance_background(&mut state.background, state.playfield);
}
