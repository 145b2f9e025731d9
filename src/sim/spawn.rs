//! Spawn scheduling and entity factories
//!
//! Fruits are thrown up from below the canvas on a fixed cadence. All random
//! draws go through the state's seeded RNG.

use glam::Vec2;
use rand::Rng;

use super::state::{
    BackgroundParticle, Fruit, FruitKind, GameState, Particle, ParticleKind, Powerup, PowerupKind,
    Wobble,
};
use crate::consts::*;
use crate::hsl_to_rgb;

/// Interval between spawns right now, with freeze applied
pub fn effective_interval(state: &GameState) -> f32 {
    state.spawn_interval_ms * state.effects.spawn_interval_factor()
}

/// Interval after one level-up
pub fn tightened_interval(interval_ms: f32) -> f32 {
    (interval_ms - SPAWN_INTERVAL_STEP_MS).max(MIN_SPAWN_INTERVAL_MS)
}

/// Spawn a fruit (and maybe a power-up) once the interval has elapsed
///
/// Returns true if a spawn fired.
pub fn update_spawner(state: &mut GameState) -> bool {
    let interval = effective_interval(state) as f64;
    if state.elapsed_ms - state.last_spawn_ms <= interval {
        return false;
    }

    spawn_fruit(state);
    if state.rng.random_bool(POWERUP_CHANCE) {
        spawn_powerup(state);
    }
    state.last_spawn_ms = state.elapsed_ms;
    true
}

/// Uniform x in [inset, width - inset]
fn spawn_x(state: &mut GameState) -> f32 {
    let span = (state.playfield.width - 2.0 * SPAWN_INSET).max(0.0);
    SPAWN_INSET.min(state.playfield.width / 2.0) + state.rng.random::<f32>() * span
}

/// Throw a random fruit (15% bomb) from below the canvas
pub fn spawn_fruit(state: &mut GameState) -> u32 {
    let kind = if state.rng.random_bool(BOMB_CHANCE) {
        FruitKind::Bomb
    } else {
        FruitKind::REGULAR[state.rng.random_range(0..FruitKind::REGULAR.len())]
    };

    let id = state.next_entity_id();
    let x = spawn_x(state);
    let rng = &mut state.rng;
    let vel = Vec2::new(
        (rng.random::<f32>() - 0.5) * 4.0,
        -12.0 - rng.random::<f32>() * 5.0,
    );

    let mut fruit = Fruit::new(id, kind, Vec2::new(x, state.playfield.spawn_line()), vel);
    fruit.rotation_speed = (rng.random::<f32>() - 0.5) * 0.1;
    fruit.wobble = Wobble {
        amplitude: rng.random::<f32>() * 0.5 + 0.5,
        frequency: rng.random::<f32>() * 0.02 + 0.01,
        phase: rng.random::<f32>() * std::f32::consts::TAU,
    };
    fruit.critical = !kind.is_bomb() && rng.random_bool(CRITICAL_CHANCE);

    state.fruits.push(fruit);
    id
}

/// Throw a random power-up capsule
pub fn spawn_powerup(state: &mut GameState) -> u32 {
    let kind = PowerupKind::ALL[state.rng.random_range(0..PowerupKind::ALL.len())];

    let id = state.next_entity_id();
    let x = spawn_x(state);
    let rng = &mut state.rng;
    let vel = Vec2::new(
        (rng.random::<f32>() - 0.5) * 2.0,
        -10.0 - rng.random::<f32>() * 3.0,
    );

    let mut powerup = Powerup::new(id, kind, Vec2::new(x, state.playfield.spawn_line()), vel);
    powerup.rotation_speed = (rng.random::<f32>() - 0.5) * 0.2;

    state.powerups.push(powerup);
    id
}

/// Burst parameters
struct Burst {
    kind: ParticleKind,
    count: usize,
    spread: f32,
    lift: f32,
    size: (f32, f32),
    life: (f32, f32),
}

fn emit(state: &mut GameState, pos: Vec2, burst: Burst, mut color: impl FnMut(&mut rand_pcg::Pcg32) -> u32) {
    for _ in 0..burst.count {
        let rng = &mut state.rng;
        let vel = Vec2::new(
            (rng.random::<f32>() - 0.5) * burst.spread,
            (rng.random::<f32>() - 0.5) * burst.spread - burst.lift,
        );
        let size = rng.random::<f32>() * burst.size.1 + burst.size.0;
        let life = burst.life.0 + rng.random::<f32>() * burst.life.1;
        let particle = Particle {
            kind: burst.kind,
            pos,
            vel,
            size,
            color: color(rng),
            rotation: rng.random::<f32>() * std::f32::consts::TAU,
            rotation_speed: (rng.random::<f32>() - 0.5) * 0.2,
            life,
            initial_life: life,
        };
        state.push_particle(particle);
    }
}

/// Juice droplets and chips in the fruit's colour
pub fn burst_fruit(state: &mut GameState, fruit: &Fruit) {
    let color = fruit.kind.traits().color;
    emit(
        state,
        fruit.pos,
        Burst {
            kind: ParticleKind::Juice,
            count: 15,
            spread: 8.0,
            lift: 0.0,
            size: (2.0, 8.0),
            life: (1000.0, 500.0),
        },
        |_| color,
    );
    emit(
        state,
        fruit.pos,
        Burst {
            kind: ParticleKind::Chip,
            count: 5,
            spread: 5.0,
            lift: 2.0,
            size: (5.0, 15.0),
            life: (1000.0, 500.0),
        },
        |_| color,
    );
}

/// Sparkle in the power-up's colour
pub fn burst_powerup(state: &mut GameState, powerup: &Powerup) {
    let color = powerup.kind.traits().color;
    emit(
        state,
        powerup.pos,
        Burst {
            kind: ParticleKind::Juice,
            count: 20,
            spread: 10.0,
            lift: 0.0,
            size: (5.0, 10.0),
            life: (1500.0, 500.0),
        },
        |_| color,
    );
}

/// Fiery burst in red to orange hues
pub fn explosion(state: &mut GameState, pos: Vec2) {
    emit(
        state,
        pos,
        Burst {
            kind: ParticleKind::Juice,
            count: 30,
            spread: 15.0,
            lift: 0.0,
            size: (3.0, 12.0),
            life: (1000.0, 500.0),
        },
        |rng| hsl_to_rgb(rng.random_range(0..30) as f32, 1.0, 0.5),
    );
}

/// Recreate the ambient motes for the current playfield
pub fn populate_background(state: &mut GameState) {
    let field = state.playfield;
    let rng = &mut state.rng;
    state.background = (0..state.background_count)
        .map(|_| BackgroundParticle {
            pos: Vec2::new(
                rng.random::<f32>() * field.width,
                rng.random::<f32>() * field.height,
            ),
            vel: Vec2::new(
                (rng.random::<f32>() - 0.5) * 0.5,
                (rng.random::<f32>() - 0.5) * 0.5,
            ),
            size: rng.random::<f32>() * 3.0 + 1.0,
            opacity: rng.random::<f32>() * 0.5 + 0.2,
        })
        .collect();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Playfield;

    fn playing(seed: u64) -> GameState {
        let mut state = GameState::new(seed, Playfield::new(800.0, 600.0));
        state.phase = crate::sim::GamePhase::Playing;
        state
    }

    #[test]
    fn test_spawned_fruit_ranges() {
        let mut state = playing(42);
        for _ in 0..500 {
            spawn_fruit(&mut state);
        }
        for fruit in &state.fruits {
            assert!(fruit.pos.x >= 50.0 && fruit.pos.x <= 750.0);
            assert_eq!(fruit.pos.y, 650.0);
            assert!(fruit.vel.x >= -2.0 && fruit.vel.x <= 2.0);
            assert!(fruit.vel.y >= -17.0 && fruit.vel.y <= -12.0);
            assert!(!(fruit.kind.is_bomb() && fruit.critical));
        }
        let bombs = state.fruits.iter().filter(|f| f.kind.is_bomb()).count();
        // 15% of 500, loosely
        assert!(bombs > 30 && bombs < 120, "bombs = {}", bombs);
    }

    #[test]
    fn test_spawned_powerup_ranges() {
        let mut state = playing(42);
        for _ in 0..200 {
            spawn_powerup(&mut state);
        }
        for p in &state.powerups {
            assert!(p.vel.x >= -1.0 && p.vel.x <= 1.0);
            assert!(p.vel.y >= -13.0 && p.vel.y <= -10.0);
        }
        for kind in PowerupKind::ALL {
            assert!(state.powerups.iter().any(|p| p.kind == kind));
        }
    }

    #[test]
    fn test_spawner_cadence() {
        let mut state = playing(1);
        state.elapsed_ms = 1500.0;
        assert!(!update_spawner(&mut state));
        state.elapsed_ms = 1501.0;
        assert!(update_spawner(&mut state));
        assert_eq!(state.last_spawn_ms, 1501.0);
        assert_eq!(state.fruits.len(), 1);
    }

    #[test]
    fn test_freeze_doubles_interval() {
        let mut state = playing(1);
        state.effects.activate(PowerupKind::Freeze);
        assert_eq!(effective_interval(&state), 3000.0);
        state.elapsed_ms = 2000.0;
        assert!(!update_spawner(&mut state));
        state.elapsed_ms = 3001.0;
        assert!(update_spawner(&mut state));
    }

    #[test]
    fn test_interval_floor() {
        let mut interval = BASE_SPAWN_INTERVAL_MS;
        for _ in 0..20 {
            interval = tightened_interval(interval);
        }
        assert_eq!(interval, MIN_SPAWN_INTERVAL_MS);
        assert_eq!(tightened_interval(1500.0), 1400.0);
    }

    #[test]
    fn test_bursts_share_life() {
        let mut state = playing(3);
        let fruit = Fruit::new(99, FruitKind::Orange, Vec2::new(10.0, 10.0), Vec2::ZERO);
        burst_fruit(&mut state, &fruit);
        assert_eq!(state.particles.len(), 20);
        assert!(state.particles.iter().all(|p| p.life == p.initial_life));
        assert!(state.particles.iter().all(|p| p.color == 0xFFA500));

        explosion(&mut state, Vec2::ZERO);
        assert_eq!(state.particles.len(), 50);
    }

    #[test]
    fn test_same_seed_same_spawns() {
        let mut a = playing(77);
        let mut b = playing(77);
        for _ in 0..10 {
            spawn_fruit(&mut a);
            spawn_fruit(&mut b);
        }
        assert_eq!(a.fruits, b.fruits);
    }
}
