//! Power-up timers
//!
//! Each kind is either inactive or active with a remaining duration. The
//! remaining duration is the only stored state, so `remaining > 0` and
//! "active" can never disagree.

use serde::{Deserialize, Serialize};

use super::state::{GameEvent, PowerupKind};
use crate::consts::{FREEZE_TIME_SCALE, POWERUP_DURATION_MS};

/// Remaining duration per power-up kind (ms, 0 = inactive)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PowerupTimers {
    remaining: [f32; 3],
}

impl PowerupTimers {
    pub fn is_active(&self, kind: PowerupKind) -> bool {
        self.remaining[kind.index()] > 0.0
    }

    /// Remaining duration in ms (0 when inactive)
    pub fn remaining(&self, kind: PowerupKind) -> f32 {
        self.remaining[kind.index()]
    }

    /// Start a power-up. Already-active kinds keep their current timer.
    ///
    /// Returns true if the power-up was inactive and is now running.
    pub fn activate(&mut self, kind: PowerupKind) -> bool {
        if self.is_active(kind) {
            return false;
        }
        self.remaining[kind.index()] = POWERUP_DURATION_MS;
        true
    }

    /// Age active timers, pushing an expiry event for each that runs out
    pub fn tick(&mut self, dt_ms: f32, events: &mut Vec<GameEvent>) {
        for kind in PowerupKind::ALL {
            let slot = &mut self.remaining[kind.index()];
            if *slot <= 0.0 {
                continue;
            }
            *slot -= dt_ms;
            if *slot <= 0.0 {
                *slot = 0.0;
                log::info!("Powerup expired: {}", kind.as_str());
                events.push(GameEvent::PowerupExpired(kind));
            }
        }
    }

    /// Fruit motion multiplier
    pub fn time_scale(&self) -> f32 {
        if self.is_active(PowerupKind::Freeze) {
            FREEZE_TIME_SCALE
        } else {
            1.0
        }
    }

    /// Spawn interval multiplier
    pub fn spawn_interval_factor(&self) -> f32 {
        if self.is_active(PowerupKind::Freeze) { 2.0 } else { 1.0 }
    }

    /// Points multiplier for regular fruit
    pub fn point_multiplier(&self) -> u64 {
        if self.is_active(PowerupKind::Double) { 2 } else { 1 }
    }

    pub fn magnet_active(&self) -> bool {
        self.is_active(PowerupKind::Magnet)
    }

    /// Currently active kinds
    pub fn active(&self) -> impl Iterator<Item = PowerupKind> + '_ {
        PowerupKind::ALL.into_iter().filter(|k| self.is_active(*k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activate_and_expire() {
        let mut timers = PowerupTimers::default();
        let mut events = Vec::new();

        assert!(!timers.is_active(PowerupKind::Double));
        assert!(timers.activate(PowerupKind::Double));
        assert!(timers.is_active(PowerupKind::Double));
        assert_eq!(timers.point_multiplier(), 2);

        timers.tick(4000.0, &mut events);
        assert!(timers.is_active(PowerupKind::Double));
        assert!(events.is_empty());

        timers.tick(1000.0, &mut events);
        assert!(!timers.is_active(PowerupKind::Double));
        assert_eq!(timers.remaining(PowerupKind::Double), 0.0);
        assert_eq!(events, vec![GameEvent::PowerupExpired(PowerupKind::Double)]);

        // No repeated expiry
        timers.tick(1000.0, &mut events);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_reactivation_keeps_timer() {
        let mut timers = PowerupTimers::default();
        let mut events = Vec::new();
        timers.activate(PowerupKind::Magnet);
        timers.tick(3000.0, &mut events);
        assert!(!timers.activate(PowerupKind::Magnet));
        assert!((timers.remaining(PowerupKind::Magnet) - 2000.0).abs() < 1e-3);
    }

    #[test]
    fn test_freeze_modifiers() {
        let mut timers = PowerupTimers::default();
        assert_eq!(timers.time_scale(), 1.0);
        assert_eq!(timers.spawn_interval_factor(), 1.0);
        timers.activate(PowerupKind::Freeze);
        assert_eq!(timers.time_scale(), 0.5);
        assert_eq!(timers.spawn_interval_factor(), 2.0);
        assert_eq!(timers.point_multiplier(), 1);
        assert!(!timers.magnet_active());
    }

    #[test]
    fn test_kinds_are_independent() {
        let mut timers = PowerupTimers::default();
        let mut events = Vec::new();
        timers.activate(PowerupKind::Freeze);
        timers.tick(2500.0, &mut events);
        timers.activate(PowerupKind::Magnet);
        timers.tick(2500.0, &mut events);
        assert_eq!(events, vec![GameEvent::PowerupExpired(PowerupKind::Freeze)]);
        assert_eq!(timers.active().collect::<Vec<_>>(), vec![PowerupKind::Magnet]);
    }
}
