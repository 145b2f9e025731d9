//! Score, combo, experience and achievements

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::state::GameEvent;
use crate::consts::*;

/// One-shot achievements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Achievement {
    /// Slice 10 fruits
    SliceTen,
    /// Reach a 5x combo
    ComboFive,
    /// Score 100 points
    ScoreHundred,
    /// Land a critical hit
    Critical,
}

impl Achievement {
    pub const ALL: [Achievement; 4] = [
        Achievement::SliceTen,
        Achievement::ComboFive,
        Achievement::ScoreHundred,
        Achievement::Critical,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Achievement::SliceTen => "slice10",
            Achievement::ComboFive => "combo5",
            Achievement::ScoreHundred => "score100",
            Achievement::Critical => "critical",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Achievement::SliceTen => "Slice 10 fruits!",
            Achievement::ComboFive => "5x Combo Master!",
            Achievement::ScoreHundred => "Score 100 points!",
            Achievement::Critical => "Critical Hit!",
        }
    }
}

/// Player progress
///
/// Score, lives, combo and hit counters belong to one run. Level, XP and
/// achievements build up across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progression {
    pub score: u64,
    pub lives: u8,
    /// Point multiplier, never below 1
    pub combo: u32,
    /// Time left before the combo drops back to 1 (ms)
    pub combo_timer_ms: f32,
    pub xp: u64,
    pub xp_to_next_level: u64,
    pub level: u32,
    pub fruits_sliced: u32,
    pub critical_hits: u32,
    pub achievements: BTreeSet<Achievement>,
}

impl Default for Progression {
    fn default() -> Self {
        Self {
            score: 0,
            lives: STARTING_LIVES,
            combo: 1,
            combo_timer_ms: 0.0,
            xp: 0,
            xp_to_next_level: FIRST_LEVEL_XP,
            level: 1,
            fruits_sliced: 0,
            critical_hits: 0,
            achievements: BTreeSet::new(),
        }
    }
}

impl Progression {
    /// Points for a fruit before the double power-up and combo
    pub fn base_points(critical: bool) -> u64 {
        if critical { BASE_POINTS * 2 } else { BASE_POINTS }
    }

    /// Clear the per-run counters, keeping level, XP and achievements
    pub fn begin_run(&mut self) {
        self.score = 0;
        self.lives = STARTING_LIVES;
        self.fruits_sliced = 0;
        self.critical_hits = 0;
        self.reset_combo();
    }

    /// Count down the combo window; returns true if the combo just lapsed
    pub fn tick_combo(&mut self, dt_ms: f32) -> bool {
        if self.combo <= 1 {
            return false;
        }
        self.combo_timer_ms -= dt_ms;
        if self.combo_timer_ms <= 0.0 {
            self.reset_combo();
            return true;
        }
        false
    }

    pub fn reset_combo(&mut self) {
        self.combo = 1;
        self.combo_timer_ms = 0.0;
    }

    /// Combo meter fill 0-1
    pub fn combo_fill(&self) -> f32 {
        (self.combo_timer_ms / MAX_COMBO_TIMER_MS).clamp(0.0, 1.0)
    }

    /// Level progress fill 0-1
    pub fn level_fill(&self) -> f32 {
        if self.xp_to_next_level == 0 {
            return 0.0;
        }
        (self.xp as f32 / self.xp_to_next_level as f32).clamp(0.0, 1.0)
    }

    pub fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
    }

    /// Score a regular fruit and advance the combo
    ///
    /// Points are `10`, doubled for a critical fruit, times `multiplier`
    /// (the double power-up), times the combo before this hit.
    pub fn award_fruit(&mut self, critical: bool, multiplier: u64) -> u64 {
        self.fruits_sliced += 1;

        if critical {
            self.critical_hits += 1;
        }
        let points = Self::base_points(critical) * multiplier * self.combo as u64;

        self.score += points;
        self.xp += points;

        self.combo += 1;
        self.combo_timer_ms = MAX_COMBO_TIMER_MS;

        points
    }

    /// Unlock an achievement once; returns true on the first unlock
    pub fn unlock(&mut self, achievement: Achievement, events: &mut Vec<GameEvent>) -> bool {
        if !self.achievements.insert(achievement) {
            return false;
        }
        log::info!("Achievement unlocked: {}", achievement.id());
        events.push(GameEvent::AchievementUnlocked(achievement));
        true
    }

    pub fn has(&self, achievement: Achievement) -> bool {
        self.achievements.contains(&achievement)
    }

    /// Unlock any threshold achievements that have been crossed
    pub fn check_achievements(&mut self, events: &mut Vec<GameEvent>) {
        if self.fruits_sliced >= SLICE_ACHIEVEMENT_COUNT {
            self.unlock(Achievement::SliceTen, events);
        }
        if self.combo >= COMBO_ACHIEVEMENT {
            self.unlock(Achievement::ComboFive, events);
        }
        if self.score >= SCORE_ACHIEVEMENT {
            self.unlock(Achievement::ScoreHundred, events);
        }
    }

    /// Apply every level-up the current XP pays for
    ///
    /// Returns the number of levels gained.
    pub fn check_level_up(&mut self, events: &mut Vec<GameEvent>) -> u32 {
        let mut gained = 0;
        while self.xp_to_next_level > 0 && self.xp >= self.xp_to_next_level {
            self.xp -= self.xp_to_next_level;
            self.level += 1;
            self.xp_to_next_level = self.xp_to_next_level * 3 / 2;
            gained += 1;
            log::info!("Level up: {}", self.level);
            events.push(GameEvent::LevelUp { level: self.level });
        }
        gained
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combo_sequence() {
        let mut p = Progression::default();
        let points: Vec<u64> = (0..3).map(|_| p.award_fruit(false, 1)).collect();
        assert_eq!(points, vec![10, 20, 30]);
        assert_eq!(p.score, 60);
        assert_eq!(p.combo, 4);
        assert_eq!(p.fruits_sliced, 3);
    }

    #[test]
    fn test_double_stacks_with_combo() {
        let mut p = Progression::default();
        p.award_fruit(false, 2);
        p.award_fruit(false, 2);
        assert_eq!(p.award_fruit(false, 2), 60);
    }

    #[test]
    fn test_critical_doubles_base() {
        let mut p = Progression::default();
        assert_eq!(p.award_fruit(true, 2), 40);
        assert_eq!(p.critical_hits, 1);
    }

    #[test]
    fn test_combo_timeout() {
        let mut p = Progression::default();
        p.award_fruit(false, 1);
        assert_eq!(p.combo, 2);
        assert!(!p.tick_combo(2999.0));
        assert_eq!(p.combo, 2);
        assert!(p.tick_combo(1.0));
        assert_eq!(p.combo, 1);
        assert_eq!(p.combo_timer_ms, 0.0);
        // Idle at combo 1
        assert!(!p.tick_combo(5000.0));
    }

    #[test]
    fn test_level_up_thresholds() {
        let mut p = Progression::default();
        let mut events = Vec::new();
        p.xp = 120;
        assert_eq!(p.check_level_up(&mut events), 1);
        assert_eq!(p.level, 2);
        assert_eq!(p.xp, 20);
        assert_eq!(p.xp_to_next_level, 150);

        // Threshold growth is floored: 150 -> 225 -> 337
        p.xp = 150 + 225;
        assert_eq!(p.check_level_up(&mut events), 2);
        assert_eq!(p.level, 4);
        assert_eq!(p.xp, 0);
        assert_eq!(p.xp_to_next_level, 337);
        assert_eq!(
            events,
            vec![
                GameEvent::LevelUp { level: 2 },
                GameEvent::LevelUp { level: 3 },
                GameEvent::LevelUp { level: 4 },
            ]
        );
    }

    #[test]
    fn test_achievements_are_monotonic() {
        let mut p = Progression::default();
        let mut events = Vec::new();

        p.score = 150;
        p.check_achievements(&mut events);
        assert!(p.has(Achievement::ScoreHundred));
        assert_eq!(events.len(), 1);

        // Drop below and cross again
        p.score = 50;
        p.check_achievements(&mut events);
        assert!(p.has(Achievement::ScoreHundred));
        p.score = 150;
        p.check_achievements(&mut events);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_combo_five_unlocks_on_fifth_combo() {
        let mut p = Progression::default();
        let mut events = Vec::new();
        for _ in 0..3 {
            p.award_fruit(false, 1);
            p.check_achievements(&mut events);
        }
        assert!(!p.has(Achievement::ComboFive));
        p.award_fruit(false, 1);
        p.check_achievements(&mut events);
        assert!(p.has(Achievement::ComboFive));
    }

    #[test]
    fn test_begin_run_keeps_career() {
        let mut p = Progression::default();
        let mut events = Vec::new();
        p.xp = 95;
        p.award_fruit(true, 1);
        p.check_achievements(&mut events);
        p.check_level_up(&mut events);
        p.unlock(Achievement::Critical, &mut events);
        p.lose_life();

        p.begin_run();
        assert_eq!(p.score, 0);
        assert_eq!(p.lives, STARTING_LIVES);
        assert_eq!(p.combo, 1);
        assert_eq!(p.combo_timer_ms, 0.0);
        assert_eq!(p.fruits_sliced, 0);
        assert_eq!(p.critical_hits, 0);
        assert_eq!(p.level, 2);
        assert_eq!(p.xp, 15);
        assert_eq!(p.xp_to_next_level, 150);
        assert!(p.has(Achievement::Critical));
    }

    #[test]
    fn test_base_points() {
        assert_eq!(Progression::base_points(false), 10);
        assert_eq!(Progression::base_points(true), 20);
    }

    #[test]
    fn test_lives_saturate() {
        let mut p = Progression::default();
        for _ in 0..5 {
            p.lose_life();
        }
        assert_eq!(p.lives, 0);
    }
}
