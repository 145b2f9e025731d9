//! High score leaderboard system
//!
//! Persisted as a plain JSON array, tracks top 10 scores.

use serde::{Deserialize, Serialize};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// Name stored when the player leaves the field blank
pub const DEFAULT_NAME: &str = "Anonymous";

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub name: String,
    pub score: u64,
    /// Player level reached
    pub level: u32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// High score leaderboard, sorted descending by score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Parse a stored list, falling back to empty on malformed data
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<HighScores>(json) {
            Ok(mut scores) => {
                // Restore ordering in case the stored list was edited
                scores.entries.sort_by(|a, b| b.score.cmp(&a.score));
                scores.entries.truncate(MAX_HIGH_SCORES);
                log::info!("Loaded {} high scores", scores.entries.len());
                scores
            }
            Err(e) => {
                log::warn!("Ignoring malformed high scores: {}", e);
                Self::new()
            }
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Check if score beats the lowest entry
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Add a new score to the leaderboard (if it qualifies)
    ///
    /// Equal scores rank below the ones already listed. Returns the rank
    /// achieved (1-indexed) or None if it didn't qualify.
    pub fn add_score(&mut self, name: &str, score: u64, level: u32, timestamp: f64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let name = name.trim();
        let entry = HighScoreEntry {
            name: if name.is_empty() {
                DEFAULT_NAME.to_string()
            } else {
                name.to_string()
            },
            score,
            level,
            timestamp,
        };

        // Find insertion point (sorted descending by score)
        let pos = self.entries.iter().position(|e| score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        // Trim to max size
        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// First `limit` entries
    pub fn top(&self, limit: usize) -> &[HighScoreEntry] {
        &self.entries[..limit.min(self.entries.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn scores_of(h: &HighScores) -> Vec<u64> {
        h.entries.iter().map(|e| e.score).collect()
    }

    #[test]
    fn test_duplicate_scores_keep_insertion_order() {
        let mut h = HighScores::new();
        h.add_score("a", 50, 1, 0.0);
        h.add_score("b", 80, 1, 0.0);
        h.add_score("c", 30, 1, 0.0);
        let rank = h.add_score("d", 80, 1, 0.0);
        assert_eq!(scores_of(&h), vec![80, 80, 50, 30]);
        assert_eq!(rank, Some(2));
        assert_eq!(h.entries[0].name, "b");
        assert_eq!(h.entries[1].name, "d");
    }

    #[test]
    fn test_truncates_lowest() {
        let mut h = HighScores::new();
        for s in 1..=10 {
            h.add_score("p", s * 10, 1, 0.0);
        }
        assert!(!h.qualifies(10));
        assert!(h.qualifies(11));
        assert_eq!(h.add_score("late", 5, 1, 0.0), None);
        assert_eq!(h.add_score("new", 55, 1, 0.0), Some(6));
        assert_eq!(h.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(h.entries.last().map(|e| e.score), Some(20));
    }

    #[test]
    fn test_blank_name_is_anonymous() {
        let mut h = HighScores::new();
        h.add_score("   ", 10, 1, 0.0);
        assert_eq!(h.entries[0].name, DEFAULT_NAME);
    }

    #[test]
    fn test_json_is_plain_array() {
        let mut h = HighScores::new();
        h.add_score("ada", 10, 3, 5.0);
        let json = serde_json::to_string(&h).unwrap();
        assert!(json.starts_with('['));
        assert_eq!(HighScores::from_json(&json), h);
    }

    #[test]
    fn test_from_json_fallbacks() {
        assert!(HighScores::from_json("").is_empty());
        assert!(HighScores::from_json("{\"entries\": 5}").is_empty());
        let unsorted = r#"[{"name":"a","score":1,"level":1,"timestamp":0.0},
                           {"name":"b","score":9,"level":1,"timestamp":0.0}]"#;
        assert_eq!(HighScores::from_json(unsorted).top_score(), Some(9));
    }

    proptest! {
        #[test]
        fn prop_sorted_and_capped(scores in proptest::collection::vec(0u64..1000, 0..40)) {
            let mut h = HighScores::new();
            for s in &scores {
                h.add_score("p", *s, 1, 0.0);
            }
            let listed = scores_of(&h);
            prop_assert!(listed.len() <= MAX_HIGH_SCORES);
            prop_assert!(listed.windows(2).all(|w| w[0] >= w[1]));

            let mut expected = scores.clone();
            expected.sort_by(|a, b| b.cmp(a));
            expected.truncate(MAX_HIGH_SCORES);
            prop_assert_eq!(listed, expected);
        }
    }
}
