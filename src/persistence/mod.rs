//! Key/value persistence for scores and settings
//!
//! Values are JSON strings. The browser build talks to LocalStorage; native
//! builds and tests use an in-memory map.

use std::collections::HashMap;

use crate::error::StorageError;
use crate::highscores::HighScores;

/// LocalStorage key for the ranked score list
pub const SCORES_KEY: &str = "fruit_slice_highscores";
/// LocalStorage key for settings
pub const SETTINGS_KEY: &str = "fruit_slice_settings";

/// String key/value store
pub trait Store {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str);
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }
}

/// Browser LocalStorage
#[cfg(target_arch = "wasm32")]
pub struct LocalStorageStore {
    storage: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    /// Open the window's LocalStorage, if the browser allows it
    pub fn open() -> Result<Self, StorageError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StorageError::Unavailable)?;
        Ok(Self { storage })
    }
}

#[cfg(target_arch = "wasm32")]
impl Store for LocalStorageStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage
            .set_item(key, value)
            .map_err(|_| StorageError::WriteRejected(key.to_string()))
    }

    fn remove(&mut self, key: &str) {
        let _ = self.storage.remove_item(key);
    }
}

/// Load the ranked list; missing or malformed data yields an empty list
pub fn load_ranked_scores(store: &dyn Store) -> HighScores {
    match store.get(SCORES_KEY) {
        Some(json) => HighScores::from_json(&json),
        None => {
            log::info!("No high scores found, starting fresh");
            HighScores::new()
        }
    }
}

/// Save the ranked list
pub fn save_ranked_scores(store: &mut dyn Store, scores: &HighScores) -> Result<(), StorageError> {
    let json = serde_json::to_string(scores)?;
    store.set(SCORES_KEY, &json)?;
    log::info!("High scores saved ({} entries)", scores.entries.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scores_round_trip_through_store() {
        let mut store = MemoryStore::new();
        let mut scores = HighScores::new();
        scores.add_score("ada", 120, 2, 1.0);
        scores.add_score("bob", 80, 1, 2.0);
        save_ranked_scores(&mut store, &scores).unwrap();

        let loaded = load_ranked_scores(&store);
        assert_eq!(loaded.entries.len(), 2);
        assert_eq!(loaded.entries[0].name, "ada");
        assert_eq!(loaded.top_score(), Some(120));
    }

    #[test]
    fn test_malformed_scores_fall_back_to_empty() {
        let mut store = MemoryStore::new();
        store.set(SCORES_KEY, "{not json").unwrap();
        assert!(load_ranked_scores(&store).is_empty());

        store.remove(SCORES_KEY);
        assert!(load_ranked_scores(&store).is_empty());
    }
}
