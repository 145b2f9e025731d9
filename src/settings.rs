//! Game settings and preferences
//!
//! Persisted separately from high scores in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::persistence::{SETTINGS_KEY, Store};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    /// Preset after this one, wrapping back to Low
    pub fn next(self) -> Self {
        match self {
            QualityPreset::Low => QualityPreset::Medium,
            QualityPreset::Medium => QualityPreset::High,
            QualityPreset::High => QualityPreset::Low,
        }
    }

    /// Maximum particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 200,
            QualityPreset::Medium => 600,
            QualityPreset::High => 1500,
        }
    }

    /// Ambient motes behind the play area
    pub fn background_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 0,
            QualityPreset::Medium => 50,
            QualityPreset::High => 80,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Visual Effects ===
    /// Juice and explosion particles
    pub particles: bool,
    /// Fading slice segments
    pub slice_trails: bool,
    /// Ambient background motes
    pub background: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Mute when window loses focus
    pub mute_on_blur: bool,

    // === Accessibility ===
    /// Reduced motion (no ambient drift)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,

            particles: true,
            slice_trails: true,
            background: true,

            master_volume: 0.8,
            sfx_volume: 1.0,
            mute_on_blur: true,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Effective ambient mote count (respects reduced_motion)
    pub fn background_particles(&self) -> usize {
        if !self.background || self.reduced_motion {
            0
        } else {
            self.quality.background_particles()
        }
    }

    /// Gain applied to every sound cue
    pub fn effective_volume(&self) -> f32 {
        (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
    }

    /// Load settings from a store, defaulting on missing or bad data
    pub fn load_from(store: &dyn Store) -> Self {
        let Some(json) = store.get(SETTINGS_KEY) else {
            log::info!("Using default settings");
            return Self::default();
        };
        match serde_json::from_str(&json) {
            Ok(settings) => {
                log::info!("Loaded settings");
                settings
            }
            Err(e) => {
                log::warn!("Ignoring malformed settings: {}", e);
                Self::default()
            }
        }
    }

    /// Save settings to a store
    pub fn save_to(&self, store: &mut dyn Store) -> Result<(), StorageError> {
        let json = serde_json::to_string(self)?;
        store.set(SETTINGS_KEY, &json)?;
        log::info!("Settings saved");
        Ok(())
    }

    /// Step to the next quality preset and persist the change
    pub fn cycle_quality(&mut self, store: &mut dyn Store) -> Result<QualityPreset, StorageError> {
        self.quality = self.quality.next();
        log::info!("Quality set to {}", self.quality.as_str());
        self.save_to(store)?;
        Ok(self.quality)
    }
}
