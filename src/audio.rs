//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects - no external files needed!
//! Cue selection is plain Rust and works on every target; playback is
//! browser-only and goes silent when no audio context can be created.

use crate::sim::GameEvent;

/// Fruit hits from this combo upward add the combo cue
pub const COMBO_CUE_THRESHOLD: u32 = 3;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// Blade through a fruit
    Slice,
    /// Chained hits
    Combo,
    /// Bomb sliced
    Bomb,
    /// Power-up activated
    Powerup,
    /// Achievement unlocked
    Achievement,
    /// Player levelled up
    LevelUp,
    /// Run ended
    GameOver,
}

impl SoundCue {
    /// Cues to play for a simulation event, in order
    pub fn for_event(event: &GameEvent) -> &'static [SoundCue] {
        match event {
            GameEvent::FruitSliced { combo, .. } if *combo >= COMBO_CUE_THRESHOLD => {
                &[SoundCue::Slice, SoundCue::Combo]
            }
            GameEvent::FruitSliced { .. } => &[SoundCue::Slice],
            GameEvent::BombHit { .. } => &[SoundCue::Bomb],
            GameEvent::PowerupActivated(_) => &[SoundCue::Powerup],
            GameEvent::AchievementUnlocked(_) => &[SoundCue::Achievement],
            GameEvent::LevelUp { .. } => &[SoundCue::LevelUp],
            GameEvent::GameOver { .. } => &[SoundCue::GameOver],
            GameEvent::PowerupExpired(_) | GameEvent::ComboReset => &[],
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use player::AudioManager;

#[cfg(target_arch = "wasm32")]
mod player {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::SoundCue;
    use crate::settings::Settings;
    use crate::sim::GameEvent;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        volume: f32,
        muted: bool,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: 0.8,
                muted: false,
            }
        }

        /// Pick up volume changes from settings
        pub fn apply_settings(&mut self, settings: &Settings) {
            self.volume = settings.effective_volume();
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Mute/unmute all audio
        pub fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
        }

        fn effective_volume(&self) -> f32 {
            if self.muted { 0.0 } else { self.volume }
        }

        /// Play every cue attached to an event
        pub fn play_event(&self, event: &GameEvent) {
            for &cue in SoundCue::for_event(event) {
                self.play(cue);
            }
        }

        /// Play a sound effect
        pub fn play(&self, cue: SoundCue) {
            let vol = self.effective_volume();
            if vol <= 0.0 {
                return;
            }

            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match cue {
                SoundCue::Slice => self.play_slice(ctx, vol),
                SoundCue::Combo => self.play_combo(ctx, vol),
                SoundCue::Bomb => self.play_bomb(ctx, vol),
                SoundCue::Powerup => self.play_powerup(ctx, vol),
                SoundCue::Achievement => self.play_achievement(ctx, vol),
                SoundCue::LevelUp => self.play_level_up(ctx, vol),
                SoundCue::GameOver => self.play_game_over(ctx, vol),
            }
        }

        // === Sound generators ===

        /// Create an oscillator with gain envelope
        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Short ascending arpeggio
        fn play_arpeggio(
            &self,
            ctx: &AudioContext,
            vol: f32,
            notes: &[f32],
            step: f64,
            len: f64,
            osc_type: OscillatorType,
        ) {
            for (i, freq) in notes.iter().enumerate() {
                let delay = i as f64 * step;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, osc_type) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + len)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + len + 0.05).ok();
                }
            }
        }

        /// Slice - fast downward swish
        fn play_slice(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 900.0, OscillatorType::Triangle) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.12)
                .ok();
            osc.frequency().set_value_at_time(900.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(200.0, t + 0.12)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.15).ok();
        }

        /// Combo - quick bright chirp
        fn play_combo(&self, ctx: &AudioContext, vol: f32) {
            self.play_arpeggio(
                ctx,
                vol * 0.2,
                &[800.0, 1000.0, 1200.0],
                0.05,
                0.12,
                OscillatorType::Sine,
            );
        }

        /// Bomb - boom!
        fn play_bomb(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 100.0, OscillatorType::Sawtooth) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.5, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.4)
                .ok();
            osc.frequency().set_value_at_time(100.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(30.0, t + 0.4)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.5).ok();

            // High frequency crack
            if let Some((osc2, gain2)) = self.create_osc(ctx, 1500.0, OscillatorType::Square) {
                gain2.gain().set_value_at_time(vol * 0.2, t).ok();
                gain2
                    .gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.1)
                    .ok();
                osc2.start().ok();
                osc2.stop_with_when(t + 0.15).ok();
            }
        }

        /// Powerup - happy ding
        fn play_powerup(&self, ctx: &AudioContext, vol: f32) {
            self.play_arpeggio(
                ctx,
                vol * 0.25,
                &[600.0, 800.0, 1000.0],
                0.08,
                0.15,
                OscillatorType::Sine,
            );
        }

        /// Achievement - triumphant fanfare
        fn play_achievement(&self, ctx: &AudioContext, vol: f32) {
            self.play_arpeggio(
                ctx,
                vol * 0.3,
                &[400.0, 500.0, 600.0, 800.0],
                0.1,
                0.4,
                OscillatorType::Triangle,
            );
        }

        /// Level up - celebratory run
        fn play_level_up(&self, ctx: &AudioContext, vol: f32) {
            self.play_arpeggio(
                ctx,
                vol * 0.25,
                &[500.0, 600.0, 700.0, 800.0, 1000.0],
                0.08,
                0.25,
                OscillatorType::Triangle,
            );
        }

        /// Game over - sad descending
        fn play_game_over(&self, ctx: &AudioContext, vol: f32) {
            self.play_arpeggio(
                ctx,
                vol * 0.3,
                &[400.0, 350.0, 300.0, 200.0],
                0.2,
                0.3,
                OscillatorType::Sine,
            );
        }
    }
}
