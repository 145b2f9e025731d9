//! On-screen notification banner
//!
//! Messages expire on their own; the frame loop calls [`NotificationQueue::update`]
//! once per frame and shows [`NotificationQueue::current`].

use std::collections::VecDeque;

use crate::consts::NOTIFICATION_LIFE_MS;
use crate::sim::{GameEvent, PowerupKind};

/// A banner message with its remaining display time
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub text: String,
    pub remaining_ms: f32,
}

/// Expiring messages, newest last
#[derive(Debug, Clone, Default)]
pub struct NotificationQueue {
    items: VecDeque<Notification>,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a message for the standard lifetime
    pub fn push(&mut self, text: impl Into<String>) {
        self.items.push_back(Notification {
            text: text.into(),
            remaining_ms: NOTIFICATION_LIFE_MS,
        });
    }

    /// Queue the banner for an event, if it has one
    ///
    /// Returns true if a message was queued.
    pub fn push_event(&mut self, event: &GameEvent) -> bool {
        match Self::message_for(event) {
            Some(text) => {
                self.push(text);
                true
            }
            None => false,
        }
    }

    /// Banner text for an event
    pub fn message_for(event: &GameEvent) -> Option<String> {
        let text = match event {
            GameEvent::PowerupActivated(kind) => match kind {
                PowerupKind::Freeze => "Time Freeze activated! Fruits move slower!".to_string(),
                PowerupKind::Double => "Double Points activated! Score twice as much!".to_string(),
                PowerupKind::Magnet => {
                    "Fruit Magnet activated! Fruits are attracted to your slices!".to_string()
                }
            },
            GameEvent::PowerupExpired(kind) => {
                let name = kind.as_str();
                let mut chars = name.chars();
                let capitalized: String = match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                };
                format!("{} powerup expired!", capitalized)
            }
            GameEvent::AchievementUnlocked(a) => format!("Achievement Unlocked: {}", a.title()),
            GameEvent::LevelUp { level } => format!("Level Up! You are now level {}!", level),
            _ => return None,
        };
        Some(text)
    }

    /// Age messages by one frame and drop the expired ones
    pub fn update(&mut self, dt_ms: f32) {
        self.items.retain_mut(|n| {
            n.remaining_ms -= dt_ms;
            n.remaining_ms > 0.0
        });
    }

    /// The message on display (latest live one)
    pub fn current(&self) -> Option<&str> {
        self.items.back().map(|n| n.text.as_str())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Achievement;

    #[test]
    fn test_messages() {
        assert_eq!(
            NotificationQueue::message_for(&GameEvent::PowerupActivated(PowerupKind::Freeze))
                .as_deref(),
            Some("Time Freeze activated! Fruits move slower!")
        );
        assert_eq!(
            NotificationQueue::message_for(&GameEvent::PowerupExpired(PowerupKind::Freeze))
                .as_deref(),
            Some("Freeze powerup expired!")
        );
        assert_eq!(
            NotificationQueue::message_for(&GameEvent::LevelUp { level: 3 }).as_deref(),
            Some("Level Up! You are now level 3!")
        );
        assert_eq!(
            NotificationQueue::message_for(&GameEvent::AchievementUnlocked(
                Achievement::ComboFive
            ))
            .as_deref(),
            Some("Achievement Unlocked: 5x Combo Master!")
        );
        assert_eq!(NotificationQueue::message_for(&GameEvent::ComboReset), None);
    }

    #[test]
    fn test_expiry() {
        let mut q = NotificationQueue::new();
        q.push("first");
        q.update(1000.0);
        q.push("second");
        assert_eq!(q.current(), Some("second"));

        q.update(2000.0);
        assert_eq!(q.len(), 1);
        q.update(999.0);
        assert_eq!(q.current(), Some("second"));
        q.update(1.0);
        assert!(q.is_empty());
        assert_eq!(q.current(), None);
    }

    #[test]
    fn test_push_event_skips_silent_events() {
        let mut q = NotificationQueue::new();
        assert!(!q.push_event(&GameEvent::ComboReset));
        assert!(q.push_event(&GameEvent::PowerupActivated(PowerupKind::Magnet)));
        assert_eq!(q.len(), 1);
    }
}
