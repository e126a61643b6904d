//! Persisted user preference flags.

use serde::{Deserialize, Serialize};

/// Tone the assistant should adopt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Personality {
    Helpful,
    Friendly,
    Professional,
    Casual,
}

impl Default for Personality {
    fn default() -> Self {
        Personality::Helpful
    }
}

/// User preference flags, persisted on every change.
///
/// Unknown or missing fields fall back to defaults so older stored payloads
/// keep deserializing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserPreferences {
    /// Speak bot replies aloud.
    pub voice_enabled: bool,
    /// Allow proactive notification badges.
    pub notifications_enabled: bool,
    /// Assistant tone.
    pub personality: Personality,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            voice_enabled: true,
            notifications_enabled: true,
            personality: Personality::Helpful,
        }
    }
}
