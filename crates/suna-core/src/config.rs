//! Engine configuration.

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Tunable engine parameters.
///
/// Defaults reproduce the production widget's behavior; deployments can
/// override individual fields from a TOML snippet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Bound on retained history.
    pub history_cap: usize,
    /// Messages replayed into the transcript on restore.
    pub replay_count: usize,
    /// Persisted history older than this is discarded on restore.
    pub restore_window_hours: i64,
    /// Voice transcripts below this confidence ask for confirmation.
    pub confidence_threshold: f32,
    /// Lower bound of the synthetic "thinking" delay.
    pub thinking_delay_min_ms: u64,
    /// Upper bound of the synthetic "thinking" delay.
    pub thinking_delay_max_ms: u64,
    /// Submissions beyond this count inside the burst window are dropped.
    pub burst_limit: usize,
    /// Length of the burst window in seconds.
    pub burst_window_secs: u64,
    /// Externally-seeded flag simulating human agent presence.
    pub agent_available: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            history_cap: 50,
            replay_count: 10,
            restore_window_hours: 24,
            confidence_threshold: crate::speech::CONFIDENCE_THRESHOLD,
            thinking_delay_min_ms: 1000,
            thinking_delay_max_ms: 3000,
            burst_limit: 5,
            burst_window_secs: 10,
            agent_available: true,
        }
    }
}

impl EngineConfig {
    /// Parses a config from a TOML string; missing fields take defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_widget_behavior() {
        let config = EngineConfig::default();
        assert_eq!(config.history_cap, 50);
        assert_eq!(config.replay_count, 10);
        assert_eq!(config.restore_window_hours, 24);
        assert_eq!(config.confidence_threshold, 0.7);
        assert_eq!(config.thinking_delay_min_ms, 1000);
        assert_eq!(config.thinking_delay_max_ms, 3000);
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config = EngineConfig::from_toml_str("burst_limit = 3\nagent_available = false").unwrap();
        assert_eq!(config.burst_limit, 3);
        assert!(!config.agent_available);
        assert_eq!(config.history_cap, 50);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(EngineConfig::from_toml_str("history_cap = \"many\"").is_err());
    }
}
