//! Time- and context-based proactive engagement rules.
//!
//! Each rule arms a one-shot timer keyed off engine start. On firing, if the
//! widget is closed and the condition still holds, the rule's message becomes
//! the single pending proactive message (surfaced as a badge, appended to
//! history only when the widget next opens). A newer firing overwrites an
//! unconsumed pending message.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Predicate over session/page state, evaluated at fire time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProactiveCondition {
    /// This is the client's first-ever visit.
    FirstVisit,
    /// The user has been on the site at least this many seconds.
    TimeOnSiteOver { secs: u64 },
    /// The host page is currently on this route fragment.
    OnRoute { route: String },
}

impl ProactiveCondition {
    /// Evaluates the predicate against the current session/page state.
    pub fn holds(&self, visit_count: u64, time_on_site_secs: u64, route: &str) -> bool {
        match self {
            ProactiveCondition::FirstVisit => visit_count == 1,
            ProactiveCondition::TimeOnSiteOver { secs } => time_on_site_secs >= *secs,
            ProactiveCondition::OnRoute { route: wanted } => route == wanted,
        }
    }
}

/// A one-shot proactive engagement rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProactiveRule {
    /// Delay from engine start before the rule fires.
    #[serde(with = "duration_secs")]
    pub delay: Duration,
    /// Condition re-checked at fire time.
    pub condition: ProactiveCondition,
    /// Message surfaced when the rule fires.
    pub message: String,
}

impl ProactiveRule {
    pub fn new(
        delay: Duration,
        condition: ProactiveCondition,
        message: impl Into<String>,
    ) -> Self {
        Self {
            delay,
            condition,
            message: message.into(),
        }
    }
}

/// The standard rule set.
pub fn default_rules() -> Vec<ProactiveRule> {
    vec![
        ProactiveRule::new(
            Duration::from_secs(15),
            ProactiveCondition::OnRoute {
                route: "#quote-estimator".to_string(),
            },
            "🧮 Need help with the quote calculator? I'm here to assist!",
        ),
        ProactiveRule::new(
            Duration::from_secs(30),
            ProactiveCondition::FirstVisit,
            "👋 New here? I can help you find the perfect web solution!",
        ),
        ProactiveRule::new(
            Duration::from_secs(120),
            ProactiveCondition::TimeOnSiteOver { secs: 120 },
            "💡 Need help with pricing? I can give you an instant estimate!",
        ),
    ]
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_secs(u64::deserialize(deserializer)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_visit_condition() {
        let condition = ProactiveCondition::FirstVisit;
        assert!(condition.holds(1, 0, "#home"));
        assert!(!condition.holds(2, 0, "#home"));
    }

    #[test]
    fn test_time_on_site_condition() {
        let condition = ProactiveCondition::TimeOnSiteOver { secs: 120 };
        assert!(!condition.holds(1, 119, "#home"));
        assert!(condition.holds(1, 120, "#home"));
        assert!(condition.holds(1, 500, "#home"));
    }

    #[test]
    fn test_route_condition() {
        let condition = ProactiveCondition::OnRoute {
            route: "#quote-estimator".to_string(),
        };
        assert!(condition.holds(3, 0, "#quote-estimator"));
        assert!(!condition.holds(3, 0, "#home"));
    }

    #[test]
    fn test_default_rules_fire_in_delay_order() {
        let rules = default_rules();
        assert_eq!(rules.len(), 3);
        assert!(rules.windows(2).all(|w| w[0].delay <= w[1].delay));
    }

    #[test]
    fn test_rule_serialization_round_trip() {
        let rule = ProactiveRule::new(
            Duration::from_secs(30),
            ProactiveCondition::FirstVisit,
            "hello",
        );
        let json = serde_json::to_string(&rule).unwrap();
        assert_eq!(serde_json::from_str::<ProactiveRule>(&json).unwrap(), rule);
    }
}
