//! Ordered first-match-wins rule table.

use super::model::Intent;
use regex::Regex;

/// How a single rule decides whether it is satisfied.
///
/// Simple rules list keyword substrings; richer rules carry a compiled
/// regular expression covering synonyms.
pub enum IntentPattern {
    /// Satisfied when the input contains any of these substrings.
    Keywords(&'static [&'static str]),
    /// Satisfied when the regex matches anywhere in the input.
    Pattern(Regex),
}

/// One (pattern, intent) pair in the rule table.
///
/// Rules are immutable after construction; priority is implicit in the
/// table's declaration order.
pub struct IntentRule {
    pub intent: Intent,
    pattern: IntentPattern,
}

impl IntentRule {
    fn keywords(intent: Intent, keywords: &'static [&'static str]) -> Self {
        Self {
            intent,
            pattern: IntentPattern::Keywords(keywords),
        }
    }

    fn regex(intent: Intent, pattern: &str) -> Self {
        // Rule patterns are compile-time constants; a bad one is a programmer
        // error, not a runtime condition.
        Self {
            intent,
            pattern: IntentPattern::Pattern(
                Regex::new(pattern).expect("intent rule pattern must be valid"),
            ),
        }
    }

    /// Tests already-lowercased input against this rule.
    fn matches(&self, input: &str) -> bool {
        match &self.pattern {
            IntentPattern::Keywords(keywords) => keywords.iter().any(|k| input.contains(k)),
            IntentPattern::Pattern(regex) => regex.is_match(input),
        }
    }
}

/// Tests raw input against the ordered rule table.
///
/// Matching is a pure function of the input and the static table: input is
/// lowercased (no stemming), rules are evaluated in declaration order, and
/// the first satisfied rule short-circuits the rest. `None` means the caller
/// must fall back to the generic response set.
pub struct IntentMatcher {
    rules: Vec<IntentRule>,
}

impl IntentMatcher {
    /// Builds the standard rule table.
    ///
    /// Order matters: the greeting rule is anchored at the start of input so
    /// "hi, how much is a site?" greets rather than quotes.
    pub fn new() -> Self {
        let rules = vec![
            IntentRule::regex(
                Intent::Greeting,
                "^(hi|hello|hey|good morning|good afternoon|good evening)",
            ),
            IntentRule::regex(Intent::Pricing, "price|cost|how much|budget|quote|estimate"),
            IntentRule::regex(Intent::Services, "service|what do you do|capabilities|offer"),
            IntentRule::regex(Intent::Portfolio, "portfolio|work|examples|previous projects"),
            IntentRule::regex(Intent::Contact, "contact|phone|email|address|location"),
            IntentRule::regex(Intent::Meeting, "meeting|consultation|appointment|schedule"),
            IntentRule::regex(Intent::Urgent, "urgent|asap|quickly|rush|emergency"),
            IntentRule::keywords(Intent::Thanks, &["thank", "thanks", "appreciate"]),
            IntentRule::keywords(Intent::Goodbye, &["bye", "goodbye", "see you", "farewell"]),
            IntentRule::regex(Intent::Help, "help|support|assist|guidance"),
        ];
        Self { rules }
    }

    /// Returns the first matching intent for `input`, or `None`.
    pub fn match_input(&self, input: &str) -> Option<Intent> {
        let input = input.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&input))
            .map(|rule| rule.intent)
    }

    /// The rule table in evaluation order.
    pub fn rules(&self) -> &[IntentRule] {
        &self.rules
    }
}

impl Default for IntentMatcher {
    fn default() -> Self {
        Self::new()
    }
}
