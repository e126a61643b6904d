//! Intent inference over free-text user input.
//!
//! This module contains the coarse intent categories the engine understands,
//! the qualifier keywords that narrow them, and the ordered rule table that
//! maps raw input to an intent.

mod matcher;
mod model;

pub use matcher::{IntentMatcher, IntentPattern, IntentRule};
pub use model::{Intent, PricingTier, ServiceKind};
