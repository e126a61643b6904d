//! Intent and qualifier domain models.

use serde::{Deserialize, Serialize};

/// A coarse category of user request inferred from keyword/pattern match.
///
/// The declaration order here is also the evaluation priority of the rule
/// table: the first satisfied rule wins and short-circuits the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Greeting,
    Pricing,
    Services,
    Portfolio,
    Contact,
    Meeting,
    Urgent,
    Thanks,
    Goodbye,
    Help,
}

impl Intent {
    /// Stable string name, used for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Greeting => "greeting",
            Intent::Pricing => "pricing",
            Intent::Services => "services",
            Intent::Portfolio => "portfolio",
            Intent::Contact => "contact",
            Intent::Meeting => "meeting",
            Intent::Urgent => "urgent",
            Intent::Thanks => "thanks",
            Intent::Goodbye => "goodbye",
            Intent::Help => "help",
        }
    }
}

/// A pricing tier mentioned alongside a pricing question.
///
/// Detection runs over the same (lowercased) input that matched the pricing
/// intent, so "how much is an online store" resolves to `Ecommerce`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingTier {
    Simple,
    Business,
    Ecommerce,
    Custom,
}

impl PricingTier {
    const SIMPLE_KEYWORDS: &'static [&'static str] = &["simple", "basic", "small"];
    const BUSINESS_KEYWORDS: &'static [&'static str] = &["business", "company", "corporate"];
    const ECOMMERCE_KEYWORDS: &'static [&'static str] =
        &["ecommerce", "e-commerce", "shop", "store", "online store"];
    const CUSTOM_KEYWORDS: &'static [&'static str] = &["custom", "complex", "application", "app"];

    /// Detects a tier keyword in already-lowercased input.
    ///
    /// Tiers are checked in a fixed order (simple, business, e-commerce,
    /// custom); the first hit wins.
    pub fn detect(input: &str) -> Option<Self> {
        let tiers = [
            (Self::Simple, Self::SIMPLE_KEYWORDS),
            (Self::Business, Self::BUSINESS_KEYWORDS),
            (Self::Ecommerce, Self::ECOMMERCE_KEYWORDS),
            (Self::Custom, Self::CUSTOM_KEYWORDS),
        ];
        tiers
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| input.contains(k)))
            .map(|(tier, _)| *tier)
    }
}

/// A specific service mentioned alongside a services question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceKind {
    Design,
    Ecommerce,
    Seo,
    Maintenance,
}

impl ServiceKind {
    const DESIGN_KEYWORDS: &'static [&'static str] = &["design", "ui", "ux"];
    const ECOMMERCE_KEYWORDS: &'static [&'static str] =
        &["ecommerce", "e-commerce", "shop", "store"];
    const SEO_KEYWORDS: &'static [&'static str] = &["seo", "search engine", "ranking"];
    const MAINTENANCE_KEYWORDS: &'static [&'static str] =
        &["maintenance", "updates", "after launch"];

    /// Detects a service keyword in already-lowercased input.
    pub fn detect(input: &str) -> Option<Self> {
        let kinds = [
            (Self::Design, Self::DESIGN_KEYWORDS),
            (Self::Ecommerce, Self::ECOMMERCE_KEYWORDS),
            (Self::Seo, Self::SEO_KEYWORDS),
            (Self::Maintenance, Self::MAINTENANCE_KEYWORDS),
        ];
        kinds
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| input.contains(k)))
            .map(|(kind, _)| *kind)
    }
}
