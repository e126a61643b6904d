//! The static mapping from intents (and qualifiers) to response templates.
//!
//! Several sets carry near-duplicate variants with cosmetic differences
//! (emoji, currency phrasing). The variation is preserved verbatim as an
//! enumerated set; no semantic distinction is assumed between entries.

use crate::intent::{PricingTier, ServiceKind};
use serde::{Deserialize, Serialize};

/// Identifies one response set in the catalog.
///
/// Greeting sets are split by visit context, pricing and services sets by an
/// optional qualifier keyword found in the same input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseKey {
    Greeting { first_visit: bool },
    Pricing(Option<PricingTier>),
    Services(Option<ServiceKind>),
    Portfolio,
    Contact,
    Meeting,
    Urgent,
    Thanks,
    Goodbye,
    Help,
    Fallback,
}

const GREETING_FIRST_VISIT: &[&str] = &[
    "Welcome to MediaBay! I'm Suna, your AI assistant. I can help you with pricing, services, and project planning.",
    "Hi there! New to MediaBay? I'd love to help you explore our web design services.",
    "Hello! I'm here to make your MediaBay experience smooth. What brings you here today?",
];

const GREETING_RETURNING: &[&str] = &[
    "Welcome back! How can I assist you today?",
    "Great to see you again! What can I help you with?",
    "Hello again! Ready to continue where we left off?",
];

const PRICING_GENERAL: &[&str] = &[
    "Our pricing starts from R2,500 for simple websites, R5,000-R15,000 for business sites, and R15,000+ for e-commerce. Would you like a personalized quote?",
    "I can help you get an accurate quote! Our prices range from R2,500 to R50,000+ depending on your needs. What type of website are you looking for?",
    "Great question! Our pricing is based on South African market rates. Simple sites start at R2,500, while custom applications can go up to R50,000+. Shall I help you calculate a quote?",
];

const PRICING_SIMPLE: &[&str] = &[
    "A simple 1-3 page website starts from R2,500. This includes basic design, mobile responsiveness, and contact forms.",
];

const PRICING_BUSINESS: &[&str] = &[
    "Business websites (3-10 pages) range from R5,000 to R15,000, including custom design, CMS integration, and SEO optimization.",
];

const PRICING_ECOMMERCE: &[&str] = &[
    "E-commerce solutions start from R15,000 and include product catalogs, payment integration, and inventory management.",
];

const PRICING_CUSTOM: &[&str] = &[
    "Custom web applications start from R50,000+ depending on complexity. Let's discuss your specific requirements!",
];

const SERVICES_OVERVIEW: &[&str] = &[
    "We offer comprehensive web services including:\n\n🎨 UI/UX Design\n💻 Custom Web Development\n🛒 E-commerce Solutions\n📱 Mobile-Responsive Design\n🔍 SEO Optimization\n⚡ Performance Optimization\n🔧 Maintenance & Support\n\nWhich service interests you most?",
];

const SERVICES_DESIGN: &[&str] = &[
    "Our UI/UX design service creates beautiful, user-centered designs that engage visitors and convert them into customers.",
];

const SERVICES_ECOMMERCE: &[&str] = &[
    "We build complete online stores with payment integration, inventory management, and mobile-optimized shopping experiences.",
];

const SERVICES_SEO: &[&str] = &[
    "Our SEO services help boost your online visibility and rank higher in South African search results.",
];

const SERVICES_MAINTENANCE: &[&str] = &[
    "We provide ongoing website maintenance, security updates, and performance optimization to keep your site running smoothly.",
];

const PORTFOLIO: &[&str] = &[
    "I'd love to show you our work! We've completed projects across various industries including retail, hospitality, finance, and tech startups. You can view our portfolio section on this page, or I can schedule a call where our team can walk you through specific case studies. What industry are you in?",
];

const CONTACT: &[&str] = &[
    "Here's how to reach MediaBay:\n\n📧 Email: mediabay3@gmail.com\n📍 Location: Cape Town, South Africa\n🕒 Hours: Mon-Fri 9AM-6PM, Sat 10AM-2PM\n\nWould you like me to schedule a consultation or connect you with our team directly?",
];

const MEETING: &[&str] = &[
    "I'd be happy to help you schedule a consultation! We offer:\n\n📞 Phone consultations (30 min)\n💻 Video calls (45 min)\n🏢 In-person meetings (Cape Town area)\n\nWhat works best for your schedule? I can check our availability and send you a calendar link.",
];

const URGENT: &[&str] = &[
    "We do take on rush projects when the scope allows. Tell me a bit about your deadline and I'll flag it for the team so they can confirm a fast-track timeline today.",
];

const THANKS: &[&str] = &[
    "You're very welcome! I'm here whenever you need assistance. 😊",
    "My pleasure! Feel free to ask if you have any other questions.",
    "Happy to help! Is there anything else I can assist you with today?",
];

const GOODBYE: &[&str] = &[
    "Thanks for chatting with me! Feel free to reach out anytime. Have a great day! 👋",
];

const HELP: &[&str] = &[
    "I'm here to help! I can assist you with:\n\n💰 Pricing and quotes\n🛠️ Service information\n📁 Portfolio examples\n📅 Scheduling consultations\n📞 Contact details\n🗺️ Location and directions\n\nWhat would you like to know more about?",
];

const FALLBACK: &[&str] = &[
    "That's an interesting question! Let me connect you with our team for a detailed answer. In the meantime, is there anything specific about our web design services I can help with?",
    "I want to make sure I give you the most accurate information. Would you like me to have one of our specialists reach out to you about this?",
    "Great question! While I can help with general information about our services and pricing, our team would be better equipped to give you a detailed answer. Shall I arrange a callback?",
];

/// The synthetic welcome message shown on an empty transcript.
pub const WELCOME: &str = "Hi! I'm MediaBay Suna, your AI assistant at MediaBay. I can help you with pricing, services, project planning, and more. How can I assist you today?";

/// Apologetic reply when voice capture fails outright.
pub const VOICE_RETRY: &str =
    "Sorry, I couldn't hear you clearly. Please try again or type your message.";

/// Reply when voice input is requested but no recognizer is present.
pub const VOICE_UNSUPPORTED: &str =
    "Voice input isn't available on this device. Please type your message instead.";

/// Replies used by the human-handoff flow.
pub const HANDOFF_CONNECTING: &str = "I'm connecting you with a human agent. Please hold on...";
pub const HANDOFF_HUMAN_GREETING: &str =
    "👋 Hi! I'm Sarah from MediaBay. I see you were chatting with Suna. How can I help you today?";
pub const HANDOFF_OFFLINE: &str = "Our human agents are currently offline, but I've logged your request. Someone will get back to you within 24 hours. In the meantime, I'm here to help with any questions!";

/// The static catalog of response sets.
///
/// Every lookup resolves to a non-empty set: unknown or unqualified keys
/// degrade to the intent's general set, and general lookup failure degrades
/// to the fallback set at the selector level.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseCatalog;

impl ResponseCatalog {
    pub fn new() -> Self {
        Self
    }

    /// Returns the candidate strings for a response key.
    pub fn candidates(&self, key: ResponseKey) -> &'static [&'static str] {
        match key {
            ResponseKey::Greeting { first_visit: true } => GREETING_FIRST_VISIT,
            ResponseKey::Greeting { first_visit: false } => GREETING_RETURNING,
            ResponseKey::Pricing(None) => PRICING_GENERAL,
            ResponseKey::Pricing(Some(PricingTier::Simple)) => PRICING_SIMPLE,
            ResponseKey::Pricing(Some(PricingTier::Business)) => PRICING_BUSINESS,
            ResponseKey::Pricing(Some(PricingTier::Ecommerce)) => PRICING_ECOMMERCE,
            ResponseKey::Pricing(Some(PricingTier::Custom)) => PRICING_CUSTOM,
            ResponseKey::Services(None) => SERVICES_OVERVIEW,
            ResponseKey::Services(Some(ServiceKind::Design)) => SERVICES_DESIGN,
            ResponseKey::Services(Some(ServiceKind::Ecommerce)) => SERVICES_ECOMMERCE,
            ResponseKey::Services(Some(ServiceKind::Seo)) => SERVICES_SEO,
            ResponseKey::Services(Some(ServiceKind::Maintenance)) => SERVICES_MAINTENANCE,
            ResponseKey::Portfolio => PORTFOLIO,
            ResponseKey::Contact => CONTACT,
            ResponseKey::Meeting => MEETING,
            ResponseKey::Urgent => URGENT,
            ResponseKey::Thanks => THANKS,
            ResponseKey::Goodbye => GOODBYE,
            ResponseKey::Help => HELP,
            ResponseKey::Fallback => FALLBACK,
        }
    }

    /// The fallback set used when no intent matched.
    pub fn fallback(&self) -> &'static [&'static str] {
        FALLBACK
    }
}
