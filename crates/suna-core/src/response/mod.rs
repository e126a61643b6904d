//! Canned response sets and random selection among variants.

mod catalog;
mod selector;

pub use catalog::{
    HANDOFF_CONNECTING, HANDOFF_HUMAN_GREETING, HANDOFF_OFFLINE, ResponseCatalog, ResponseKey,
    VOICE_RETRY, VOICE_UNSUPPORTED, WELCOME,
};
pub use selector::ResponseSelector;
