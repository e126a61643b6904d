//! Conversation session domain module.
//!
//! This module contains the message types, the bounded conversation model,
//! persisted user preferences, and the storage-aware session service.
//!
//! # Module Structure
//!
//! - `message`: Message types (`Sender`, `Message`)
//! - `model`: Bounded conversation model (`ConversationSession`)
//! - `preferences`: Persisted user preference flags (`UserPreferences`)
//! - `service`: Storage-aware lifecycle operations (`SessionService`)

mod message;
mod model;
mod preferences;
mod service;

pub use message::{Message, Sender};
pub use model::{ConversationSession, HISTORY_CAP};
pub use preferences::{Personality, UserPreferences};
pub use service::{PersistedHistory, SessionService};
