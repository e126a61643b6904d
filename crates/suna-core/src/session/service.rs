//! Storage-aware session lifecycle operations.

use super::message::Message;
use super::model::ConversationSession;
use super::preferences::UserPreferences;
use crate::response::WELCOME;
use crate::storage::{KeyValueStore, keys};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// The envelope written to durable storage for conversation history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedHistory {
    /// When this envelope was written.
    pub saved_at: DateTime<Utc>,
    /// Non-transient messages, capped to the session bound.
    pub messages: Vec<Message>,
}

/// Owns the conversation session and keeps it durable.
///
/// Every mutating operation persists the trimmed non-transient tail.
/// Persistence failure is never fatal: it is logged and the session simply
/// continues in memory only for the rest of this page load.
pub struct SessionService {
    store: Arc<dyn KeyValueStore>,
    session: ConversationSession,
}

impl SessionService {
    /// Creates a service around a fresh session.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            session: ConversationSession::new(),
        }
    }

    /// Creates a service around a fresh session with a custom history bound.
    pub fn with_capacity(store: Arc<dyn KeyValueStore>, capacity: usize) -> Self {
        Self {
            store,
            session: ConversationSession::with_capacity(capacity),
        }
    }

    /// Read access to the underlying session.
    pub fn session(&self) -> &ConversationSession {
        &self.session
    }

    /// Mutable access for operations that don't need persistence themselves.
    pub fn session_mut(&mut self) -> &mut ConversationSession {
        &mut self.session
    }

    /// Appends a message and persists the durable tail.
    ///
    /// Transient messages are appended to the visible transcript but skip
    /// the persistence step entirely.
    pub async fn append(&mut self, message: Message) {
        let transient = message.transient;
        self.session.push(message);
        if !transient {
            self.persist().await;
        }
    }

    /// Writes the current durable tail to storage.
    pub async fn persist(&self) {
        let envelope = PersistedHistory {
            saved_at: Utc::now(),
            messages: self.session.durable_history(),
        };
        let payload = match serde_json::to_string(&envelope) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!("failed to serialize conversation history: {e}");
                return;
            }
        };
        if let Err(e) = self.store.set(keys::CONVERSATION_HISTORY, &payload).await {
            tracing::warn!("failed to persist conversation history: {e}");
        }
    }

    /// Rebuilds the visible transcript from storage.
    ///
    /// The transcript always starts with the synthetic welcome message.
    /// If a persisted envelope exists and is younger than `window_hours`,
    /// the last `replay` non-transient messages are replayed after it;
    /// otherwise the transcript is the welcome message alone.
    ///
    /// Idempotent: calling this twice without intervening appends yields the
    /// same transcript.
    pub async fn restore(&mut self, replay: usize, window_hours: i64) {
        self.session.history.clear();
        self.session.push(Message::transient_bot(WELCOME));

        let saved = match self.store.get(keys::CONVERSATION_HISTORY).await {
            Ok(saved) => saved,
            Err(e) => {
                tracing::warn!("failed to read conversation history: {e}");
                return;
            }
        };
        let Some(payload) = saved else { return };
        let envelope: PersistedHistory = match serde_json::from_str(&payload) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::warn!("discarding unreadable conversation history: {e}");
                return;
            }
        };
        if Utc::now() - envelope.saved_at >= Duration::hours(window_hours) {
            tracing::debug!("persisted history is stale, starting fresh");
            return;
        }

        let start = envelope.messages.len().saturating_sub(replay);
        for message in &envelope.messages[start..] {
            if !message.transient {
                self.session.push(message.clone());
            }
        }
    }

    /// Reads the previous visit count, adds one, and writes it back.
    ///
    /// Called exactly once per engine construction. Storage failure degrades
    /// to an in-memory count of 1 (treated as a first visit).
    pub async fn increment_visit(&mut self) -> u64 {
        let previous = match self.store.get(keys::VISIT_COUNT).await {
            Ok(Some(raw)) => raw.trim().parse::<u64>().unwrap_or(0),
            Ok(None) => 0,
            Err(e) => {
                tracing::warn!("failed to read visit count: {e}");
                0
            }
        };
        let count = previous + 1;
        if let Err(e) = self.store.set(keys::VISIT_COUNT, &count.to_string()).await {
            tracing::warn!("failed to persist visit count: {e}");
        }
        if let Err(e) = self
            .store
            .set(keys::LAST_VISIT, &Utc::now().to_rfc3339())
            .await
        {
            tracing::warn!("failed to persist last visit: {e}");
        }
        self.session.visit_count = count;
        count
    }

    /// Marks the session as waiting for a human operator.
    pub fn request_handoff(&mut self) {
        self.session.handoff_requested = true;
    }

    /// Loads user preferences, falling back to defaults.
    pub async fn load_preferences(&self) -> UserPreferences {
        match self.store.get(keys::PREFERENCES).await {
            Ok(Some(payload)) => serde_json::from_str(&payload).unwrap_or_default(),
            Ok(None) => UserPreferences::default(),
            Err(e) => {
                tracing::warn!("failed to read preferences: {e}");
                UserPreferences::default()
            }
        }
    }

    /// Persists user preferences.
    pub async fn save_preferences(&self, preferences: &UserPreferences) {
        let payload = match serde_json::to_string(preferences) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!("failed to serialize preferences: {e}");
                return;
            }
        };
        if let Err(e) = self.store.set(keys::PREFERENCES, &payload).await {
            tracing::warn!("failed to persist preferences: {e}");
        }
    }
}
