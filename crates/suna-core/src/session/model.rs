//! Bounded conversation session model.

use super::message::Message;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default bound on retained history; oldest entries are evicted first.
pub const HISTORY_CAP: usize = 50;

/// The in-memory state of one conversation.
///
/// This is the pure domain model the dialogue controller operates on,
/// independent of any storage backend. The session ID is an opaque token
/// generated at construction and is never synced to a server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationSession {
    /// Opaque session token (UUID v4).
    pub session_id: String,
    /// Ordered message history, bounded to `capacity`.
    pub history: Vec<Message>,
    /// Number of page loads seen by this client, monotonically non-decreasing.
    pub visit_count: u64,
    /// Whether the user asked for a human operator.
    pub handoff_requested: bool,
    /// History bound.
    capacity: usize,
}

impl ConversationSession {
    /// Creates an empty session with the default history bound.
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAP)
    }

    /// Creates an empty session with a custom history bound.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            session_id: Uuid::new_v4().to_string(),
            history: Vec::new(),
            visit_count: 0,
            handoff_requested: false,
            capacity,
        }
    }

    /// Appends a message at the tail, evicting from the head beyond capacity.
    pub fn push(&mut self, message: Message) {
        self.history.push(message);
        if self.history.len() > self.capacity {
            let excess = self.history.len() - self.capacity;
            self.history.drain(..excess);
        }
    }

    /// The non-transient tail, i.e. what should be persisted.
    pub fn durable_history(&self) -> Vec<Message> {
        self.history
            .iter()
            .filter(|m| !m.transient)
            .cloned()
            .collect()
    }

    /// Removes the trailing message if it is transient, such as a listening
    /// indicator. Earlier transient entries (the welcome message) stay put.
    pub fn pop_transient_tail(&mut self) {
        if self.history.last().is_some_and(|m| m.transient) {
            self.history.pop();
        }
    }

    /// The last `n` messages in order.
    pub fn recent(&self, n: usize) -> &[Message] {
        let start = self.history.len().saturating_sub(n);
        &self.history[start..]
    }
}

impl Default for ConversationSession {
    fn default() -> Self {
        Self::new()
    }
}
