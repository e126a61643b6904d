//! Durable client storage port.
//!
//! The engine persists session state through a narrow key-value interface so
//! the backend is swappable (file-backed in production, in-memory in tests).
//! Semantics are last-write-wins with no transactions: the store is
//! single-client and single-writer by design.

use crate::error::Result;
use async_trait::async_trait;

/// Well-known storage keys used by the engine.
///
/// Key names are part of the on-disk format and must stay stable across
/// releases.
pub mod keys {
    /// Persisted conversation history (JSON envelope, capped tail).
    pub const CONVERSATION_HISTORY: &str = "mediabay_conversation_history";
    /// Visit counter, incremented once per engine construction.
    pub const VISIT_COUNT: &str = "mediabay_visit_count";
    /// Timestamp of the most recent visit (RFC 3339).
    pub const LAST_VISIT: &str = "mediabay_last_visit";
    /// User preference flags (voice, notifications, personality).
    pub const PREFERENCES: &str = "mediabay_chatbot_preferences";
}

/// An abstract key-value store for durable client state.
///
/// Implementations must survive engine restarts to be useful, but the engine
/// tolerates any of these operations failing: persistence errors are logged
/// and the session continues in memory only.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(value))`: key present
    /// - `Ok(None)`: key absent
    /// - `Err(_)`: the backend failed
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Writes `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes the value stored under `key`, if any.
    async fn remove(&self, key: &str) -> Result<()>;
}
