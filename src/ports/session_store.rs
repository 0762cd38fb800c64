//! Session Store Port
//!
//! Keyed storage for conversational flow state. Lookups never fail from
//! the caller's perspective; a missing or expired entry simply yields a
//! fresh session, which is the correct conversational default.

use async_trait::async_trait;

use crate::domain::flow::FlowSession;

/// Storage boundary for per-key flow sessions.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Fetch the session for a key, or a fresh one if absent or expired.
    async fn get(&self, key: &str) -> FlowSession;

    /// Store the session for a key.
    async fn set(&self, key: &str, session: FlowSession);

    /// Delete the session for a key, if any.
    async fn delete(&self, key: &str);
}
