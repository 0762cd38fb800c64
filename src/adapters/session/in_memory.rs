//! In-Memory Session Store - RwLock-guarded map with idle expiry.
//!
//! Expiry is enforced lazily on read: an entry older than the idle TTL is
//! removed and replaced with a fresh session. Good enough for a
//! single-process demo; a multi-instance deployment would swap this for a
//! shared store behind the same port.

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::flow::FlowSession;
use crate::ports::SessionStore;

/// Map-backed session store with lazy idle expiry.
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, FlowSession>>,
    idle_ttl: Duration,
}

impl InMemorySessionStore {
    pub fn new(idle_ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle_ttl,
        }
    }

    /// Number of stored sessions, expired entries included.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, key: &str) -> FlowSession {
        {
            let sessions = self.sessions.read().await;
            match sessions.get(key) {
                Some(session) if !session.is_expired(self.idle_ttl) => return session.clone(),
                Some(_) => {}
                None => return FlowSession::new(),
            }
        }

        // Entry exists but expired; drop it under the write lock.
        let mut sessions = self.sessions.write().await;
        if sessions
            .get(key)
            .map(|s| s.is_expired(self.idle_ttl))
            .unwrap_or(false)
        {
            debug!(key, "session expired, starting fresh");
            sessions.remove(key);
        }
        sessions
            .get(key)
            .cloned()
            .unwrap_or_else(FlowSession::new)
    }

    async fn set(&self, key: &str, mut session: FlowSession) {
        session.touch();
        self.sessions.write().await.insert(key.to_string(), session);
    }

    async fn delete(&self, key: &str) {
        self.sessions.write().await.remove(key);
    }
}
