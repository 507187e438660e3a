//! SessionMemory: conversation turns keyed by session id.

use std::sync::Arc;

use chrono::Duration;

use tributary_core::config::SessionConfig;
use tributary_core::models::{ConversationTurn, Role};

use crate::clock::Clock;
use crate::expiring::ExpiringMap;

/// In-process conversation history. A session disappears once it has been
/// idle for the TTL; reading it counts as activity.
pub struct SessionMemory {
    sessions: ExpiringMap<String, Vec<ConversationTurn>>,
}

impl SessionMemory {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: ExpiringMap::new(ttl),
        }
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(config.ttl())
    }

    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            sessions: ExpiringMap::with_clock(ttl, clock),
        }
    }

    /// Append a turn. Empty session ids are ignored.
    pub fn record(&self, session_id: &str, role: Role, content: impl Into<String>) {
        if session_id.is_empty() {
            return;
        }
        let turn = ConversationTurn::new(role, content);
        let turns = self
            .sessions
            .update(session_id.to_string(), |turns| {
                turns.push(turn);
                turns.len()
            });
        tracing::debug!(session_id, role = %role, turns, "turn recorded");
    }

    /// Turns of a live session in append order; empty for unknown or
    /// expired sessions.
    pub fn get(&self, session_id: &str) -> Vec<ConversationTurn> {
        self.sessions.get(session_id).unwrap_or_default()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn purge_expired(&self) -> usize {
        self.sessions.purge_expired()
    }

    pub fn ttl(&self) -> Duration {
        self.sessions.ttl()
    }
}

impl Default for SessionMemory {
    fn default() -> Self {
        Self::from_config(&SessionConfig::default())
    }
}
