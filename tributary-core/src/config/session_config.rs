use serde::{Deserialize, Serialize};

use super::defaults;

/// Session memory configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Idle time after which a session's turns disappear.
    pub ttl_secs: u64,
}

impl SessionConfig {
    pub fn ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.ttl_secs as i64)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_secs: defaults::DEFAULT_SESSION_TTL_SECS,
        }
    }
}
