//! Conversation session store configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Where in-progress conversation sessions live.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SessionBackend {
    /// Process memory; a restart drops every in-progress flow.
    #[default]
    Memory,
    /// Redis, shared between replicas and surviving restarts until TTL.
    Redis,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub backend: SessionBackend,

    /// Idle sessions expire after this many seconds (Redis backend)
    #[serde(default = "default_ttl")]
    pub ttl_secs: u64,
}

impl SessionConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.ttl_secs == 0 {
            return Err(ValidationError::InvalidSessionTtl);
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            backend: SessionBackend::default(),
            ttl_secs: default_ttl(),
        }
    }
}

fn default_ttl() -> u64 {
    24 * 60 * 60
}
