//! Redis configuration (shared session store)

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Redis connection settings. Only needed for the Redis session backend.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RedisConfig {
    /// Redis connection URL
    #[serde(default)]
    pub url: Option<String>,

    /// Connection timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl RedisConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate Redis configuration when a URL is set.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.url.as_deref() {
            None => Ok(()),
            Some(url) if url.starts_with("redis://") || url.starts_with("rediss://") => Ok(()),
            Some(_) => Err(ValidationError::InvalidRedisUrl),
        }
    }
}

fn default_timeout() -> u64 {
    5
}
