//! Staff console API configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

const MIN_API_KEY_LEN: usize = 16;

/// The console API is mounted only when an API key is configured.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConsoleConfig {
    #[serde(default)]
    pub api_key: Option<SecretString>,
}

impl ConsoleConfig {
    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match &self.api_key {
            Some(key) if key.expose_secret().len() < MIN_API_KEY_LEN => {
                Err(ValidationError::ConsoleKeyTooShort(MIN_API_KEY_LEN))
            }
            _ => Ok(()),
        }
    }
}
