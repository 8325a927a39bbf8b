//! Application configuration module
//!
//! Configuration is loaded from environment variables using the `config` and
//! `dotenvy` crates. Variables carry the `BARSUK` prefix and nested values are
//! separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use barsuk_bot::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod console;
mod database;
mod error;
mod redis;
mod server;
mod session;
mod telegram;

pub use console::ConsoleConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use redis::RedisConfig;
pub use server::{Environment, ServerConfig};
pub use session::{SessionBackend, SessionConfig};
pub use telegram::TelegramSettings;

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment, logging)
    #[serde(default)]
    pub server: ServerConfig,

    /// PostgreSQL connection
    pub database: DatabaseConfig,

    /// Redis connection, used by the Redis session backend
    #[serde(default)]
    pub redis: RedisConfig,

    /// Bot API token, webhook secret, staff chats
    pub telegram: TelegramSettings,

    /// Conversation session storage
    #[serde(default)]
    pub session: SessionConfig,

    /// Staff console API
    #[serde(default)]
    pub console: ConsoleConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with the `BARSUK` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// - `BARSUK__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `BARSUK__TELEGRAM__BOT_TOKEN=...` -> `telegram.bot_token = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or values
    /// cannot be parsed into the expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("BARSUK")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first invalid value found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.redis.validate()?;
        self.telegram.validate(self.is_production())?;
        self.session.validate()?;
        if self.session.backend == SessionBackend::Redis && self.redis.url.is_none() {
            return Err(ValidationError::MissingRequired("BARSUK__REDIS__URL"));
        }
        self.console.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
