//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid bind address: {0}")]
    InvalidBindAddress(String),

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Invalid Redis URL format")]
    InvalidRedisUrl,

    #[error("Pool min_connections exceeds max_connections")]
    InvalidPoolSize,

    #[error("Pool size exceeds maximum allowed (100)")]
    PoolSizeTooLarge,

    #[error("Invalid Telegram bot token format")]
    InvalidBotToken,

    #[error("Invalid Telegram API base URL")]
    InvalidTelegramApiUrl,

    #[error("Invalid staff chat id: {0}")]
    InvalidStaffChatId(String),

    #[error("Telegram send timeout must be between 1 and 60 seconds")]
    InvalidSendTimeout,

    #[error("Session TTL must be positive")]
    InvalidSessionTtl,

    #[error("Webhook secret is required in production")]
    WebhookSecretRequired,

    #[error("Console API key must be at least {0} characters")]
    ConsoleKeyTooShort(usize),
}
