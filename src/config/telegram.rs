//! Telegram Bot API configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use crate::domain::foundation::TelegramId;

use super::error::ValidationError;

/// Bot API credentials, webhook secret, and staff chats.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramSettings {
    /// Token issued by @BotFather (`<bot id>:<secret>`)
    pub bot_token: SecretString,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Expected `X-Telegram-Bot-Api-Secret-Token` header value
    #[serde(default)]
    pub webhook_secret: Option<SecretString>,

    /// Comma-separated chat ids that receive new-request announcements
    #[serde(default)]
    pub staff_chat_ids: String,

    /// Upper bound on one outbound Bot API call
    #[serde(default = "default_send_timeout")]
    pub send_timeout_secs: u64,
}

impl TelegramSettings {
    pub fn send_timeout(&self) -> Duration {
        Duration::from_secs(self.send_timeout_secs)
    }

    /// Parsed staff chat ids; blank entries are skipped.
    pub fn staff_chats(&self) -> Result<Vec<TelegramId>, ValidationError> {
        self.staff_chat_ids
            .split(',')
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .map(|raw| {
                raw.parse::<TelegramId>()
                    .map_err(|_| ValidationError::InvalidStaffChatId(raw.to_string()))
            })
            .collect()
    }

    pub fn validate(&self, production: bool) -> Result<(), ValidationError> {
        let token = self.bot_token.expose_secret();
        if token.is_empty() {
            return Err(ValidationError::MissingRequired("BARSUK__TELEGRAM__BOT_TOKEN"));
        }
        match token.split_once(':') {
            Some((id, secret))
                if !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()) && !secret.is_empty() => {}
            _ => return Err(ValidationError::InvalidBotToken),
        }
        if !self.api_base_url.starts_with("https://") && !self.api_base_url.starts_with("http://") {
            return Err(ValidationError::InvalidTelegramApiUrl);
        }
        if self.send_timeout_secs == 0 || self.send_timeout_secs > 60 {
            return Err(ValidationError::InvalidSendTimeout);
        }
        if production && self.webhook_secret.is_none() {
            return Err(ValidationError::WebhookSecretRequired);
        }
        self.staff_chats()?;
        Ok(())
    }
}

fn default_api_base_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_send_timeout() -> u64 {
    10
}
