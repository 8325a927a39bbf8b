//! Telegram Bot API client implementing the `Messenger` port.
//!
//! Messages go out through `sendMessage` with HTML parse mode. Keyboards are
//! rendered as reply keyboards; `Keyboard::Keep` sends no markup so the
//! chat keeps whatever it shows.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::domain::conversation::{Keyboard, Reply};
use crate::domain::foundation::TelegramId;
use crate::ports::{DeliveryError, Messenger};

/// Bot API connection settings.
#[derive(Clone)]
pub struct TelegramConfig {
    bot_token: SecretString,
    api_base_url: String,
    timeout: Duration,
}

impl TelegramConfig {
    pub fn new(bot_token: impl Into<String>) -> Self {
        Self {
            bot_token: SecretString::new(bot_token.into()),
            api_base_url: "https://api.telegram.org".to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Set a custom API base URL (for a local Bot API server or tests).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// `sendMessage` body.
#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: i64,
    text: &'a str,
    parse_mode: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_markup: Option<Value>,
}

/// Envelope of every Bot API response.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    error_code: Option<u16>,
    #[serde(default)]
    description: Option<String>,
}

/// Sends bot messages over the Bot API.
pub struct TelegramMessenger {
    config: TelegramConfig,
    http_client: reqwest::Client,
}

impl TelegramMessenger {
    pub fn new(config: TelegramConfig) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            config,
            http_client,
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.config.api_base_url,
            self.config.bot_token.expose_secret(),
            method
        )
    }
}

#[async_trait]
impl Messenger for TelegramMessenger {
    async fn send(&self, chat: TelegramId, reply: &Reply) -> Result<(), DeliveryError> {
        let body = SendMessage {
            chat_id: chat.value(),
            text: &reply.text,
            parse_mode: "HTML",
            reply_markup: reply_markup(reply.keyboard),
        };

        let response = self
            .http_client
            .post(self.method_url("sendMessage"))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                // The error text may embed the URL, which carries the token
                let e = e.without_url();
                if e.is_timeout() {
                    DeliveryError::Timeout
                } else {
                    DeliveryError::Connection(e.to_string())
                }
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| DeliveryError::InvalidResponse(e.without_url().to_string()))?;

        interpret_response(status.as_u16(), &text)
    }
}

/// Maps a Bot API response to the delivery outcome.
fn interpret_response(status: u16, body: &str) -> Result<(), DeliveryError> {
    let parsed: ApiResponse = serde_json::from_str(body).map_err(|e| {
        DeliveryError::InvalidResponse(format!("HTTP {}: {}", status, e))
    })?;

    if parsed.ok {
        return Ok(());
    }

    Err(DeliveryError::Rejected {
        status: parsed.error_code.unwrap_or(status),
        description: parsed
            .description
            .unwrap_or_else(|| "no description".to_string()),
    })
}

/// Renders a keyboard as Bot API `reply_markup`.
pub fn reply_markup(keyboard: Keyboard) -> Option<Value> {
    match keyboard {
        Keyboard::Keep => None,
        Keyboard::Remove => Some(json!({ "remove_keyboard": true })),
        _ => {
            let request_contact = keyboard.requests_contact();
            let rows: Vec<Vec<Value>> = keyboard
                .rows()
                .into_iter()
                .map(|row| {
                    row.into_iter()
                        .map(|button| {
                            if request_contact {
                                json!({ "text": button.label(), "request_contact": true })
                            } else {
                                json!({ "text": button.label() })
                            }
                        })
                        .collect()
                })
                .collect();
            Some(json!({
                "keyboard": rows,
                "resize_keyboard": true,
                "one_time_keyboard": keyboard.one_time(),
            }))
        }
    }
}
