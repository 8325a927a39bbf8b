//! User identity aggregate.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{StateMachine, TelegramId, Timestamp, UserId, ValidationError};

use super::UserStatus;

/// Version of the data-processing consent text users accept during registration.
pub const CONSENT_VERSION: &str = "1.0";

/// Profile fields reported by the chat platform for the sender of an update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenderProfile {
    pub telegram_id: TelegramId,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub language_code: Option<String>,
}

impl SenderProfile {
    /// Profile with only the platform id known.
    pub fn bare(telegram_id: TelegramId) -> Self {
        Self {
            telegram_id,
            username: None,
            first_name: None,
            last_name: None,
            language_code: None,
        }
    }
}

/// Accepted data-processing consent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentRecord {
    pub version: String,
    pub accepted_at: Timestamp,
}

impl ConsentRecord {
    /// Consent to the current version, accepted now.
    pub fn current() -> Self {
        Self {
            version: CONSENT_VERSION.to_string(),
            accepted_at: Timestamp::now(),
        }
    }
}

/// Requester contact details copied into a request payload as `user_info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSnapshot {
    pub name: String,
    pub phone: String,
    pub username: String,
}

/// What `/start` should do for an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationGate {
    /// Already registered; show the main menu.
    AlreadyActive,
    /// Blocked by age or by staff; refuse.
    Blocked,
    /// Run the registration flow.
    Proceed,
}

/// Durable user record keyed by Telegram id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: UserId,
    pub telegram_id: TelegramId,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub language_code: Option<String>,
    pub phone: Option<String>,
    pub status: UserStatus,
    pub is_18_confirmed: bool,
    pub consent: Option<ConsentRecord>,
    pub created_at: Timestamp,
    pub last_activity: Timestamp,
}

impl UserIdentity {
    /// Creates a fresh identity in `NEW` status from the sender's profile.
    pub fn register(id: UserId, profile: &SenderProfile) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            telegram_id: profile.telegram_id,
            username: profile.username.clone(),
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            language_code: profile.language_code.clone(),
            phone: None,
            status: UserStatus::New,
            is_18_confirmed: false,
            consent: None,
            created_at: now,
            last_activity: now,
        }
    }

    /// Copies the latest profile fields and bumps `last_activity`.
    pub fn refresh_profile(&mut self, profile: &SenderProfile) {
        self.username = profile.username.clone();
        self.first_name = profile.first_name.clone();
        self.last_name = profile.last_name.clone();
        self.language_code = profile.language_code.clone();
        self.last_activity = Timestamp::now();
    }

    pub fn has_access(&self) -> bool {
        self.status.has_access()
    }

    pub fn registration_gate(&self) -> RegistrationGate {
        if self.status.has_access() {
            RegistrationGate::AlreadyActive
        } else if self.status.is_blocked() {
            RegistrationGate::Blocked
        } else {
            RegistrationGate::Proceed
        }
    }

    /// Moves a new (or deleted) identity to `AGE_PENDING`.
    ///
    /// Returns `true` if the status changed.
    pub fn begin_registration(&mut self) -> Result<bool, ValidationError> {
        if self.status == UserStatus::AgePending {
            return Ok(false);
        }
        self.status = self.status.transition_to(UserStatus::AgePending)?;
        Ok(true)
    }

    /// Completes registration: stores the phone and consent and grants access.
    ///
    /// Only an identity still in registration (`NEW` or `AGE_PENDING`) can be
    /// activated; staff unblocking goes through the status column directly.
    pub fn activate(
        &mut self,
        phone: impl Into<String>,
        consent: ConsentRecord,
    ) -> Result<(), ValidationError> {
        if !matches!(self.status, UserStatus::New | UserStatus::AgePending) {
            return Err(ValidationError::invalid_format(
                "status",
                format!("cannot register from {}", self.status.as_str()),
            ));
        }
        let phone = phone.into();
        if phone.trim().is_empty() {
            return Err(ValidationError::empty_field("phone"));
        }
        self.status = self.status.transition_to(UserStatus::Active)?;
        self.phone = Some(phone.trim().to_string());
        self.is_18_confirmed = true;
        self.consent = Some(consent);
        self.last_activity = Timestamp::now();
        Ok(())
    }

    /// "First Last", trimmed; `None` when neither is known.
    pub fn display_name(&self) -> Option<String> {
        let full = format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or(""),
            self.last_name.as_deref().unwrap_or("")
        );
        let full = full.trim();
        if full.is_empty() {
            None
        } else {
            Some(full.to_string())
        }
    }

    /// Contact snapshot stored with every submitted request.
    pub fn snapshot(&self) -> UserSnapshot {
        UserSnapshot {
            name: self.display_name().unwrap_or_else(|| "Unknown".to_string()),
            phone: self
                .phone
                .clone()
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| "Not provided".to_string()),
            username: match self.username.as_deref() {
                Some(handle) if !handle.is_empty() => format!("@{}", handle),
                _ => "No username".to_string(),
            },
        }
    }
}
