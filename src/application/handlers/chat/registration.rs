//! Registration handlers: `/start` entry and phone-capture completion.

use std::sync::Arc;

use crate::domain::conversation::UserEvent;
use crate::domain::foundation::{DomainError, TelegramId, ValidationError};
use crate::domain::user::{ConsentRecord, RegistrationGate, SenderProfile, UserIdentity};
use crate::ports::{EventLog, UserRepository};

/// What `/start` resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// Already registered; show the main menu without re-collecting anything.
    AlreadyActive,
    /// Blocked by age or by staff.
    Blocked,
    /// Registration should begin at the age question.
    Begin,
}

/// Handles `/start`: upserts the identity and decides whether to register.
pub struct StartRegistrationHandler {
    users: Arc<dyn UserRepository>,
    events: Arc<dyn EventLog>,
}

impl StartRegistrationHandler {
    pub fn new(users: Arc<dyn UserRepository>, events: Arc<dyn EventLog>) -> Self {
        Self { users, events }
    }

    pub async fn handle(&self, profile: &SenderProfile) -> Result<StartOutcome, DomainError> {
        let mut user = self.users.upsert_profile(profile).await?;

        if let Err(e) = self.events.record(profile.telegram_id, &UserEvent::BotStart).await {
            tracing::warn!(error = %e, telegram_id = %profile.telegram_id, "Failed to log bot_start");
        }

        match user.registration_gate() {
            RegistrationGate::AlreadyActive => Ok(StartOutcome::AlreadyActive),
            RegistrationGate::Blocked => {
                tracing::info!(
                    telegram_id = %profile.telegram_id,
                    status = %user.status,
                    "Blocked user pressed /start"
                );
                Ok(StartOutcome::Blocked)
            }
            RegistrationGate::Proceed => {
                if user.begin_registration()? {
                    self.users.update(&user).await?;
                }
                Ok(StartOutcome::Begin)
            }
        }
    }
}

/// Why registration could not be completed.
#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    #[error("No user identity for telegram id {0}")]
    IdentityNotFound(TelegramId),

    /// Blocked while registration was in progress.
    #[error("User {0} is blocked")]
    Blocked(TelegramId),

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("Failed to save registration: {0}")]
    Persistence(#[from] DomainError),
}

/// Completes registration once the user shared their own phone number.
pub struct CompleteRegistrationHandler {
    users: Arc<dyn UserRepository>,
}

impl CompleteRegistrationHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn handle(
        &self,
        telegram_id: TelegramId,
        phone: &str,
    ) -> Result<UserIdentity, RegistrationError> {
        let mut user = self
            .users
            .find_by_telegram_id(telegram_id)
            .await?
            .ok_or(RegistrationError::IdentityNotFound(telegram_id))?;

        if user.registration_gate() == RegistrationGate::Blocked {
            tracing::info!(
                telegram_id = %telegram_id,
                status = %user.status,
                "Contact shared by a blocked user, registration refused"
            );
            return Err(RegistrationError::Blocked(telegram_id));
        }

        user.activate(phone, ConsentRecord::current())?;
        self.users.update(&user).await?;

        tracing::info!(telegram_id = %telegram_id, user_id = %user.id, "Registration completed");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryEventLog, InMemoryUserRepository};
    use crate::domain::foundation::UserId;
    use crate::domain::user::{UserStatus, CONSENT_VERSION};

    const SENDER: TelegramId = TelegramId::new(1001);

    fn fixture() -> (
        Arc<InMemoryUserRepository>,
        Arc<InMemoryEventLog>,
        StartRegistrationHandler,
        CompleteRegistrationHandler,
    ) {
        let users = Arc::new(InMemoryUserRepository::new());
        let events = Arc::new(InMemoryEventLog::new());
        let start = StartRegistrationHandler::new(users.clone(), events.clone());
        let complete = CompleteRegistrationHandler::new(users.clone());
        (users, events, start, complete)
    }

    #[tokio::test]
    async fn first_start_creates_identity_and_begins() {
        let (users, events, start, _) = fixture();

        let outcome = start.handle(&SenderProfile::bare(SENDER)).await.unwrap();

        assert_eq!(outcome, StartOutcome::Begin);
        assert_eq!(users.get(SENDER).await.unwrap().status, UserStatus::AgePending);
        assert_eq!(events.event_types(SENDER).await, vec!["bot_start"]);
    }

    #[tokio::test]
    async fn active_user_is_not_registered_again() {
        let (users, _, start, _) = fixture();
        let mut user = UserIdentity::register(UserId::new(1), &SenderProfile::bare(SENDER));
        user.status = UserStatus::Active;
        user.phone = Some("+7900".to_string());
        users.insert(user).await;

        let outcome = start.handle(&SenderProfile::bare(SENDER)).await.unwrap();

        assert_eq!(outcome, StartOutcome::AlreadyActive);
        let stored = users.get(SENDER).await.unwrap();
        assert_eq!(stored.status, UserStatus::Active);
        assert_eq!(stored.phone.as_deref(), Some("+7900"));
    }

    #[tokio::test]
    async fn blocked_user_is_refused() {
        let (users, _, start, _) = fixture();
        let mut user = UserIdentity::register(UserId::new(1), &SenderProfile::bare(SENDER));
        user.status = UserStatus::BlockedAdmin;
        users.insert(user).await;

        assert_eq!(
            start.handle(&SenderProfile::bare(SENDER)).await.unwrap(),
            StartOutcome::Blocked
        );
    }

    #[tokio::test]
    async fn complete_activates_with_consent() {
        let (users, _, start, complete) = fixture();
        start.handle(&SenderProfile::bare(SENDER)).await.unwrap();

        let user = complete.handle(SENDER, "+79001234567").await.unwrap();

        assert_eq!(user.status, UserStatus::Active);
        let stored = users.get(SENDER).await.unwrap();
        assert_eq!(stored.phone.as_deref(), Some("+79001234567"));
        assert!(stored.is_18_confirmed);
        assert_eq!(stored.consent.unwrap().version, CONSENT_VERSION);
    }

    #[tokio::test]
    async fn complete_refuses_user_blocked_mid_registration() {
        let (users, _, start, complete) = fixture();
        start.handle(&SenderProfile::bare(SENDER)).await.unwrap();
        let mut user = users.get(SENDER).await.unwrap();
        user.status = UserStatus::BlockedAdmin;
        users.insert(user).await;

        let result = complete.handle(SENDER, "+79001234567").await;

        assert!(matches!(result, Err(RegistrationError::Blocked(id)) if id == SENDER));
        let stored = users.get(SENDER).await.unwrap();
        assert_eq!(stored.status, UserStatus::BlockedAdmin);
        assert_eq!(stored.phone, None);
    }

    #[tokio::test]
    async fn complete_without_identity_fails() {
        let (_, _, _, complete) = fixture();
        let result = complete.handle(SENDER, "+79001234567").await;
        assert!(matches!(result, Err(RegistrationError::IdentityNotFound(_))));
    }
}
