//! User repository port.
//!
//! Identities are keyed by Telegram id. The bot creates and updates them;
//! staff only block or delete them from the console.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, TelegramId};
use crate::domain::user::{SenderProfile, UserIdentity};

/// Repository port for user identities.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Resolve an identity by its Telegram id.
    ///
    /// Returns `None` if the user never pressed `/start`.
    async fn find_by_telegram_id(
        &self,
        telegram_id: TelegramId,
    ) -> Result<Option<UserIdentity>, DomainError>;

    /// Create the identity (status `NEW`) or refresh profile fields and
    /// `last_activity` for a known one.
    async fn upsert_profile(&self, profile: &SenderProfile) -> Result<UserIdentity, DomainError>;

    /// Persist status, phone and consent fields.
    ///
    /// # Errors
    ///
    /// - `UserNotFound` if the identity doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn update(&self, user: &UserIdentity) -> Result<(), DomainError>;
}
