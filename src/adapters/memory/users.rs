//! In-memory user repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, TelegramId, UserId};
use crate::domain::user::{SenderProfile, UserIdentity};
use crate::ports::UserRepository;

/// User identities held in a map keyed by Telegram id.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<TelegramId, UserIdentity>>>,
    next_id: Arc<AtomicI64>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an identity directly (useful for tests).
    pub async fn insert(&self, user: UserIdentity) {
        self.next_id.fetch_max(user.id.value(), Ordering::SeqCst);
        self.users.write().await.insert(user.telegram_id, user);
    }

    pub async fn get(&self, telegram_id: TelegramId) -> Option<UserIdentity> {
        self.users.read().await.get(&telegram_id).cloned()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_telegram_id(
        &self,
        telegram_id: TelegramId,
    ) -> Result<Option<UserIdentity>, DomainError> {
        Ok(self.get(telegram_id).await)
    }

    async fn upsert_profile(&self, profile: &SenderProfile) -> Result<UserIdentity, DomainError> {
        let mut users = self.users.write().await;
        let user = users
            .entry(profile.telegram_id)
            .and_modify(|user| user.refresh_profile(profile))
            .or_insert_with(|| {
                let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
                UserIdentity::register(UserId::new(id), profile)
            });
        Ok(user.clone())
    }

    async fn update(&self, user: &UserIdentity) -> Result<(), DomainError> {
        let mut users = self.users.write().await;
        match users.get_mut(&user.telegram_id) {
            Some(existing) => {
                *existing = user.clone();
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::UserNotFound,
                format!("User {} not found", user.telegram_id),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::UserStatus;

    fn profile(name: &str) -> SenderProfile {
        SenderProfile {
            first_name: Some(name.to_string()),
            ..SenderProfile::bare(TelegramId::new(10))
        }
    }

    #[tokio::test]
    async fn upsert_creates_then_refreshes() {
        let repo = InMemoryUserRepository::new();

        let created = repo.upsert_profile(&profile("Ivan")).await.unwrap();
        assert_eq!(created.status, UserStatus::New);
        assert_eq!(created.id, UserId::new(1));

        let refreshed = repo.upsert_profile(&profile("Ivan P.")).await.unwrap();
        assert_eq!(refreshed.id, created.id);
        assert_eq!(refreshed.first_name.as_deref(), Some("Ivan P."));
    }

    #[tokio::test]
    async fn update_unknown_user_fails() {
        let repo = InMemoryUserRepository::new();
        let user = UserIdentity::register(UserId::new(5), &profile("Ivan"));
        let err = repo.update(&user).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::UserNotFound);
    }

    #[tokio::test]
    async fn inserted_ids_are_not_reused() {
        let repo = InMemoryUserRepository::new();
        let existing = UserIdentity::register(
            UserId::new(40),
            &SenderProfile::bare(TelegramId::new(99)),
        );
        repo.insert(existing).await;
        let created = repo.upsert_profile(&profile("Ivan")).await.unwrap();
        assert_eq!(created.id, UserId::new(41));
    }
}
