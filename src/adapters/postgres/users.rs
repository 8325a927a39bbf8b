//! PostgreSQL implementation of UserRepository.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{DomainError, ErrorCode, TelegramId, Timestamp, UserId};
use crate::domain::user::{ConsentRecord, SenderProfile, UserIdentity, UserStatus};
use crate::ports::UserRepository;

const USER_COLUMNS: &str = r#"
    id, telegram_id, username, first_name, last_name, language_code, phone,
    status, is_18_confirmed, consent_accepted, consent_version, consent_accepted_at,
    created_at, last_activity
"#;

/// Users stored in the console's `barsuk_app_telegramuser` table.
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_telegram_id(
        &self,
        telegram_id: TelegramId,
    ) -> Result<Option<UserIdentity>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM barsuk_app_telegramuser WHERE telegram_id = $1",
            USER_COLUMNS
        ))
        .bind(telegram_id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to fetch user: {}", e)))?;

        row.map(row_to_user).transpose()
    }

    async fn upsert_profile(&self, profile: &SenderProfile) -> Result<UserIdentity, DomainError> {
        // A known user keeps its status and phone; only profile fields refresh.
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO barsuk_app_telegramuser (
                telegram_id, username, first_name, last_name, language_code,
                status, is_18_confirmed, consent_accepted, city, points, level,
                created_at, updated_at, last_activity
            ) VALUES ($1, $2, $3, $4, COALESCE($5, 'ru'), 'NEW', FALSE, FALSE,
                      'Тюмень', 0, 'Bronze', NOW(), NOW(), NOW())
            ON CONFLICT (telegram_id) DO UPDATE SET
                username = EXCLUDED.username,
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                language_code = COALESCE($5, barsuk_app_telegramuser.language_code),
                updated_at = NOW(),
                last_activity = NOW()
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(profile.telegram_id.value())
        .bind(profile.username.as_deref())
        .bind(profile.first_name.as_deref())
        .bind(profile.last_name.as_deref())
        .bind(profile.language_code.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to upsert user: {}", e)))?;

        row_to_user(row)
    }

    async fn update(&self, user: &UserIdentity) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE barsuk_app_telegramuser SET
                username = $2,
                first_name = $3,
                last_name = $4,
                phone = $5,
                status = $6,
                is_18_confirmed = $7,
                consent_accepted = $8,
                consent_version = $9,
                consent_accepted_at = $10,
                last_activity = $11,
                updated_at = NOW()
            WHERE telegram_id = $1
            "#,
        )
        .bind(user.telegram_id.value())
        .bind(user.username.as_deref())
        .bind(user.first_name.as_deref())
        .bind(user.last_name.as_deref())
        .bind(user.phone.as_deref())
        .bind(user.status.as_str())
        .bind(user.is_18_confirmed)
        .bind(user.consent.is_some())
        .bind(user.consent.as_ref().map(|c| c.version.as_str()))
        .bind(user.consent.as_ref().map(|c| *c.accepted_at.as_datetime()))
        .bind(user.last_activity.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to update user: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::UserNotFound,
                format!("User {} not found", user.telegram_id),
            ));
        }

        Ok(())
    }
}

fn row_to_user(row: sqlx::postgres::PgRow) -> Result<UserIdentity, DomainError> {
    let column = |name: &str, e: sqlx::Error| {
        DomainError::database(format!("Failed to read user column {}: {}", name, e))
    };

    let status: String = row.try_get("status").map_err(|e| column("status", e))?;
    let status: UserStatus = status.parse().map_err(|_| {
        DomainError::database(format!("Unknown user status in database: {}", status))
    })?;

    let consent_accepted: bool = row
        .try_get("consent_accepted")
        .map_err(|e| column("consent_accepted", e))?;
    let consent_version: Option<String> = row
        .try_get("consent_version")
        .map_err(|e| column("consent_version", e))?;
    let consent_accepted_at: Option<chrono::DateTime<chrono::Utc>> = row
        .try_get("consent_accepted_at")
        .map_err(|e| column("consent_accepted_at", e))?;
    let consent = match (consent_accepted, consent_version, consent_accepted_at) {
        (true, Some(version), Some(accepted_at)) => Some(ConsentRecord {
            version,
            accepted_at: Timestamp::from_datetime(accepted_at),
        }),
        _ => None,
    };

    let created_at: chrono::DateTime<chrono::Utc> =
        row.try_get("created_at").map_err(|e| column("created_at", e))?;
    let last_activity: chrono::DateTime<chrono::Utc> = row
        .try_get("last_activity")
        .map_err(|e| column("last_activity", e))?;

    Ok(UserIdentity {
        id: UserId::new(row.try_get("id").map_err(|e| column("id", e))?),
        telegram_id: TelegramId::new(
            row.try_get("telegram_id")
                .map_err(|e| column("telegram_id", e))?,
        ),
        username: row.try_get("username").map_err(|e| column("username", e))?,
        first_name: row.try_get("first_name").map_err(|e| column("first_name", e))?,
        last_name: row.try_get("last_name").map_err(|e| column("last_name", e))?,
        language_code: row
            .try_get("language_code")
            .map_err(|e| column("language_code", e))?,
        phone: row.try_get("phone").map_err(|e| column("phone", e))?,
        status,
        is_18_confirmed: row
            .try_get("is_18_confirmed")
            .map_err(|e| column("is_18_confirmed", e))?,
        consent,
        created_at: Timestamp::from_datetime(created_at),
        last_activity: Timestamp::from_datetime(last_activity),
    })
}
