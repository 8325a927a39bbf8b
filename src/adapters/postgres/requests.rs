//! PostgreSQL implementation of RequestRepository.
//!
//! Payloads live in the JSON `data` column in the shape the console reads.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{
    DomainError, ErrorCode, RequestId, TelegramId, Timestamp, UserId,
};
use crate::domain::request::{
    NewRequest, RequestKind, RequestPayload, RequestStatus, SubmittedRequest,
};
use crate::ports::{RequestFilter, RequestRepository};

const REQUEST_SELECT: &str = r#"
    SELECT r.id, r.user_id, u.telegram_id, r.request_type, r.data, r.status,
           r.manager_notes, r.created_at, r.updated_at
    FROM barsuk_app_request r
    JOIN barsuk_app_telegramuser u ON u.id = r.user_id
"#;

#[derive(Clone)]
pub struct PostgresRequestRepository {
    pool: PgPool,
}

impl PostgresRequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RequestRepository for PostgresRequestRepository {
    async fn create(&self, request: NewRequest) -> Result<SubmittedRequest, DomainError> {
        let data = serde_json::to_value(&request.payload).map_err(|e| {
            DomainError::new(
                ErrorCode::InternalError,
                format!("Failed to encode request payload: {}", e),
            )
        })?;

        let row = sqlx::query(
            r#"
            INSERT INTO barsuk_app_request (user_id, request_type, data, status, created_at, updated_at)
            VALUES ($1, $2, $3, 'new', NOW(), NOW())
            RETURNING id, created_at
            "#,
        )
        .bind(request.user_id.value())
        .bind(request.kind().as_str())
        .bind(&data)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to insert request: {}", e)))?;

        let id: i64 = row
            .try_get("id")
            .map_err(|e| DomainError::database(format!("Failed to read request id: {}", e)))?;
        let created_at: chrono::DateTime<chrono::Utc> = row.try_get("created_at").map_err(|e| {
            DomainError::database(format!("Failed to read request created_at: {}", e))
        })?;

        Ok(SubmittedRequest::from_new(
            RequestId::new(id),
            request,
            Timestamp::from_datetime(created_at),
        ))
    }

    async fn find_by_id(&self, id: RequestId) -> Result<Option<SubmittedRequest>, DomainError> {
        let row = sqlx::query(&format!("{} WHERE r.id = $1", REQUEST_SELECT))
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to fetch request: {}", e)))?;

        row.map(row_to_request).transpose()
    }

    async fn list(&self, filter: &RequestFilter) -> Result<Vec<SubmittedRequest>, DomainError> {
        let rows = sqlx::query(&format!(
            r#"{}
            WHERE ($1::TEXT IS NULL OR r.status = $1)
              AND ($2::TEXT IS NULL OR r.request_type = $2)
            ORDER BY r.created_at DESC, r.id DESC
            LIMIT $3
            "#,
            REQUEST_SELECT
        ))
        .bind(filter.status.map(|s| s.as_str()))
        .bind(filter.kind.map(|k| k.as_str()))
        .bind(i64::from(filter.limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to list requests: {}", e)))?;

        rows.into_iter().map(row_to_request).collect()
    }

    async fn update_status_and_notes(
        &self,
        id: RequestId,
        status: RequestStatus,
        notes: Option<&str>,
    ) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE barsuk_app_request SET
                status = $2,
                manager_notes = COALESCE($3, manager_notes),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id.value())
        .bind(status.as_str())
        .bind(notes)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to update request: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::RequestNotFound,
                format!("Request {} not found", id),
            ));
        }

        Ok(())
    }
}

fn row_to_request(row: sqlx::postgres::PgRow) -> Result<SubmittedRequest, DomainError> {
    let column = |name: &str, e: sqlx::Error| {
        DomainError::database(format!("Failed to read request column {}: {}", name, e))
    };

    let id: i64 = row.try_get("id").map_err(|e| column("id", e))?;
    let kind: String = row.try_get("request_type").map_err(|e| column("request_type", e))?;
    let kind: RequestKind = kind
        .parse()
        .map_err(|_| DomainError::database(format!("Unknown request type: {}", kind)))?;
    let status: String = row.try_get("status").map_err(|e| column("status", e))?;
    let status: RequestStatus = status
        .parse()
        .map_err(|_| DomainError::database(format!("Unknown request status: {}", status)))?;
    let data: serde_json::Value = row.try_get("data").map_err(|e| column("data", e))?;
    let payload = RequestPayload::from_json(kind, data).map_err(|e| {
        DomainError::database(format!("Malformed payload for request {}: {}", id, e))
    })?;
    let created_at: chrono::DateTime<chrono::Utc> =
        row.try_get("created_at").map_err(|e| column("created_at", e))?;
    let updated_at: chrono::DateTime<chrono::Utc> =
        row.try_get("updated_at").map_err(|e| column("updated_at", e))?;

    Ok(SubmittedRequest {
        id: RequestId::new(id),
        user_id: UserId::new(row.try_get("user_id").map_err(|e| column("user_id", e))?),
        telegram_id: TelegramId::new(
            row.try_get("telegram_id")
                .map_err(|e| column("telegram_id", e))?,
        ),
        kind,
        payload,
        status,
        manager_notes: row
            .try_get("manager_notes")
            .map_err(|e| column("manager_notes", e))?,
        created_at: Timestamp::from_datetime(created_at),
        updated_at: Timestamp::from_datetime(updated_at),
    })
}
