//! In-memory request repository.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, RequestId, Timestamp};
use crate::domain::request::{NewRequest, RequestStatus, SubmittedRequest};
use crate::ports::{RequestFilter, RequestRepository};

/// Requests held in insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRequestRepository {
    requests: Arc<RwLock<Vec<SubmittedRequest>>>,
    fail_writes: Arc<AtomicBool>,
}

impl InMemoryRequestRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail with a database error.
    pub fn set_failing(&self, failing: bool) {
        self.fail_writes.store(failing, Ordering::SeqCst);
    }

    pub async fn all(&self) -> Vec<SubmittedRequest> {
        self.requests.read().await.clone()
    }

    fn check_writable(&self) -> Result<(), DomainError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DomainError::database("Simulated write failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl RequestRepository for InMemoryRequestRepository {
    async fn create(&self, request: NewRequest) -> Result<SubmittedRequest, DomainError> {
        self.check_writable()?;
        let mut requests = self.requests.write().await;
        let id = RequestId::new(requests.len() as i64 + 1);
        let stored = SubmittedRequest::from_new(id, request, Timestamp::now());
        requests.push(stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: RequestId) -> Result<Option<SubmittedRequest>, DomainError> {
        Ok(self
            .requests
            .read()
            .await
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn list(&self, filter: &RequestFilter) -> Result<Vec<SubmittedRequest>, DomainError> {
        let requests = self.requests.read().await;
        Ok(requests
            .iter()
            .rev()
            .filter(|r| filter.status.map_or(true, |s| r.status == s))
            .filter(|r| filter.kind.map_or(true, |k| r.kind == k))
            .take(filter.limit as usize)
            .cloned()
            .collect())
    }

    async fn update_status_and_notes(
        &self,
        id: RequestId,
        status: RequestStatus,
        notes: Option<&str>,
    ) -> Result<(), DomainError> {
        self.check_writable()?;
        let mut requests = self.requests.write().await;
        let request = requests.iter_mut().find(|r| r.id == id).ok_or_else(|| {
            DomainError::new(ErrorCode::RequestNotFound, format!("Request {} not found", id))
        })?;
        request.status = status;
        if let Some(notes) = notes {
            request.manager_notes = Some(notes.to_string());
        }
        request.updated_at = Timestamp::now();
        Ok(())
    }
}
