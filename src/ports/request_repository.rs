//! Request repository port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, RequestId};
use crate::domain::request::{NewRequest, RequestKind, RequestStatus, SubmittedRequest};

/// Console listing filter. `None` fields match everything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestFilter {
    pub status: Option<RequestStatus>,
    pub kind: Option<RequestKind>,
    pub limit: u32,
}

impl Default for RequestFilter {
    fn default() -> Self {
        Self {
            status: None,
            kind: None,
            limit: 50,
        }
    }
}

/// Repository port for submitted requests.
#[async_trait]
pub trait RequestRepository: Send + Sync {
    /// Write a new request with status `new` and return it with its id.
    async fn create(&self, request: NewRequest) -> Result<SubmittedRequest, DomainError>;

    /// Find a request by id. Returns `None` if not found.
    async fn find_by_id(&self, id: RequestId) -> Result<Option<SubmittedRequest>, DomainError>;

    /// List requests, newest first.
    async fn list(&self, filter: &RequestFilter) -> Result<Vec<SubmittedRequest>, DomainError>;

    /// Overwrite status and manager notes.
    ///
    /// # Errors
    ///
    /// - `RequestNotFound` if the request doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn update_status_and_notes(
        &self,
        id: RequestId,
        status: RequestStatus,
        notes: Option<&str>,
    ) -> Result<(), DomainError>;
}
