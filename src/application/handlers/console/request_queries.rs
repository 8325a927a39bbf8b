//! Read-side handlers for the staff console.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode, RequestId};
use crate::domain::request::SubmittedRequest;
use crate::ports::{RequestFilter, RequestRepository};

/// Upper bound on one listing page.
pub const MAX_LIST_LIMIT: u32 = 200;

pub struct ListRequestsHandler {
    requests: Arc<dyn RequestRepository>,
}

impl ListRequestsHandler {
    pub fn new(requests: Arc<dyn RequestRepository>) -> Self {
        Self { requests }
    }

    pub async fn handle(&self, mut filter: RequestFilter) -> Result<Vec<SubmittedRequest>, DomainError> {
        filter.limit = filter.limit.clamp(1, MAX_LIST_LIMIT);
        self.requests.list(&filter).await
    }
}

pub struct GetRequestHandler {
    requests: Arc<dyn RequestRepository>,
}

impl GetRequestHandler {
    pub fn new(requests: Arc<dyn RequestRepository>) -> Self {
        Self { requests }
    }

    pub async fn handle(&self, id: RequestId) -> Result<SubmittedRequest, DomainError> {
        self.requests.find_by_id(id).await?.ok_or_else(|| {
            DomainError::new(ErrorCode::RequestNotFound, format!("Request {} not found", id))
        })
    }
}
