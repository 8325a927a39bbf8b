//! New-request notification port.

use async_trait::async_trait;

use crate::domain::request::SubmittedRequest;

/// Outcome of announcing one request to staff.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotificationReport {
    pub delivered: usize,
    pub failed: usize,
}

/// Announces freshly submitted requests to staff.
///
/// Never fails: per-recipient delivery problems are logged and counted.
#[async_trait]
pub trait RequestNotifier: Send + Sync {
    async fn notify_new_request(&self, request: &SubmittedRequest) -> NotificationReport;
}
