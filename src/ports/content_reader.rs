//! Menu content reader port.

use async_trait::async_trait;

use crate::domain::content::MenuSection;
use crate::domain::foundation::DomainError;

/// Read-only access to menu content.
#[async_trait]
pub trait ContentReader: Send + Sync {
    /// Active categories in display order, each with its active items.
    async fn menu(&self) -> Result<Vec<MenuSection>, DomainError>;
}
