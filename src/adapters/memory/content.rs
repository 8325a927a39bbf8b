//! Static content reader.

use async_trait::async_trait;

use crate::domain::content::MenuSection;
use crate::domain::foundation::DomainError;
use crate::ports::ContentReader;

/// Serves a fixed menu.
#[derive(Debug, Clone, Default)]
pub struct StaticContentReader {
    sections: Vec<MenuSection>,
}

impl StaticContentReader {
    pub fn new(sections: Vec<MenuSection>) -> Self {
        Self { sections }
    }
}

#[async_trait]
impl ContentReader for StaticContentReader {
    async fn menu(&self) -> Result<Vec<MenuSection>, DomainError> {
        Ok(self.sections.clone())
    }
}
