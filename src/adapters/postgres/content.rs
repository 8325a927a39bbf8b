//! PostgreSQL implementation of ContentReader.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::content::{ContentCategory, ContentItem, MenuSection};
use crate::domain::foundation::{CategoryId, DomainError};
use crate::ports::ContentReader;

/// Reads active menu content managed from the console.
#[derive(Clone)]
pub struct PostgresContentReader {
    pool: PgPool,
}

impl PostgresContentReader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContentReader for PostgresContentReader {
    async fn menu(&self) -> Result<Vec<MenuSection>, DomainError> {
        let category_rows = sqlx::query(
            r#"
            SELECT id, name, description, "order"
            FROM barsuk_app_contentcategory
            WHERE is_active
            ORDER BY "order", name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to fetch categories: {}", e)))?;

        // Prices are read as text so the display keeps the stored precision.
        let item_rows = sqlx::query(
            r#"
            SELECT category_id, name, description, price::TEXT AS price, "order"
            FROM barsuk_app_contentitem
            WHERE is_active
            ORDER BY "order", name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to fetch content items: {}", e)))?;

        let mut sections = category_rows
            .into_iter()
            .map(|row| {
                Ok(MenuSection {
                    category: ContentCategory {
                        id: CategoryId::new(row.try_get("id").map_err(read_err)?),
                        name: row.try_get("name").map_err(read_err)?,
                        description: non_empty(row.try_get("description").map_err(read_err)?),
                        position: row.try_get("order").map_err(read_err)?,
                    },
                    items: Vec::new(),
                })
            })
            .collect::<Result<Vec<_>, DomainError>>()?;

        for row in item_rows {
            let category_id = CategoryId::new(row.try_get("category_id").map_err(read_err)?);
            let Some(section) = sections.iter_mut().find(|s| s.category.id == category_id) else {
                continue;
            };
            section.items.push(ContentItem {
                name: row.try_get("name").map_err(read_err)?,
                description: non_empty(row.try_get("description").map_err(read_err)?),
                price: row.try_get("price").map_err(read_err)?,
                position: row.try_get("order").map_err(read_err)?,
            });
        }

        Ok(sections)
    }
}

fn read_err(e: sqlx::Error) -> DomainError {
    DomainError::database(format!("Failed to read content row: {}", e))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
