//! Menu content read model.
//!
//! Categories and items are maintained by staff in the console; the bot only
//! reads the active ones to render the "Menu / Programs" screen.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::CategoryId;

/// An active menu category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentCategory {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    pub position: i32,
}

/// An active item in a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub name: String,
    pub description: Option<String>,
    /// Decimal price as stored, e.g. `"450.00"`.
    pub price: Option<String>,
    pub position: i32,
}

impl ContentItem {
    /// Price line shown to users; zero or missing prices are "on request".
    pub fn price_display(&self) -> String {
        match self.price.as_deref().map(str::trim) {
            Some(price) if !is_zero(price) => format!("{} ₽", price),
            _ => "Price on request".to_string(),
        }
    }
}

fn is_zero(price: &str) -> bool {
    price.is_empty() || price.chars().all(|c| c == '0' || c == '.')
}

/// A category with its active items, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuSection {
    pub category: ContentCategory,
    pub items: Vec<ContentItem>,
}
