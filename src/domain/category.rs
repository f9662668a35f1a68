use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::NameKey;

pub type CategoryId = Uuid;

/// A label products are filed under (e.g. "Groceries", "Utilities").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            created_at: Utc::now(),
        }
    }

    pub fn key(&self) -> NameKey {
        NameKey::new(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_key_is_case_folded() {
        let category = Category::new("Groceries");
        assert_eq!(category.key(), NameKey::new("GROCERIES"));
        assert_eq!(category.name, "Groceries");
    }
}
