use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::NameKey;

pub type PersonId = Uuid;

/// Someone a transaction is made with (from/to) or for (why).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub name: String,
    /// Free-form groups the person belongs to (e.g. "family", "work").
    pub categories: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Person {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            categories: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn with_categories(mut self, categories: Vec<String>) -> Self {
        self.categories = categories;
        self
    }

    pub fn key(&self) -> NameKey {
        NameKey::new(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_person() {
        let person = Person::new("Alice").with_categories(vec!["family".into()]);
        assert_eq!(person.name, "Alice");
        assert_eq!(person.categories, vec!["family".to_string()]);
        assert_eq!(person.key(), NameKey::new("alice"));
    }

    #[test]
    fn test_person_categories_default_empty() {
        assert!(Person::new("Bob").categories.is_empty());
    }
}
