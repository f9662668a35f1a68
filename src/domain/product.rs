use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::NameKey;

pub type ProductId = Uuid;

/// A product the user buys or sells, filed under a fixed set of categories.
///
/// Every transaction for the same product shares this record, so changing
/// the category set re-files the product's whole history. The replaced sets
/// are kept in `revisions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Category names, deduplicated and ordered by their folded key.
    pub categories: Vec<String>,
    /// Category sets this product had before each approved override, oldest first.
    pub revisions: Vec<CategoryRevision>,
    pub created_at: DateTime<Utc>,
}

/// A category set a product carried until `replaced_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRevision {
    pub categories: Vec<String>,
    pub replaced_at: DateTime<Utc>,
}

impl Product {
    pub fn new(name: impl Into<String>, categories: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            categories: normalize_categories(categories),
            revisions: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn key(&self) -> NameKey {
        NameKey::new(&self.name)
    }

    /// Returns true if `categories` names the same set as the stored one, ignoring case and order.
    pub fn has_categories(&self, categories: &[String]) -> bool {
        category_keys(&self.categories) == category_keys(categories)
    }

    /// Replace the category set, recording the previous one as a revision.
    /// Returns false and records nothing when the set is unchanged.
    pub fn replace_categories(&mut self, categories: Vec<String>) -> bool {
        if self.has_categories(&categories) {
            return false;
        }
        let previous = std::mem::replace(&mut self.categories, normalize_categories(categories));
        self.revisions.push(CategoryRevision {
            categories: previous,
            replaced_at: Utc::now(),
        });
        true
    }
}

/// Deduplicate category names case-insensitively (first spelling wins) and order them by key.
pub fn normalize_categories(categories: Vec<String>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut unique: Vec<(NameKey, String)> = categories
        .into_iter()
        .filter_map(|name| {
            let key = NameKey::new(&name);
            seen.insert(key.clone()).then_some((key, name))
        })
        .collect();
    unique.sort_by(|a, b| a.0.cmp(&b.0));
    unique.into_iter().map(|(_, name)| name).collect()
}

fn category_keys(categories: &[String]) -> BTreeSet<NameKey> {
    categories.iter().map(|name| NameKey::new(name)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_new_product_normalizes_categories() {
        let product = Product::new("Bread", names(&["Food", "Bakery", "food"]));
        assert_eq!(product.categories, names(&["Bakery", "Food"]));
        assert!(product.revisions.is_empty());
    }

    #[test]
    fn test_has_categories_ignores_case_and_order() {
        let product = Product::new("Bread", names(&["Food", "Bakery"]));
        assert!(product.has_categories(&names(&["bakery", "FOOD"])));
        assert!(!product.has_categories(&names(&["Food"])));
        assert!(!product.has_categories(&names(&["Food", "Bakery", "Snacks"])));
    }

    #[test]
    fn test_replace_categories_records_revision() {
        let mut product = Product::new("Bread", names(&["Food"]));

        assert!(product.replace_categories(names(&["Bakery"])));

        assert_eq!(product.categories, names(&["Bakery"]));
        assert_eq!(product.revisions.len(), 1);
        assert_eq!(product.revisions[0].categories, names(&["Food"]));
    }

    #[test]
    fn test_replace_with_same_set_is_noop() {
        let mut product = Product::new("Bread", names(&["Food"]));

        assert!(!product.replace_categories(names(&["FOOD"])));

        assert_eq!(product.categories, names(&["Food"]));
        assert!(product.revisions.is_empty());
    }

    #[test]
    fn test_empty_category_set() {
        let product = Product::new("Gift", Vec::new());
        assert!(product.has_categories(&[]));
        assert!(!product.has_categories(&names(&["Food"])));
    }
}
