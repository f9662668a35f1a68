use std::collections::HashMap;

use crate::domain::{Category, NameKey, Person, PersonId, Product, ProductId, Transaction};

/// Record counts, for status lines and integrity checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StoreStats {
    pub category_count: usize,
    pub person_count: usize,
    pub product_count: usize,
    pub transaction_count: usize,
}

/// In-memory collections for one session. Named records are keyed by their
/// folded name so lookups are case-insensitive; transactions keep insertion order.
///
/// The store does not validate: callers check for duplicates before saving.
#[derive(Debug, Default)]
pub struct Store {
    categories: HashMap<NameKey, Category>,
    persons: HashMap<NameKey, Person>,
    products: HashMap<NameKey, Product>,
    transactions: Vec<Transaction>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================
    // Category operations
    // ========================

    pub fn save_category(&mut self, category: Category) {
        let key = category.key();
        assert!(
            !self.categories.contains_key(&key),
            "Category '{}' is already stored",
            category.name
        );
        self.categories.insert(key, category);
    }

    pub fn get_category_by_name(&self, name: &str) -> Option<&Category> {
        self.categories.get(&NameKey::new(name))
    }

    pub fn list_categories(&self) -> Vec<&Category> {
        let mut categories: Vec<&Category> = self.categories.values().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        categories
    }

    /// Category names, sorted ascending.
    pub fn list_category_names(&self) -> Vec<String> {
        sorted_names(self.categories.values().map(|c| c.name.clone()))
    }

    // ========================
    // Person operations
    // ========================

    pub fn save_person(&mut self, person: Person) {
        let key = person.key();
        assert!(
            !self.persons.contains_key(&key),
            "Person '{}' is already stored",
            person.name
        );
        self.persons.insert(key, person);
    }

    pub fn get_person_by_name(&self, name: &str) -> Option<&Person> {
        self.persons.get(&NameKey::new(name))
    }

    pub fn get_person(&self, id: PersonId) -> Option<&Person> {
        self.persons.values().find(|p| p.id == id)
    }

    pub fn list_persons(&self) -> Vec<&Person> {
        let mut persons: Vec<&Person> = self.persons.values().collect();
        persons.sort_by(|a, b| a.key().cmp(&b.key()).then_with(|| a.name.cmp(&b.name)));
        persons
    }

    /// Person names, sorted case-insensitively.
    pub fn list_person_names(&self) -> Vec<String> {
        self.list_persons()
            .into_iter()
            .map(|p| p.name.clone())
            .collect()
    }

    // ========================
    // Product operations
    // ========================

    pub fn save_product(&mut self, product: Product) {
        let key = product.key();
        assert!(
            !self.products.contains_key(&key),
            "Product '{}' is already stored",
            product.name
        );
        self.products.insert(key, product);
    }

    pub fn get_product_by_name(&self, name: &str) -> Option<&Product> {
        self.products.get(&NameKey::new(name))
    }

    pub fn get_product(&self, id: ProductId) -> Option<&Product> {
        self.products.values().find(|p| p.id == id)
    }

    /// Replace the category set of every product whose folded name matches `name`.
    /// Returns how many products changed.
    pub fn update_product_categories(&mut self, name: &str, categories: &[String]) -> usize {
        let key = NameKey::new(name);
        self.products
            .iter_mut()
            .filter(|(product_key, _)| **product_key == key)
            .map(|(_, product)| product.replace_categories(categories.to_vec()))
            .filter(|changed| *changed)
            .count()
    }

    pub fn list_products(&self) -> Vec<&Product> {
        let mut products: Vec<&Product> = self.products.values().collect();
        products.sort_by(|a, b| a.name.cmp(&b.name));
        products
    }

    /// Product names, sorted ascending.
    pub fn list_product_names(&self) -> Vec<String> {
        sorted_names(self.products.values().map(|p| p.name.clone()))
    }

    // ========================
    // Transaction operations
    // ========================

    pub fn save_transaction(&mut self, transaction: Transaction) {
        assert!(
            self.get_product(transaction.product).is_some(),
            "Transaction references an unknown product"
        );
        self.transactions.push(transaction);
    }

    /// Transactions in the order they were recorded.
    pub fn list_transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn list_transactions_for_product(&self, product: ProductId) -> Vec<&Transaction> {
        self.transactions
            .iter()
            .filter(|t| t.product == product)
            .collect()
    }

    pub fn stats(&self) -> StoreStats {
        StoreStats {
            category_count: self.categories.len(),
            person_count: self.persons.len(),
            product_count: self.products.len(),
            transaction_count: self.transactions.len(),
        }
    }
}

fn sorted_names(names: impl Iterator<Item = String>) -> Vec<String> {
    let mut names: Vec<String> = names.collect();
    names.sort();
    names.dedup();
    names
}
