use chrono::{Local, NaiveDate};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::domain::{
    Category, Cents, Person, PersonId, Product, Transaction, display_name, normalize_categories,
    visible_len,
};
use crate::storage::{Store, StoreStats};

use super::{CategoryConflict, LedgerError, OverrideDecision, Settings};

/// Application service providing the validated operations on the ledger.
/// This is the only way clients (CLI session, tests, embedders) mutate the store.
#[derive(Debug, Default)]
pub struct LedgerService {
    store: Store,
    settings: Settings,
    last_error: Option<LedgerError>,
}

/// Raw input for recording a transaction, as collected by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub product: String,
    pub quantity: i64,
    pub cashflow_cents: Cents,
    pub categories: Vec<String>,
    pub from_to: Vec<String>,
    pub why: Vec<String>,
}

/// What happened to a transaction that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub enum TransactionOutcome {
    Added(Transaction),
    /// The product's categories differed and the override was declined.
    NotAdded { product: String },
}

/// A transaction with its references resolved to names.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionInfo {
    pub transaction: Transaction,
    pub product_name: String,
    pub categories: Vec<String>,
    pub from_to: Vec<String>,
    pub why: Vec<String>,
}

/// Read-only view of the whole ledger, ordered for display.
#[derive(Debug, Serialize)]
pub struct LedgerSnapshot<'a> {
    pub categories: Vec<&'a Category>,
    pub persons: Vec<&'a Person>,
    pub products: Vec<&'a Product>,
    pub transactions: &'a [Transaction],
}

impl NewTransaction {
    pub fn new(
        date: NaiveDate,
        product: impl Into<String>,
        quantity: i64,
        cashflow_cents: Cents,
    ) -> Self {
        Self {
            date,
            product: product.into(),
            quantity,
            cashflow_cents,
            categories: Vec::new(),
            from_to: Vec::new(),
            why: Vec::new(),
        }
    }

    pub fn with_categories<S: Into<String>>(mut self, categories: impl IntoIterator<Item = S>) -> Self {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_from_to<S: Into<String>>(mut self, persons: impl IntoIterator<Item = S>) -> Self {
        self.from_to = persons.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_why<S: Into<String>>(mut self, persons: impl IntoIterator<Item = S>) -> Self {
        self.why = persons.into_iter().map(Into::into).collect();
        self
    }
}

impl TransactionOutcome {
    pub fn is_added(&self) -> bool {
        matches!(self, TransactionOutcome::Added(_))
    }

    pub fn transaction(&self) -> Option<&Transaction> {
        match self {
            TransactionOutcome::Added(transaction) => Some(transaction),
            TransactionOutcome::NotAdded { .. } => None,
        }
    }
}

impl LedgerService {
    /// Create an empty ledger with the given validation settings.
    pub fn new(settings: Settings) -> Self {
        Self {
            store: Store::new(),
            settings,
            last_error: None,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// The most recent rejection, cleared by the next call that succeeds.
    pub fn last_error(&self) -> Option<&LedgerError> {
        self.last_error.as_ref()
    }

    // ========================
    // Category operations
    // ========================

    /// Add a new category. Names are compared case-insensitively.
    pub fn add_category(&mut self, name: &str) -> Result<Category, LedgerError> {
        let result = self.try_add_category(name);
        self.track(result)
    }

    fn try_add_category(&mut self, name: &str) -> Result<Category, LedgerError> {
        let name = self.validate_name(name)?;
        if self.store.get_category_by_name(&name).is_some() {
            return Err(LedgerError::CategoryAlreadyExists(name));
        }

        let category = Category::new(name);
        self.store.save_category(category.clone());
        info!(category = %category.name, "added category");
        Ok(category)
    }

    /// Category names, sorted ascending.
    pub fn category_names(&self) -> Vec<String> {
        self.store.list_category_names()
    }

    // ========================
    // Person operations
    // ========================

    /// Add a new person. Names are compared case-insensitively.
    pub fn add_person(&mut self, name: &str) -> Result<Person, LedgerError> {
        self.add_person_with_categories(name, Vec::new())
    }

    /// Add a new person belonging to the given person categories.
    pub fn add_person_with_categories(
        &mut self,
        name: &str,
        categories: Vec<String>,
    ) -> Result<Person, LedgerError> {
        let result = self.try_add_person(name, categories);
        self.track(result)
    }

    fn try_add_person(&mut self, name: &str, categories: Vec<String>) -> Result<Person, LedgerError> {
        let name = self.validate_name(name)?;
        if self.store.get_person_by_name(&name).is_some() {
            return Err(LedgerError::PersonAlreadyExists(name));
        }

        let person = Person::new(name).with_categories(categories);
        self.store.save_person(person.clone());
        info!(person = %person.name, "added person");
        Ok(person)
    }

    /// Person names, sorted case-insensitively.
    pub fn person_names(&self) -> Vec<String> {
        self.store.list_person_names()
    }

    // ========================
    // Product operations
    // ========================

    /// Product names, sorted ascending.
    pub fn product_names(&self) -> Vec<String> {
        self.store.list_product_names()
    }

    /// Get a product by name (case-insensitive).
    pub fn product(&self, name: &str) -> Result<&Product, LedgerError> {
        self.store
            .get_product_by_name(name)
            .ok_or_else(|| LedgerError::ProductNotFound(name.to_string()))
    }

    /// Report whether recording `product_name` with `categories` would need an override.
    ///
    /// This is the first phase of a two-phase add: callers that cannot answer
    /// from inside `add_transaction` ask first, then pass their answer as the decision.
    pub fn check_conflict(
        &self,
        product_name: &str,
        categories: &[String],
    ) -> Result<Option<CategoryConflict>, LedgerError> {
        let categories = self.resolve_categories(categories)?;
        Ok(self.category_conflict(&display_name(product_name), &categories))
    }

    // ========================
    // Transaction operations
    // ========================

    /// Validate and record a transaction.
    ///
    /// Nothing is mutated unless every check passes. When the product exists
    /// with a different category set, `decide` is asked whether to override it;
    /// declining returns [`TransactionOutcome::NotAdded`].
    pub fn add_transaction<D>(
        &mut self,
        request: NewTransaction,
        decide: &mut D,
    ) -> Result<TransactionOutcome, LedgerError>
    where
        D: OverrideDecision + ?Sized,
    {
        let result = self.try_add_transaction(request, decide);
        self.track(result)
    }

    fn try_add_transaction<D>(
        &mut self,
        request: NewTransaction,
        decide: &mut D,
    ) -> Result<TransactionOutcome, LedgerError>
    where
        D: OverrideDecision + ?Sized,
    {
        let NewTransaction {
            date,
            product,
            quantity,
            cashflow_cents,
            categories,
            from_to,
            why,
        } = request;

        let today = Local::now().date_naive();
        if date > today {
            return Err(LedgerError::FutureDate { date, today });
        }

        let product_name = display_name(&product);
        if product_name.is_empty() {
            return Err(LedgerError::EmptyProductName);
        }

        if quantity <= 0 {
            return Err(LedgerError::InvalidQuantity(quantity));
        }

        if cashflow_cents == 0 {
            return Err(LedgerError::ZeroCashflow);
        }

        let categories = self.resolve_categories(&categories)?;
        let from_to = self.validate_person_names(&from_to)?;
        let why = self.validate_person_names(&why)?;

        if let Some(conflict) = self.category_conflict(&product_name, &categories) {
            if !decide.approve(&conflict) {
                info!(product = %conflict.product, "category override declined, transaction not added");
                return Ok(TransactionOutcome::NotAdded {
                    product: conflict.product,
                });
            }
            let changed = self.store.update_product_categories(&product_name, &categories);
            info!(
                product = %conflict.product,
                from = ?conflict.current,
                to = ?conflict.proposed,
                changed,
                "overrode product categories"
            );
        }

        let existing = self.store.get_product_by_name(&product_name).map(|p| p.id);
        let product_id = match existing {
            Some(id) => id,
            None => {
                let product = Product::new(product_name, categories);
                let id = product.id;
                info!(product = %product.name, categories = ?product.categories, "added product");
                self.store.save_product(product);
                id
            }
        };

        let from_to = self.resolve_persons(from_to);
        let why = self.resolve_persons(why);

        let transaction = Transaction::new(product_id, quantity, cashflow_cents, date)
            .with_from_to(from_to)
            .with_why(why);
        self.store.save_transaction(transaction.clone());
        info!(
            id = %transaction.id,
            date = %transaction.date,
            quantity = transaction.quantity,
            cashflow_cents = transaction.cashflow_cents,
            "recorded transaction"
        );

        Ok(TransactionOutcome::Added(transaction))
    }

    /// Transactions in the order they were recorded.
    pub fn transactions(&self) -> &[Transaction] {
        self.store.list_transactions()
    }

    /// All transactions with names resolved, in the order they were recorded.
    pub fn list_transaction_info(&self) -> Vec<TransactionInfo> {
        self.store
            .list_transactions()
            .iter()
            .map(|t| self.describe(t))
            .collect()
    }

    /// Transactions recorded for one product (case-insensitive name).
    pub fn product_transactions(&self, name: &str) -> Result<Vec<TransactionInfo>, LedgerError> {
        let product = self.product(name)?;
        Ok(self
            .store
            .list_transactions_for_product(product.id)
            .into_iter()
            .map(|t| self.describe(t))
            .collect())
    }

    /// Resolve a transaction's product and persons to their current names.
    pub fn describe(&self, transaction: &Transaction) -> TransactionInfo {
        let product = self.store.get_product(transaction.product);
        TransactionInfo {
            transaction: transaction.clone(),
            product_name: product.map(|p| p.name.clone()).unwrap_or_default(),
            categories: product.map(|p| p.categories.clone()).unwrap_or_default(),
            from_to: self.person_names_for(&transaction.from_to),
            why: self.person_names_for(&transaction.why),
        }
    }

    pub fn stats(&self) -> StoreStats {
        self.store.stats()
    }

    pub fn snapshot(&self) -> LedgerSnapshot<'_> {
        LedgerSnapshot {
            categories: self.store.list_categories(),
            persons: self.store.list_persons(),
            products: self.store.list_products(),
            transactions: self.store.list_transactions(),
        }
    }

    // ========================
    // Validation helpers
    // ========================

    fn validate_name(&self, name: &str) -> Result<String, LedgerError> {
        let display = display_name(name);
        if visible_len(&display) < self.settings.min_name_chars {
            return Err(LedgerError::NameTooShort {
                name: name.to_string(),
                min: self.settings.min_name_chars,
            });
        }
        Ok(display)
    }

    /// Map category names to their stored spelling, failing on the first unknown one.
    fn resolve_categories(&self, names: &[String]) -> Result<Vec<String>, LedgerError> {
        let stored = names
            .iter()
            .map(|name| {
                self.store
                    .get_category_by_name(name)
                    .map(|c| c.name.clone())
                    .ok_or_else(|| LedgerError::UnknownCategory(name.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(normalize_categories(stored))
    }

    /// Check that every person name either exists or may be created.
    fn validate_person_names(&self, names: &[String]) -> Result<Vec<String>, LedgerError> {
        names
            .iter()
            .map(|name| {
                let display = display_name(name);
                if self.store.get_person_by_name(&display).is_some() {
                    Ok(display)
                } else if self.settings.create_unknown_persons {
                    self.validate_name(name)
                } else {
                    Err(LedgerError::UnknownPerson(name.clone()))
                }
            })
            .collect()
    }

    /// Look up validated person names, creating the missing ones. Each person appears once.
    fn resolve_persons(&mut self, names: Vec<String>) -> Vec<PersonId> {
        let mut ids = Vec::with_capacity(names.len());
        for name in names {
            let existing = self.store.get_person_by_name(&name).map(|p| p.id);
            let id = match existing {
                Some(id) => {
                    debug!(person = %name, "resolved person");
                    id
                }
                None => {
                    let person = Person::new(name);
                    let id = person.id;
                    info!(person = %person.name, "created person from transaction");
                    self.store.save_person(person);
                    id
                }
            };
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids
    }

    fn category_conflict(&self, product_name: &str, categories: &[String]) -> Option<CategoryConflict> {
        let product = self.store.get_product_by_name(product_name)?;
        if product.has_categories(categories) {
            return None;
        }
        Some(CategoryConflict {
            product: product.name.clone(),
            current: product.categories.clone(),
            proposed: normalize_categories(categories.to_vec()),
        })
    }

    fn person_names_for(&self, ids: &[PersonId]) -> Vec<String> {
        ids.iter()
            .filter_map(|id| self.store.get_person(*id))
            .map(|p| p.name.clone())
            .collect()
    }

    fn track<T>(&mut self, result: Result<T, LedgerError>) -> Result<T, LedgerError> {
        match &result {
            Ok(_) => self.last_error = None,
            Err(err) => {
                warn!(error = %err, "ledger operation rejected");
                self.last_error = Some(err.clone());
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{AlwaysApprove, AlwaysDecline};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn seeded() -> LedgerService {
        let mut service = LedgerService::default();
        service.add_category("Food").unwrap();
        service.add_category("Bakery").unwrap();
        service.add_person("Alice").unwrap();
        service
    }

    #[test]
    fn test_last_error_tracks_latest_call() {
        let mut service = LedgerService::default();

        assert!(service.add_category("ab").is_err());
        assert!(matches!(
            service.last_error(),
            Some(LedgerError::NameTooShort { min: 3, .. })
        ));

        service.add_category("abc").unwrap();
        assert!(service.last_error().is_none());
    }

    #[test]
    fn test_category_name_is_trimmed() {
        let mut service = LedgerService::default();
        let category = service.add_category("  Eating   Out ").unwrap();
        assert_eq!(category.name, "Eating Out");
        assert_eq!(service.category_names(), vec!["Eating Out"]);
    }

    #[test]
    fn test_min_name_chars_is_configurable() {
        let mut service = LedgerService::new(Settings::default().with_min_name_chars(5));
        assert!(service.add_category("Food").is_err());
        assert!(service.add_category("Foods").is_ok());
    }

    #[test]
    fn test_no_prompt_for_new_product() {
        let mut service = seeded();
        let request = NewTransaction::new(date("2024-01-01"), "Bread", 1, -250)
            .with_categories(["Food"]);

        let mut asked = false;
        let outcome = service
            .add_transaction(request, &mut |_: &CategoryConflict| {
                asked = true;
                true
            })
            .unwrap();

        assert!(outcome.is_added());
        assert!(!asked);
    }

    #[test]
    fn test_check_conflict_reports_both_sets() {
        let mut service = seeded();
        let request = NewTransaction::new(date("2024-01-01"), "Bread", 1, -250)
            .with_categories(["Food"]);
        service.add_transaction(request, &mut AlwaysDecline).unwrap();

        let conflict = service
            .check_conflict("bread", &["bakery".to_string()])
            .unwrap()
            .unwrap();
        assert_eq!(conflict.product, "Bread");
        assert_eq!(conflict.current, vec!["Food"]);
        assert_eq!(conflict.proposed, vec!["Bakery"]);

        assert!(service.check_conflict("Bread", &["FOOD".to_string()]).unwrap().is_none());
        assert!(service.check_conflict("Milk", &["Bakery".to_string()]).unwrap().is_none());
    }

    #[test]
    fn test_check_conflict_rejects_unknown_category() {
        let service = seeded();
        let err = service
            .check_conflict("Bread", &["Drinks".to_string()])
            .unwrap_err();
        assert_eq!(err, LedgerError::UnknownCategory("Drinks".into()));
    }

    #[test]
    fn test_describe_resolves_names() {
        let mut service = seeded();
        let request = NewTransaction::new(date("2024-01-01"), "bread", 2, -400)
            .with_categories(["food", "BAKERY"])
            .with_from_to(["alice"]);
        let outcome = service.add_transaction(request, &mut AlwaysApprove).unwrap();

        let info = service.describe(outcome.transaction().unwrap());
        assert_eq!(info.product_name, "bread");
        assert_eq!(info.categories, vec!["Bakery", "Food"]);
        assert_eq!(info.from_to, vec!["Alice"]);
        assert!(info.why.is_empty());
    }

    #[test]
    fn test_repeated_person_is_referenced_once() {
        let mut service = seeded();
        let request = NewTransaction::new(date("2024-01-01"), "Bread", 1, -100)
            .with_from_to(["Alice", "ALICE"]);
        let outcome = service.add_transaction(request, &mut AlwaysApprove).unwrap();

        assert_eq!(outcome.transaction().unwrap().from_to.len(), 1);
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut service = seeded();
        let request = NewTransaction::new(date("2024-01-01"), "Bread", 1, -100)
            .with_categories(["Food"]);
        service.add_transaction(request, &mut AlwaysApprove).unwrap();

        let json = serde_json::to_value(service.snapshot()).unwrap();
        assert_eq!(json["categories"].as_array().unwrap().len(), 2);
        assert_eq!(json["persons"][0]["name"], "Alice");
        assert_eq!(json["products"][0]["categories"][0], "Food");
        assert_eq!(json["transactions"][0]["cashflow_cents"], -100);
    }
}
