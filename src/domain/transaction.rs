use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Cents, PersonId, ProductId, per_unit_cents};

pub type TransactionId = Uuid;

/// A purchase or sale of some quantity of a product on a given day.
/// Transactions are immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    /// Day the transaction happened in the real world
    pub date: NaiveDate,
    pub product: ProductId,
    /// Number of units, always at least 1
    pub quantity: i64,
    /// Signed amount: negative is an expense, positive is income. Never zero.
    pub cashflow_cents: Cents,
    /// `cashflow_cents / quantity`, rounded to the cent
    pub unit_cashflow_cents: Cents,
    /// Counterparties the product was bought from or sold to
    pub from_to: Vec<PersonId>,
    /// Persons the transaction was made for
    pub why: Vec<PersonId>,
    /// When the transaction was recorded in the ledger
    pub recorded_at: DateTime<Utc>,
}

impl Transaction {
    pub fn new(product: ProductId, quantity: i64, cashflow_cents: Cents, date: NaiveDate) -> Self {
        assert!(quantity > 0, "Transaction quantity must be positive");
        assert!(cashflow_cents != 0, "Transaction cashflow must not be zero");
        Self {
            id: Uuid::new_v4(),
            date,
            product,
            quantity,
            cashflow_cents,
            unit_cashflow_cents: per_unit_cents(cashflow_cents, quantity),
            from_to: Vec::new(),
            why: Vec::new(),
            recorded_at: Utc::now(),
        }
    }

    pub fn with_from_to(mut self, persons: Vec<PersonId>) -> Self {
        self.from_to = persons;
        self
    }

    pub fn with_why(mut self, persons: Vec<PersonId>) -> Self {
        self.why = persons;
        self
    }

    /// Returns true if money left the user's hands.
    pub fn is_expense(&self) -> bool {
        self.cashflow_cents < 0
    }

    /// Returns true if the person appears as a counterparty or as a reason.
    pub fn involves(&self, person: PersonId) -> bool {
        self.from_to.contains(&person) || self.why.contains(&person)
    }
}
