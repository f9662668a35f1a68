use chrono::NaiveDate;
use thiserror::Error;

/// Reasons the ledger refuses an operation. None of them leave partial changes behind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Name '{name}' must have at least {min} non-space characters")]
    NameTooShort { name: String, min: usize },

    #[error("Category already exists: {0}")]
    CategoryAlreadyExists(String),

    #[error("Person already exists: {0}")]
    PersonAlreadyExists(String),

    #[error("Date {date} is in the future (today is {today})")]
    FutureDate { date: NaiveDate, today: NaiveDate },

    #[error("Product name must contain a visible character")]
    EmptyProductName,

    #[error("Invalid quantity: {0} (must be at least 1)")]
    InvalidQuantity(i64),

    #[error("Cashflow must not be zero")]
    ZeroCashflow,

    #[error("Category not found: {0}")]
    UnknownCategory(String),

    #[error("Person not found: {0}")]
    UnknownPerson(String),

    #[error("Product not found: {0}")]
    ProductNotFound(String),
}
