// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use chrono::{Days, Local, NaiveDate};
use tally::application::{LedgerService, Settings};

/// Helper to create an empty ledger with default (strict) settings
pub fn test_service() -> LedgerService {
    LedgerService::new(Settings::default())
}

/// Helper to create an empty ledger that creates unknown persons on the fly
pub fn creating_service() -> LedgerService {
    LedgerService::new(Settings::default().with_create_unknown_persons(true))
}

/// Helper to parse a date string into NaiveDate
pub fn parse_date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn tomorrow() -> NaiveDate {
    today().checked_add_days(Days::new(1)).unwrap()
}

pub fn names(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// Test fixture: standard categories and persons
pub struct StandardLedger;

impl StandardLedger {
    /// Create categories Food, Bakery, Household and persons Alice, Bob
    pub fn create_basic(service: &mut LedgerService) -> Result<()> {
        service.add_category("Food")?;
        service.add_category("Bakery")?;
        service.add_category("Household")?;
        service.add_person("Alice")?;
        service.add_person("Bob")?;
        Ok(())
    }
}
