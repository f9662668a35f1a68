use serde::Serialize;

/// A transaction names an existing product with a different category set than the stored one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryConflict {
    /// Stored spelling of the product name
    pub product: String,
    pub current: Vec<String>,
    pub proposed: Vec<String>,
}

/// Decides whether a product's stored categories may be overridden.
///
/// Implemented for any `FnMut(&CategoryConflict) -> bool`, so callers can
/// prompt the user, consult a setting or answer from a test.
pub trait OverrideDecision {
    fn approve(&mut self, conflict: &CategoryConflict) -> bool;
}

impl<F> OverrideDecision for F
where
    F: FnMut(&CategoryConflict) -> bool,
{
    fn approve(&mut self, conflict: &CategoryConflict) -> bool {
        self(conflict)
    }
}

/// Approves every override.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysApprove;

impl OverrideDecision for AlwaysApprove {
    fn approve(&mut self, _conflict: &CategoryConflict) -> bool {
        true
    }
}

/// Declines every override.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysDecline;

impl OverrideDecision for AlwaysDecline {
    fn approve(&mut self, _conflict: &CategoryConflict) -> bool {
        false
    }
}
