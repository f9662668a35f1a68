/// Minimum number of non-space characters in a category or person name.
pub const DEFAULT_MIN_NAME_CHARS: usize = 3;

/// Validation policy for a ledger session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub min_name_chars: usize,
    /// When true, persons named in a transaction but missing from the ledger are
    /// created on the fly. When false, such transactions are rejected.
    pub create_unknown_persons: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            min_name_chars: DEFAULT_MIN_NAME_CHARS,
            create_unknown_persons: false,
        }
    }
}

impl Settings {
    pub fn with_min_name_chars(mut self, min: usize) -> Self {
        self.min_name_chars = min;
        self
    }

    pub fn with_create_unknown_persons(mut self, create: bool) -> Self {
        self.create_unknown_persons = create;
        self
    }
}
