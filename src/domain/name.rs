use std::fmt;

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

/// Case-folded lookup key for user-supplied names.
///
/// Two names are the same entity when their keys are equal: the name is
/// NFKC-normalized, lowercased and its whitespace runs collapsed to a single space.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NameKey(String);

impl NameKey {
    pub fn new(name: &str) -> Self {
        let normalized: String = name.nfkc().collect();
        Self(display_name(&normalized.to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NameKey {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for NameKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Trim a name and collapse inner whitespace runs, keeping the caller's casing.
pub fn display_name(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Number of non-whitespace characters in a name.
pub fn visible_len(name: &str) -> usize {
    name.chars().filter(|c| !c.is_whitespace()).count()
}
