//! Participant identity key.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque participant key (e.g. an account identifier).
///
/// Equality is byte-exact: no trimming, case folding or prefix rules are
/// applied, so `"Alice"` and `"alice"` are two different identities.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Identity(String);

impl Identity {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Return the raw key.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Raw key bytes, used as the storage key.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Identity {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for Identity {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
