//! Names of the persisted state slots

use std::fmt;

/// The three independent values kept in the key-value store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    /// JSON array of recently queried addresses.
    AddressHistory,
    /// JSON map of address to cached transactions.
    TransactionCache,
    /// Plain-text explorer API key.
    ApiKey,
}

impl StoreKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AddressHistory => "addressHistory",
            Self::TransactionCache => "txCache",
            Self::ApiKey => "bscscanApiKey",
        }
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
