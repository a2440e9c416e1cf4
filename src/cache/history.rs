use serde::{Deserialize, Serialize};

pub const HISTORY_LIMIT: usize = 5;

/// Recently queried addresses, most recent first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AddressHistory {
    entries: Vec<String>,
}

impl AddressHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted entries, dropping duplicates and anything past
    /// the limit.
    pub fn from_entries(entries: Vec<String>) -> Self {
        let mut history = Self::new();
        for entry in entries {
            if history.entries.len() == HISTORY_LIMIT {
                break;
            }
            if !history.contains(&entry) {
                history.entries.push(entry);
            }
        }
        history
    }

    pub fn contains(&self, address: &str) -> bool {
        self.entries.iter().any(|a| a == address)
    }

    /// Front-insert `address` unless it is already present. Returns whether
    /// the list changed.
    pub fn record(&mut self, address: &str) -> bool {
        if self.contains(address) {
            return false;
        }
        self.entries.insert(0, address.to_string());
        self.entries.truncate(HISTORY_LIMIT);
        true
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
