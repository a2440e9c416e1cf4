//! Per-address transaction cache

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{CacheEntry, Transaction};
use crate::validation::normalize_address;

/// Cached transactions keyed by normalized address. Entries are only ever
/// merged into or replaced, never removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionStore {
    entries: BTreeMap<String, CacheEntry>,
}

impl TransactionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.entries)
    }

    pub fn get(&self, address: &str) -> Option<&CacheEntry> {
        self.entries.get(&normalize_address(address))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Overwrite the entry for `address` with an already merged list.
    pub fn replace_entry(&mut self, address: &str, transactions: Vec<Transaction>, now_ms: i64) {
        let address = normalize_address(address);
        debug!(
            "Caching {} transactions for {} at {}",
            transactions.len(),
            address,
            now_ms
        );
        self.entries.insert(
            address,
            CacheEntry {
                transactions,
                last_update: now_ms,
            },
        );
    }

    /// Union of a fresh fetch and the cached list, one record per hash.
    ///
    /// Fresh records come first in fetch order and win on hash conflicts.
    /// Cached records the fresh batch doesn't mention are kept, so a fetch
    /// only needs to cover the newest stretch of history.
    pub fn merge_and_get(
        address: &str,
        new_transactions: Vec<Transaction>,
        cached: &[Transaction],
    ) -> Vec<Transaction> {
        let mut seen: HashSet<String> = HashSet::with_capacity(new_transactions.len() + cached.len());
        let mut merged = Vec::with_capacity(new_transactions.len() + cached.len());

        for tx in new_transactions.into_iter().chain(cached.iter().cloned()) {
            if seen.insert(tx.hash.clone()) {
                merged.push(tx);
            }
        }

        debug!("Merged transaction set for {} now holds {}", address, merged.len());
        merged
    }

    /// Block to resume scanning from: the newest cached block, or the day's
    /// start block when nothing is cached.
    pub fn resume_block(cached: Option<&CacheEntry>, day_start_block: u64) -> u64 {
        cached
            .and_then(|entry| entry.transactions.iter().map(|tx| tx.block_number).max())
            .unwrap_or(day_start_block)
    }
}
