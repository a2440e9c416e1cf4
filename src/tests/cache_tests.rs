//! tests/cache_tests.rs - merge and persistence behaviour of the transaction cache

#[cfg(test)]
mod tests {
    use crate::{
        cache::{StoreKey, TransactionStore},
        db::{connection, KeyValueStore, SqliteStore},
        models::{CacheEntry, Transaction},
    };
    use std::collections::HashSet;

    fn create_test_transactions(prefix: &str, count: usize, first_block: u64) -> Vec<Transaction> {
        (0..count)
            .map(|i| Transaction {
                hash: format!("{}_{}", prefix, i),
                timestamp: 1_732_000_000 + i as i64 * 3,
                from: "0x1111111111111111111111111111111111111111".to_string(),
                to: "0xb300000b72deaeb607a12d5f54773d1c19c7028d".to_string(),
                block_number: first_block + i as u64,
                is_error: false,
            })
            .collect()
    }

    #[test]
    fn test_merge_contains_every_hash_once() {
        let cached = create_test_transactions("tx", 10, 100);
        // overlaps hashes tx_5..tx_9 and adds tx_10..tx_14
        let mut fresh: Vec<Transaction> = create_test_transactions("tx", 15, 100)
            .into_iter()
            .skip(5)
            .collect();
        for tx in fresh.iter_mut() {
            tx.is_error = true;
        }

        let merged = TransactionStore::merge_and_get("0xuser", fresh.clone(), &cached);

        let hashes: HashSet<&str> = merged.iter().map(|t| t.hash.as_str()).collect();
        assert_eq!(hashes.len(), merged.len(), "no hash may appear twice");
        assert_eq!(merged.len(), 15);

        for tx in &fresh {
            let stored = merged.iter().find(|m| m.hash == tx.hash).unwrap();
            assert_eq!(stored, tx, "fresh values must win for {}", tx.hash);
        }
        for tx in &cached[..5] {
            assert!(merged.contains(tx), "cached-only {} must survive", tx.hash);
        }
    }

    #[test]
    fn test_repeated_merges_are_stable() {
        let batch = create_test_transactions("tx", 4, 10);
        let once = TransactionStore::merge_and_get("0xuser", batch.clone(), &[]);
        let twice = TransactionStore::merge_and_get("0xuser", batch, &once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_resume_block_tracks_newest_cached_block() {
        let entry = CacheEntry {
            transactions: create_test_transactions("tx", 3, 500),
            last_update: 0,
        };
        assert_eq!(TransactionStore::resume_block(Some(&entry), 100), 502);
    }

    #[tokio::test]
    async fn test_cache_persists_through_sqlite_store() {
        let pool = connection::establish_connection("sqlite::memory:").await.unwrap();
        let store = SqliteStore::new(pool);

        let mut cache = TransactionStore::new();
        cache.replace_entry("0xAAAA", create_test_transactions("a", 2, 1), 1_000);
        cache.replace_entry("0xbbbb", create_test_transactions("b", 3, 1), 2_000);

        store
            .set(StoreKey::TransactionCache, &cache.to_json().unwrap())
            .await
            .unwrap();

        let raw = store.get(StoreKey::TransactionCache).await.unwrap().unwrap();
        let restored = TransactionStore::from_json(&raw).unwrap();

        assert_eq!(restored.len(), 2);
        assert_eq!(restored.get("0xaaaa").unwrap().transactions.len(), 2);
        assert_eq!(restored.get("0xBBBB").unwrap().last_update, 2_000);
    }
}
