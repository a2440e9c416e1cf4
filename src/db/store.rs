//! Named-slot persistence for session state

use std::collections::HashMap;
use std::future::Future;

use chrono::Utc;
use sqlx::{Row, SqlitePool};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;

use crate::cache::StoreKey;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Get/set of string values under the fixed [`StoreKey`] slots.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: StoreKey) -> impl Future<Output = Result<Option<String>, StoreError>> + Send;

    fn set(&self, key: StoreKey, value: &str) -> impl Future<Output = Result<(), StoreError>> + Send;
}

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl KeyValueStore for SqliteStore {
    async fn get(&self, key: StoreKey) -> Result<Option<String>, StoreError> {
        let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?")
            .bind(key.as_str())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| r.get::<String, _>("value")))
    }

    async fn set(&self, key: StoreKey, value: &str) -> Result<(), StoreError> {
        let now = Utc::now().timestamp();

        sqlx::query(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(key.as_str())
        .bind(value)
        .bind(now)
        .execute(&self.pool)
        .await?;

        debug!("Persisted {} ({} bytes)", key, value.len());
        Ok(())
    }
}

/// Process-local store, used by tests and one-off runs.
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<StoreKey, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn with_values(values: &[(StoreKey, &str)]) -> Self {
        let store = Self::new();
        {
            let mut map = store.values.lock().await;
            for (key, value) in values {
                map.insert(*key, value.to_string());
            }
        }
        store
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: StoreKey) -> Result<Option<String>, StoreError> {
        Ok(self.values.lock().await.get(&key).cloned())
    }

    async fn set(&self, key: StoreKey, value: &str) -> Result<(), StoreError> {
        self.values.lock().await.insert(key, value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::establish_connection;

    #[tokio::test]
    async fn sqlite_store_round_trips_and_overwrites() {
        let pool = establish_connection("sqlite::memory:").await.unwrap();
        let store = SqliteStore::new(pool);

        assert_eq!(store.get(StoreKey::ApiKey).await.unwrap(), None);

        store.set(StoreKey::ApiKey, "first").await.unwrap();
        store.set(StoreKey::ApiKey, "second").await.unwrap();
        store.set(StoreKey::AddressHistory, "[]").await.unwrap();

        assert_eq!(store.get(StoreKey::ApiKey).await.unwrap().as_deref(), Some("second"));
        assert_eq!(store.get(StoreKey::AddressHistory).await.unwrap().as_deref(), Some("[]"));
        assert_eq!(store.get(StoreKey::TransactionCache).await.unwrap(), None);
    }
}
