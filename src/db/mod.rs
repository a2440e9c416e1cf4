pub mod connection;
pub mod migration;
pub mod store;

pub use store::{KeyValueStore, MemoryStore, SqliteStore, StoreError};
