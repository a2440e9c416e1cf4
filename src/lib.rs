pub mod analysis;
pub mod api;
pub mod blockchain;
pub mod cache;
pub mod config;
pub mod db;
pub mod models;
pub mod session;
pub mod state;
pub mod validation;

#[cfg(test)]
pub mod tests;

// Re-export specific items for convenience
pub use analysis::{classify_volume, PnlReconciler, PnlSummary};
pub use api::route::create_router;
pub use blockchain::{BlockWindowResolver, BscScanClient, DayWindow, ExplorerApi, TransferFetcher};
pub use cache::{AddressHistory, TransactionStore};
pub use models::{CacheEntry, QueryResults, TokenTransfer, TradeRecord, TradeSide, Transaction};
pub use session::{QueryEngine, QueryError, SessionState};
pub use validation::{normalize_address, validate_evm_address};
