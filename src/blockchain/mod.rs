pub mod client;
pub mod fetcher;
pub mod models;
pub mod resolver;

// Re-exports for convenience
pub use client::{BscScanClient, ExplorerApi};
pub use fetcher::TransferFetcher;
pub use resolver::{BlockWindowResolver, DayWindow};
