pub mod filter;
pub mod pnl;
pub mod tier;

pub use filter::{filter_transactions, filter_transfers};
pub use pnl::{PnlReconciler, PnlSummary};
pub use tier::classify_volume;
