pub mod history;
pub mod keys;
pub mod transaction;

pub use history::AddressHistory;
pub use keys::StoreKey;
pub use transaction::TransactionStore;
