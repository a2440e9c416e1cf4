// Domain records, parsed from the explorer's string-typed wire format.
// Addresses are always stored lowercase.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub hash: String,
    /// Unix seconds.
    pub timestamp: i64,
    pub from: String,
    /// Empty for contract creation.
    pub to: String,
    pub block_number: u64,
    pub is_error: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenTransfer {
    /// Hash of the parent transaction. Shared by every event it emitted.
    pub hash: String,
    pub timestamp: i64,
    pub from: String,
    pub to: String,
    /// Raw unscaled amount. 18-decimal tokens overflow u64 quickly.
    pub value: u128,
    pub token_name: String,
    pub token_symbol: String,
    pub token_decimal: u32,
    pub contract_address: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    Buy,
    Sell,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub hash: String,
    pub timestamp: i64,
    pub side: TradeSide,
    pub amount: Decimal,
    pub token: String,
    pub usdt_amount: Decimal,
}

/// Cached transactions for one address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub transactions: Vec<Transaction>,
    /// Unix milliseconds of the last successful merge.
    pub last_update: i64,
}

/// Published outcome of one successful query.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryResults {
    pub tx_count: usize,
    pub records: Vec<TradeRecord>,
    pub pnl: Decimal,
    pub buy_amount: Decimal,
    pub volume_level: u32,
}
