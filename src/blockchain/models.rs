use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::models::{TokenTransfer, Transaction};
use crate::validation::normalize_address;

/// `{status, message, result}` envelope every explorer endpoint answers with.
/// `result` is an array on success and an error string otherwise.
#[derive(Debug, Clone, Deserialize)]
pub struct ExplorerResponse {
    pub status: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub result: Value,
}

impl ExplorerResponse {
    pub fn is_ok(&self) -> bool {
        self.status == "1"
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTransaction {
    pub hash: String,
    pub time_stamp: String,
    pub from: String,
    #[serde(default)]
    pub to: String,
    pub block_number: String,
    #[serde(default)]
    pub is_error: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTokenTransfer {
    pub hash: String,
    pub time_stamp: String,
    pub from: String,
    pub to: String,
    pub value: String,
    #[serde(default)]
    pub token_name: String,
    #[serde(default)]
    pub token_symbol: String,
    pub token_decimal: String,
    pub contract_address: String,
}

/// Convert an explorer transaction into our model, or `None` if its numeric
/// fields don't parse.
pub fn extract_transaction(raw: &RawTransaction) -> Option<Transaction> {
    let timestamp = match raw.time_stamp.parse::<i64>() {
        Ok(ts) => ts,
        Err(_) => {
            warn!("Transaction {} has invalid timestamp {:?}", raw.hash, raw.time_stamp);
            return None;
        }
    };

    let block_number = match raw.block_number.parse::<u64>() {
        Ok(block) => block,
        Err(_) => {
            warn!("Transaction {} has invalid block number {:?}", raw.hash, raw.block_number);
            return None;
        }
    };

    Some(Transaction {
        hash: raw.hash.clone(),
        timestamp,
        from: normalize_address(&raw.from),
        to: normalize_address(&raw.to),
        block_number,
        is_error: raw.is_error != "0",
    })
}

pub fn extract_token_transfer(raw: &RawTokenTransfer) -> Option<TokenTransfer> {
    let timestamp = match raw.time_stamp.parse::<i64>() {
        Ok(ts) => ts,
        Err(_) => {
            warn!("Transfer in {} has invalid timestamp {:?}", raw.hash, raw.time_stamp);
            return None;
        }
    };

    let value = match raw.value.parse::<u128>() {
        Ok(v) => v,
        Err(_) => {
            warn!("Transfer in {} has unparseable value {:?}", raw.hash, raw.value);
            return None;
        }
    };

    let token_decimal = match raw.token_decimal.parse::<u32>() {
        Ok(d) => d,
        Err(_) => {
            warn!("Transfer in {} has invalid token decimals {:?}", raw.hash, raw.token_decimal);
            return None;
        }
    };

    Some(TokenTransfer {
        hash: raw.hash.clone(),
        timestamp,
        from: normalize_address(&raw.from),
        to: normalize_address(&raw.to),
        value,
        token_name: raw.token_name.clone(),
        token_symbol: raw.token_symbol.clone(),
        token_decimal,
        contract_address: normalize_address(&raw.contract_address),
    })
}

/// Decode the `result` array of a successful listing. Entries that don't match
/// the expected shape are skipped.
pub fn decode_result_list<T: for<'de> Deserialize<'de>>(result: &Value) -> Vec<T> {
    match result {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match serde_json::from_value::<T>(item.clone()) {
                Ok(parsed) => Some(parsed),
                Err(e) => {
                    warn!("Skipping malformed explorer record: {}", e);
                    None
                }
            })
            .collect(),
        other => {
            warn!("Expected result array, got {}", other);
            Vec::new()
        }
    }
}
