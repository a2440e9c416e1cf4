//! Scripted explorer and record builders shared by the test modules

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use serde_json::{json, Value};

use crate::blockchain::client::{ClientError, ExplorerApi};
use crate::blockchain::models::ExplorerResponse;
use crate::config::{DEFAULT_TARGET_ADDRESS, DEFAULT_USDT_CONTRACT};

pub const USER: &str = "0x1111111111111111111111111111111111111111";
pub const OTHER: &str = "0x2222222222222222222222222222222222222222";
pub const BUSD: &str = "0xe9e7cea3dedca5984780bafc599bd69add087d56";
pub const DAY_START_BLOCK: u64 = 44_000_000;

pub fn target() -> String {
    DEFAULT_TARGET_ADDRESS.to_lowercase()
}

pub fn usdt() -> String {
    DEFAULT_USDT_CONTRACT.to_lowercase()
}

pub fn ok(result: Value) -> ExplorerResponse {
    ExplorerResponse {
        status: "1".to_string(),
        message: "OK".to_string(),
        result,
    }
}

pub fn not_ok(message: &str) -> ExplorerResponse {
    ExplorerResponse {
        status: "0".to_string(),
        message: message.to_string(),
        result: Value::Array(Vec::new()),
    }
}

pub fn raw_tx(hash: &str, ts: i64, from: &str, to: &str, block: u64, is_error: &str) -> Value {
    json!({
        "hash": hash,
        "timeStamp": ts.to_string(),
        "from": from,
        "to": to,
        "blockNumber": block.to_string(),
        "isError": is_error,
    })
}

pub fn raw_transfer(hash: &str, ts: i64, from: &str, to: &str, value: &str, contract: &str) -> Value {
    json!({
        "hash": hash,
        "timeStamp": ts.to_string(),
        "from": from,
        "to": to,
        "value": value,
        "tokenName": "Tether USD",
        "tokenSymbol": "USDT",
        "tokenDecimal": "18",
        "contractAddress": contract,
    })
}

/// `None` in a slot makes the matching call fail at the transport level.
pub struct MockExplorer {
    block: Mutex<Option<ExplorerResponse>>,
    transactions: Mutex<Option<ExplorerResponse>>,
    transfers: Mutex<Option<ExplorerResponse>>,
    pub block_calls: AtomicUsize,
    pub tx_calls: AtomicUsize,
    pub transfer_calls: AtomicUsize,
    pub tx_start_blocks: Mutex<Vec<u64>>,
}

impl MockExplorer {
    pub fn new(transactions: Value, transfers: Value) -> Self {
        Self {
            block: Mutex::new(Some(ok(json!(DAY_START_BLOCK.to_string())))),
            transactions: Mutex::new(Some(ok(transactions))),
            transfers: Mutex::new(Some(ok(transfers))),
            block_calls: AtomicUsize::new(0),
            tx_calls: AtomicUsize::new(0),
            transfer_calls: AtomicUsize::new(0),
            tx_start_blocks: Mutex::new(Vec::new()),
        }
    }

    pub fn set_block(&self, response: Option<ExplorerResponse>) {
        *self.block.lock().unwrap() = response;
    }

    pub fn set_transactions(&self, response: Option<ExplorerResponse>) {
        *self.transactions.lock().unwrap() = response;
    }

    pub fn set_transfers(&self, response: Option<ExplorerResponse>) {
        *self.transfers.lock().unwrap() = response;
    }

    pub fn total_calls(&self) -> usize {
        self.block_calls.load(Ordering::SeqCst)
            + self.tx_calls.load(Ordering::SeqCst)
            + self.transfer_calls.load(Ordering::SeqCst)
    }

    fn scripted(slot: &Mutex<Option<ExplorerResponse>>) -> Result<ExplorerResponse, ClientError> {
        slot.lock()
            .unwrap()
            .clone()
            .ok_or_else(|| ClientError::InvalidResult("scripted transport failure".to_string()))
    }
}

impl ExplorerApi for MockExplorer {
    async fn block_by_timestamp(
        &self,
        _timestamp: i64,
        _api_key: &str,
    ) -> Result<ExplorerResponse, ClientError> {
        self.block_calls.fetch_add(1, Ordering::SeqCst);
        Self::scripted(&self.block)
    }

    async fn list_transactions(
        &self,
        _address: &str,
        start_block: u64,
        _api_key: &str,
    ) -> Result<ExplorerResponse, ClientError> {
        self.tx_calls.fetch_add(1, Ordering::SeqCst);
        self.tx_start_blocks.lock().unwrap().push(start_block);
        Self::scripted(&self.transactions)
    }

    async fn list_token_transfers(
        &self,
        _address: &str,
        _start_block: u64,
        _api_key: &str,
    ) -> Result<ExplorerResponse, ClientError> {
        self.transfer_calls.fetch_add(1, Ordering::SeqCst);
        Self::scripted(&self.transfers)
    }
}
