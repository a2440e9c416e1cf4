use crate::blockchain::client::ExplorerApi;
use crate::blockchain::models::{
    decode_result_list, extract_token_transfer, extract_transaction, RawTokenTransfer,
    RawTransaction,
};
use crate::models::{TokenTransfer, Transaction};
use crate::session::QueryError;
use tracing::{debug, warn};

/// Native transactions of `address` from `start_block` onwards, newest first.
/// A non-success status is a hard failure here.
pub async fn fetch_transactions<A: ExplorerApi>(
    api: &A,
    address: &str,
    start_block: u64,
    api_key: &str,
) -> Result<Vec<Transaction>, QueryError> {
    let response = api.list_transactions(address, start_block, api_key).await?;

    if !response.is_ok() {
        warn!("Transaction listing for {} rejected: {}", address, response.message);
        return Err(QueryError::Upstream(format!(
            "transaction listing rejected: {}",
            response.message
        )));
    }

    let transactions: Vec<Transaction> = decode_result_list::<RawTransaction>(&response.result)
        .iter()
        .filter_map(extract_transaction)
        .collect();

    debug!(
        "Fetched {} transactions for {} from block {}",
        transactions.len(),
        address,
        start_block
    );
    Ok(transactions)
}

/// Token transfer events for an address. "No results" and any other
/// non-success status both come back as an empty list.
pub struct TransferFetcher;

impl TransferFetcher {
    pub async fn fetch<A: ExplorerApi>(
        api: &A,
        address: &str,
        start_block: u64,
        api_key: &str,
    ) -> Result<Vec<TokenTransfer>, QueryError> {
        let response = api.list_token_transfers(address, start_block, api_key).await?;

        if !response.is_ok() {
            debug!("No token transfers for {}: {}", address, response.message);
            return Ok(Vec::new());
        }

        let transfers: Vec<TokenTransfer> =
            decode_result_list::<RawTokenTransfer>(&response.result)
                .iter()
                .filter_map(extract_token_transfer)
                .collect();

        debug!(
            "Fetched {} token transfers for {} from block {}",
            transfers.len(),
            address,
            start_block
        );
        Ok(transfers)
    }
}
