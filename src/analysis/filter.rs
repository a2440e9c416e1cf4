//! Narrowing fetched records to the day window and the counterparty.
//! Callers pass normalized addresses.

use crate::blockchain::resolver::DayWindow;
use crate::models::{TokenTransfer, Transaction};

/// Successful transactions inside `window` with `counterparty` on either side.
pub fn filter_transactions(
    transactions: &[Transaction],
    window: &DayWindow,
    counterparty: &str,
) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|tx| {
            window.contains(tx.timestamp)
                && !tx.is_error
                && (tx.from == counterparty || tx.to == counterparty)
        })
        .cloned()
        .collect()
}

pub fn filter_transfers(transfers: &[TokenTransfer], window: &DayWindow) -> Vec<TokenTransfer> {
    transfers
        .iter()
        .filter(|t| window.contains(t.timestamp))
        .cloned()
        .collect()
}
