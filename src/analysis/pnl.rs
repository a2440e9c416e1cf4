//! Stablecoin PNL reconstruction

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, warn};

use crate::analysis::tier::classify_volume;
use crate::config::Config;
use crate::models::{TokenTransfer, TradeRecord, TradeSide, Transaction};
use crate::validation::normalize_address;

/// Largest scale `Decimal` can carry.
const MAX_DECIMAL_SCALE: u32 = 28;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PnlSummary {
    /// Ascending by timestamp.
    pub records: Vec<TradeRecord>,
    /// Sell proceeds minus buy cost.
    pub pnl: Decimal,
    pub buy_amount: Decimal,
    pub sell_amount: Decimal,
    pub volume_level: u32,
    /// Stablecoin transfers that were neither a buy nor a sell leg.
    pub ignored: usize,
}

/// Matches stablecoin transfers to counterparty interactions and splits them
/// into buy and sell legs.
#[derive(Debug, Clone)]
pub struct PnlReconciler {
    counterparty: String,
    stablecoin_contract: String,
}

impl PnlReconciler {
    pub fn new(counterparty: &str, stablecoin_contract: &str) -> Self {
        Self {
            counterparty: normalize_address(counterparty),
            stablecoin_contract: normalize_address(stablecoin_contract),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.target_address, &config.usdt_contract)
    }

    pub fn counterparty(&self) -> &str {
        &self.counterparty
    }

    /// Buy when the user pays the counterparty, sell when the counterparty
    /// pays the user. `None` for any other pair.
    pub fn classify(&self, transfer: &TokenTransfer, user_address: &str) -> Option<TradeSide> {
        let from = normalize_address(&transfer.from);
        let to = normalize_address(&transfer.to);

        if from == user_address && to == self.counterparty {
            Some(TradeSide::Buy)
        } else if from == self.counterparty && to == user_address {
            Some(TradeSide::Sell)
        } else {
            None
        }
    }

    /// Transfers belonging to a counterparty transaction and paid in the
    /// stablecoin. Other tokens riding along in the same transaction drop out.
    pub fn retain_relevant<'a>(
        &self,
        transfers: &'a [TokenTransfer],
        qualifying: &[Transaction],
    ) -> Vec<&'a TokenTransfer> {
        let hashes: HashSet<&str> = qualifying
            .iter()
            .filter(|tx| {
                normalize_address(&tx.from) == self.counterparty
                    || normalize_address(&tx.to) == self.counterparty
            })
            .map(|tx| tx.hash.as_str())
            .collect();

        transfers
            .iter()
            .filter(|t| {
                hashes.contains(t.hash.as_str())
                    && normalize_address(&t.contract_address) == self.stablecoin_contract
            })
            .collect()
    }

    pub fn reconcile(
        &self,
        transfers: &[TokenTransfer],
        qualifying: &[Transaction],
        user_address: &str,
    ) -> PnlSummary {
        let user = normalize_address(user_address);
        let relevant = self.retain_relevant(transfers, qualifying);

        let mut summary = PnlSummary::default();
        for transfer in &relevant {
            let Some(side) = self.classify(transfer, &user) else {
                summary.ignored += 1;
                continue;
            };

            let amount = scale_amount(transfer.value, transfer.token_decimal);
            match side {
                // saturating: a scaled amount may already be Decimal::MAX
                TradeSide::Buy => summary.buy_amount = summary.buy_amount.saturating_add(amount),
                TradeSide::Sell => summary.sell_amount = summary.sell_amount.saturating_add(amount),
            }

            summary.records.push(TradeRecord {
                hash: transfer.hash.clone(),
                timestamp: transfer.timestamp,
                side,
                amount,
                token: transfer.token_symbol.clone(),
                usdt_amount: amount,
            });
        }

        // stable: equal timestamps keep fetch order
        summary.records.sort_by_key(|r| r.timestamp);

        summary.pnl = summary.sell_amount.saturating_sub(summary.buy_amount);
        summary.volume_level = classify_volume(summary.buy_amount.saturating_add(summary.sell_amount));

        debug!(
            "Reconciled {} of {} stablecoin transfers for {}: buy={} sell={} pnl={} level={}",
            summary.records.len(),
            relevant.len(),
            user,
            summary.buy_amount,
            summary.sell_amount,
            summary.pnl,
            summary.volume_level
        );
        summary
    }
}

/// `raw × 10^-decimals`. Integers too wide for `Decimal`'s 96-bit mantissa
/// lose their least significant digits.
pub fn scale_amount(raw: u128, decimals: u32) -> Decimal {
    let mut value = raw;
    let mut scale = decimals;

    loop {
        if scale <= MAX_DECIMAL_SCALE {
            if let Ok(signed) = i128::try_from(value) {
                if let Ok(amount) = Decimal::try_from_i128_with_scale(signed, scale) {
                    return amount.normalize();
                }
            }
        }

        if scale == 0 {
            warn!("Token amount {} exceeds decimal range, saturating", raw);
            return Decimal::MAX;
        }
        value /= 10;
        scale -= 1;
    }
}
