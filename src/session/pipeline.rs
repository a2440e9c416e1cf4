use crate::analysis::{filter_transactions, filter_transfers, PnlReconciler};
use crate::blockchain::client::ExplorerApi;
use crate::blockchain::fetcher::{fetch_transactions, TransferFetcher};
use crate::blockchain::resolver::{BlockWindowResolver, DayWindow};
use crate::cache::TransactionStore;
use crate::config::Config;
use crate::models::{CacheEntry, QueryResults, Transaction};
use crate::session::QueryError;
use tracing::{debug, info};

/// Everything one query run needs, captured when the query starts.
#[derive(Debug, Clone)]
pub struct QueryPlan {
    /// Normalized.
    pub address: String,
    pub api_key: String,
    pub window: DayWindow,
    pub cached: Option<CacheEntry>,
}

#[derive(Debug, Clone)]
pub struct QueryOutcome {
    pub address: String,
    /// Merged transaction set to write back to the cache.
    pub merged: Vec<Transaction>,
    pub results: QueryResults,
}

/// Explorer access plus the analysis stages, shared by every session.
pub struct QueryEngine<A> {
    api: A,
    resolver: BlockWindowResolver,
    reconciler: PnlReconciler,
}

impl<A: ExplorerApi> QueryEngine<A> {
    pub fn new(api: A, config: &Config) -> Self {
        Self {
            api,
            resolver: BlockWindowResolver::new(config.cache_max_capacity, config.cache_ttl),
            reconciler: PnlReconciler::from_config(config),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Block lookup, transaction fetch and merge, window filter, then the
    /// transfer fetch and reconciliation when anything qualified. The first
    /// failing step aborts the run.
    pub async fn run(&self, plan: &QueryPlan) -> Result<QueryOutcome, QueryError> {
        let start_block = self
            .resolver
            .resolve(&self.api, plan.window.start, &plan.api_key)
            .await?;

        let resume_block = TransactionStore::resume_block(plan.cached.as_ref(), start_block);
        debug!(
            "Fetching transactions for {} from block {} (day starts at {})",
            plan.address, resume_block, start_block
        );

        let fresh = fetch_transactions(&self.api, &plan.address, resume_block, &plan.api_key).await?;
        let cached = plan
            .cached
            .as_ref()
            .map(|entry| entry.transactions.as_slice())
            .unwrap_or(&[]);
        let merged = TransactionStore::merge_and_get(&plan.address, fresh, cached);

        let qualifying = filter_transactions(&merged, &plan.window, self.reconciler.counterparty());
        let mut results = QueryResults {
            tx_count: qualifying.len(),
            ..QueryResults::default()
        };

        if !qualifying.is_empty() {
            let transfers =
                TransferFetcher::fetch(&self.api, &plan.address, start_block, &plan.api_key).await?;
            let todays_transfers = filter_transfers(&transfers, &plan.window);

            let summary = self
                .reconciler
                .reconcile(&todays_transfers, &qualifying, &plan.address);
            results.records = summary.records;
            results.pnl = summary.pnl;
            results.buy_amount = summary.buy_amount;
            results.volume_level = summary.volume_level;
        }

        info!(
            "Query for {} done: {} interactions, {} trades, pnl {}",
            plan.address,
            results.tx_count,
            results.records.len(),
            results.pnl
        );

        Ok(QueryOutcome {
            address: plan.address.clone(),
            merged,
            results,
        })
    }
}
