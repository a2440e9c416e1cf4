//! Per-user query state: credential, history, cache and the latest outcome.

pub mod error;
pub mod pipeline;

pub use error::QueryError;
pub use pipeline::{QueryEngine, QueryOutcome, QueryPlan};

use chrono::Utc;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::blockchain::client::ExplorerApi;
use crate::blockchain::resolver::DayWindow;
use crate::cache::{AddressHistory, StoreKey, TransactionStore};
use crate::db::{KeyValueStore, StoreError};
use crate::models::QueryResults;
use crate::validation::{normalize_address, validate_evm_address, ValidationError};

pub const MSG_MISSING_API_KEY: &str = "Please set a BscScan API key first";
pub const MSG_MISSING_ADDRESS: &str = "Please enter an address";
pub const MSG_INVALID_ADDRESS: &str = "Invalid address";
pub const MSG_REQUEST_FAILED: &str = "Request failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryPhase {
    Idle,
    Loading,
    Success,
    Failed,
}

/// Read-only view handed to the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub address: String,
    pub phase: QueryPhase,
    pub loading: bool,
    pub error: Option<String>,
    pub settings_requested: bool,
    pub results: Option<QueryResults>,
    pub history: Vec<String>,
    pub api_key: String,
}

pub struct SessionState<S> {
    store: S,
    api_key: String,
    history: AddressHistory,
    cache: TransactionStore,
    address: String,
    phase: QueryPhase,
    error: Option<String>,
    settings_requested: bool,
    results: Option<QueryResults>,
}

impl<S: KeyValueStore> SessionState<S> {
    /// Read persisted state once. Missing or unreadable values start empty.
    pub async fn load(store: S) -> Self {
        let api_key = read_slot(&store, StoreKey::ApiKey).await.unwrap_or_default();

        let history = read_slot(&store, StoreKey::AddressHistory)
            .await
            .and_then(|raw| match serde_json::from_str::<Vec<String>>(&raw) {
                Ok(entries) => Some(AddressHistory::from_entries(entries)),
                Err(e) => {
                    warn!("Discarding corrupt address history: {}", e);
                    None
                }
            })
            .unwrap_or_default();

        let cache = read_slot(&store, StoreKey::TransactionCache)
            .await
            .and_then(|raw| match TransactionStore::from_json(&raw) {
                Ok(cache) => Some(cache),
                Err(e) => {
                    warn!("Discarding corrupt transaction cache: {}", e);
                    None
                }
            })
            .unwrap_or_default();

        info!(
            "Session loaded: api key {}, {} history entries, {} cached addresses",
            if api_key.is_empty() { "missing" } else { "present" },
            history.len(),
            cache.len()
        );

        Self {
            store,
            api_key,
            history,
            cache,
            address: String::new(),
            phase: QueryPhase::Idle,
            error: None,
            settings_requested: false,
            results: None,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn phase(&self) -> QueryPhase {
        self.phase
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn settings_requested(&self) -> bool {
        self.settings_requested
    }

    pub fn results(&self) -> Option<&QueryResults> {
        self.results.as_ref()
    }

    pub fn history(&self) -> &AddressHistory {
        &self.history
    }

    pub fn cache(&self) -> &TransactionStore {
        &self.cache
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub async fn set_api_key(&mut self, api_key: &str) -> Result<(), StoreError> {
        self.api_key = api_key.trim().to_string();
        self.store.set(StoreKey::ApiKey, &self.api_key).await?;
        if !self.api_key.is_empty() {
            self.settings_requested = false;
        }
        info!("API key updated");
        Ok(())
    }

    /// Make a history entry the current query address.
    pub fn select_history(&mut self, index: usize) -> Option<&str> {
        let selected = self.history.get(index)?.to_string();
        self.address = selected;
        Some(&self.address)
    }

    /// Validate input and move to `Loading`. Nothing touches the network
    /// until this succeeds.
    pub fn begin_query(&mut self, address: &str, window: DayWindow) -> Result<QueryPlan, QueryError> {
        if self.phase == QueryPhase::Loading {
            return Err(QueryError::Busy);
        }

        self.address = address.to_string();
        self.error = None;

        if self.api_key.is_empty() {
            self.reject(MSG_MISSING_API_KEY);
            self.settings_requested = true;
            return Err(QueryError::Configuration);
        }

        if let Err(e) = validate_evm_address(address) {
            let message = match e {
                ValidationError::MissingParameter(_) => MSG_MISSING_ADDRESS,
                ValidationError::InvalidEvmAddress(_) => MSG_INVALID_ADDRESS,
            };
            self.reject(message);
            return Err(e.into());
        }

        let address = normalize_address(address);
        self.phase = QueryPhase::Loading;
        self.results = None;

        info!("Starting query for {} over [{}, {}]", address, window.start, window.end);
        Ok(QueryPlan {
            cached: self.cache.get(&address).cloned(),
            address,
            api_key: self.api_key.clone(),
            window,
        })
    }

    fn reject(&mut self, message: &str) {
        self.phase = QueryPhase::Idle;
        self.error = Some(message.to_string());
    }

    /// Publish a pipeline outcome. Success writes the cache and history
    /// through to the store; failure publishes nothing but the generic error.
    pub async fn finish_query(
        &mut self,
        outcome: Result<QueryOutcome, QueryError>,
    ) -> Result<(), QueryError> {
        match outcome {
            Ok(outcome) => {
                let now_ms = Utc::now().timestamp_millis();
                self.cache.replace_entry(&outcome.address, outcome.merged, now_ms);
                let history_changed = self.history.record(&outcome.address);

                self.results = Some(outcome.results);
                self.phase = QueryPhase::Success;
                self.error = None;

                if let Err(e) = self.persist(history_changed).await {
                    error!("Failed to persist session state: {}", e);
                }
                Ok(())
            }
            Err(e) => {
                warn!("Query failed: {}", e);
                self.publish_failure();
                Err(e)
            }
        }
    }

    /// Fail a query whose worker died before it could publish an outcome.
    /// Without this the session would stay `Loading` and refuse every submit.
    pub fn abandon_query(&mut self, reason: &str) {
        if self.phase != QueryPhase::Loading {
            return;
        }
        error!("Query abandoned: {}", reason);
        self.publish_failure();
    }

    fn publish_failure(&mut self) {
        self.results = None;
        self.phase = QueryPhase::Failed;
        self.error = Some(MSG_REQUEST_FAILED.to_string());
    }

    async fn persist(&self, history_changed: bool) -> Result<(), StoreError> {
        self.store
            .set(StoreKey::TransactionCache, &self.cache.to_json()?)
            .await?;
        if history_changed {
            self.store
                .set(StoreKey::AddressHistory, &serde_json::to_string(self.history.entries())?)
                .await?;
        }
        Ok(())
    }

    /// Begin, run and finish in one call, for callers that own the session
    /// exclusively for the whole query.
    pub async fn submit<A: ExplorerApi>(
        &mut self,
        engine: &QueryEngine<A>,
        address: &str,
        window: DayWindow,
    ) -> Result<&QueryResults, QueryError> {
        let plan = self.begin_query(address, window)?;
        let outcome = engine.run(&plan).await;
        self.finish_query(outcome).await?;
        self.results
            .as_ref()
            .ok_or_else(|| QueryError::Upstream("query produced no results".to_string()))
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            address: self.address.clone(),
            phase: self.phase,
            loading: self.phase == QueryPhase::Loading,
            error: self.error.clone(),
            settings_requested: self.settings_requested,
            results: self.results.clone(),
            history: self.history.entries().to_vec(),
            api_key: self.api_key.clone(),
        }
    }
}

async fn read_slot<S: KeyValueStore>(store: &S, key: StoreKey) -> Option<String> {
    match store.get(key).await {
        Ok(value) => value,
        Err(e) => {
            warn!("Could not read {} from store: {}", key, e);
            None
        }
    }
}
