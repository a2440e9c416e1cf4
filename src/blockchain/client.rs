use crate::blockchain::models::ExplorerResponse;
use crate::config::Config;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use std::future::Future;
use std::num::NonZeroU32;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Upper bound passed as `endblock` on every listing.
pub const END_BLOCK: u64 = 99_999_999;
/// Records per listing page. Only the first page is ever requested.
pub const PAGE_SIZE: u32 = 1000;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid explorer result: {0}")]
    InvalidResult(String),
}

/// The three explorer operations the pipeline depends on. Each returns the
/// raw envelope; interpreting `status` is up to the caller.
pub trait ExplorerApi: Send + Sync {
    fn block_by_timestamp(
        &self,
        timestamp: i64,
        api_key: &str,
    ) -> impl Future<Output = Result<ExplorerResponse, ClientError>> + Send;

    fn list_transactions(
        &self,
        address: &str,
        start_block: u64,
        api_key: &str,
    ) -> impl Future<Output = Result<ExplorerResponse, ClientError>> + Send;

    fn list_token_transfers(
        &self,
        address: &str,
        start_block: u64,
        api_key: &str,
    ) -> impl Future<Output = Result<ExplorerResponse, ClientError>> + Send;
}

pub struct BscScanClient {
    http: reqwest::Client,
    base_url: String,
    limiter: Option<DefaultDirectRateLimiter>,
}

impl BscScanClient {
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        let timeout = Duration::from_secs(config.rpc_timeout_secs);
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        let limiter = config
            .rpc_rate_limit
            .and_then(NonZeroU32::new)
            .map(|per_sec| RateLimiter::direct(Quota::per_second(per_sec)));

        info!(
            "Initializing explorer client for {} (timeout {:?}, rate limit {:?}/s)",
            config.bscscan_api_url, timeout, config.rpc_rate_limit
        );

        Ok(Self {
            http,
            base_url: config.bscscan_api_url.clone(),
            limiter,
        })
    }

    async fn get(&self, params: &[(&str, String)]) -> Result<ExplorerResponse, ClientError> {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }

        let response = self
            .http
            .get(&self.base_url)
            .query(params)
            .send()
            .await?
            .error_for_status()?;

        let body = response.json::<ExplorerResponse>().await?;
        debug!("Explorer answered status={} message={}", body.status, body.message);
        Ok(body)
    }

    fn listing_params(
        action: &str,
        address: &str,
        start_block: u64,
        api_key: &str,
    ) -> Vec<(&'static str, String)> {
        vec![
            ("module", "account".to_string()),
            ("action", action.to_string()),
            ("address", address.to_string()),
            ("startblock", start_block.to_string()),
            ("endblock", END_BLOCK.to_string()),
            ("page", "1".to_string()),
            ("offset", PAGE_SIZE.to_string()),
            ("sort", "desc".to_string()),
            ("apikey", api_key.to_string()),
        ]
    }
}

impl ExplorerApi for BscScanClient {
    async fn block_by_timestamp(
        &self,
        timestamp: i64,
        api_key: &str,
    ) -> Result<ExplorerResponse, ClientError> {
        let params = [
            ("module", "block".to_string()),
            ("action", "getblocknobytime".to_string()),
            ("timestamp", timestamp.to_string()),
            ("closest", "before".to_string()),
            ("apikey", api_key.to_string()),
        ];
        self.get(&params).await
    }

    async fn list_transactions(
        &self,
        address: &str,
        start_block: u64,
        api_key: &str,
    ) -> Result<ExplorerResponse, ClientError> {
        let params = Self::listing_params("txlist", address, start_block, api_key);
        self.get(&params).await
    }

    async fn list_token_transfers(
        &self,
        address: &str,
        start_block: u64,
        api_key: &str,
    ) -> Result<ExplorerResponse, ClientError> {
        let params = Self::listing_params("tokentx", address, start_block, api_key);
        self.get(&params).await
    }
}
