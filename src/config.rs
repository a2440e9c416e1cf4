// Configuration for:
// - Explorer API endpoint and request limits
// - Key-value store location
// - Server listening address/port
// - Counterparty and stablecoin contract being analysed
// - Block lookup cache settings (size, TTL)

use dotenv::dotenv;
use std::env;
use std::time::Duration;

use crate::validation::normalize_address;

pub const DEFAULT_TARGET_ADDRESS: &str = "0xb300000b72DEAEb607a12d5f54773D1C19c7028d";
pub const DEFAULT_USDT_CONTRACT: &str = "0x55d398326f99059ff775485246999027b3197955";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub bscscan_api_url: String,
    /// Counterparty every interaction is measured against, lowercase.
    pub target_address: String,
    /// Stablecoin contract PNL is denominated in, lowercase.
    pub usdt_contract: String,
    pub rpc_timeout_secs: u64,
    pub rpc_rate_limit: Option<u32>,
    pub cache_ttl: Duration,
    pub cache_max_capacity: u64,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:bsc_pnl.db".to_string());
        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .unwrap_or(8080);
        let bscscan_api_url = env::var("BSCSCAN_API_URL")
            .unwrap_or_else(|_| "https://api.bscscan.com/api".to_string());
        let target_address = env::var("TARGET_ADDRESS")
            .map(|v| normalize_address(&v))
            .unwrap_or_else(|_| normalize_address(DEFAULT_TARGET_ADDRESS));
        let usdt_contract = env::var("USDT_CONTRACT")
            .map(|v| normalize_address(&v))
            .unwrap_or_else(|_| normalize_address(DEFAULT_USDT_CONTRACT));
        let rpc_timeout_secs = env::var("RPC_TIMEOUT_SECS")
            .map(|v| v.parse().unwrap_or(30))
            .unwrap_or(30);
        let rpc_rate_limit = env::var("RPC_RATE_LIMIT")
            .map(|v| v.parse().ok())
            .unwrap_or(None);
        let cache_ttl = env::var("CACHE_TTL")
            .unwrap_or_else(|_| "3600".to_string())
            .parse()
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(3600));
        let cache_max_capacity = env::var("CACHE_MAX_CAPACITY")
            .unwrap_or_else(|_| "64".to_string())
            .parse()
            .unwrap_or(64);

        Self {
            database_url,
            server_host,
            server_port,
            bscscan_api_url,
            target_address,
            usdt_contract,
            rpc_timeout_secs,
            rpc_rate_limit,
            cache_ttl,
            cache_max_capacity,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            server_host: "127.0.0.1".to_string(),
            server_port: 8080,
            bscscan_api_url: "https://api.bscscan.com/api".to_string(),
            target_address: normalize_address(DEFAULT_TARGET_ADDRESS),
            usdt_contract: normalize_address(DEFAULT_USDT_CONTRACT),
            rpc_timeout_secs: 30,
            rpc_rate_limit: None,
            cache_ttl: Duration::from_secs(3600),
            cache_max_capacity: 64,
        }
    }
}
