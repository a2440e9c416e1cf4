use bsc_daily_pnl::{
    analysis::{filter_transactions, filter_transfers, PnlReconciler},
    blockchain::{
        fetcher::{fetch_transactions, TransferFetcher},
        BlockWindowResolver, BscScanClient, DayWindow,
    },
    config::Config,
};
use tracing::{error, info, Level};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Setup tracing
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    info!("Starting explorer integration check...");

    // 1. Setup
    let config = Config::from_env();
    let api_key = std::env::var("BSCSCAN_API_KEY").unwrap_or_default();
    let address = match std::env::args().nth(1) {
        Some(address) => address.to_lowercase(),
        None => {
            error!("Usage: test_explorer <address>  (needs BSCSCAN_API_KEY)");
            return Ok(());
        }
    };

    let client = BscScanClient::new(&config)?;
    let resolver = BlockWindowResolver::new(config.cache_max_capacity, config.cache_ttl);
    let reconciler = PnlReconciler::from_config(&config);
    let window = DayWindow::today();
    info!("Window: {} - {}", window.start, window.end);

    // 2. Block lookup
    let start_block = resolver.resolve(&client, window.start, &api_key).await?;
    info!("✅ Day starts at block {}", start_block);

    // 3. Transactions
    let transactions = fetch_transactions(&client, &address, start_block, &api_key).await?;
    info!("✅ Fetched {} transactions", transactions.len());

    let qualifying = filter_transactions(&transactions, &window, reconciler.counterparty());
    info!("✅ {} interactions with {} today", qualifying.len(), reconciler.counterparty());

    // 4. Transfers + PNL
    let transfers = TransferFetcher::fetch(&client, &address, start_block, &api_key).await?;
    let todays = filter_transfers(&transfers, &window);
    info!("✅ Fetched {} token transfers, {} today", transfers.len(), todays.len());

    let summary = reconciler.reconcile(&todays, &qualifying, &address);
    for record in &summary.records {
        info!(
            "   {} {:?} {} {}",
            record.timestamp, record.side, record.usdt_amount, record.token
        );
    }
    info!(
        "✅ buy={} sell={} pnl={} level={} ignored={}",
        summary.buy_amount, summary.sell_amount, summary.pnl, summary.volume_level, summary.ignored
    );

    Ok(())
}
