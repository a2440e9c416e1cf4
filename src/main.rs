// Load configuration
// Set up logging
// Open the key-value store and restore the session
// Either run a single query (address argument) or serve the HTTP API

use bsc_daily_pnl::{
    api, blockchain::{BscScanClient, DayWindow}, config::Config, db, session::{QueryEngine, SessionState},
    state::AppState,
};

use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting bsc-daily-pnl");

    // Load configuration
    let config = Config::from_env();
    info!("Configuration loaded: {:?}", config);

    // Restore persisted session state
    let db_pool = db::connection::establish_connection(&config.database_url).await?;
    info!("Database connection established");
    let mut session = SessionState::load(db::SqliteStore::new(db_pool)).await;

    let engine = QueryEngine::new(BscScanClient::new(&config)?, &config);

    // One-shot mode
    if let Some(address) = std::env::args().nth(1) {
        if let Err(e) = session.submit(&engine, &address, DayWindow::today()).await {
            error!("Query for {} failed: {}", address, e);
        }
        println!("{}", serde_json::to_string_pretty(&session.snapshot())?);
        return Ok(());
    }

    let app_state = Arc::new(AppState {
        session: Mutex::new(session),
        engine,
    });

    // Stop serving on Ctrl-C
    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown signal received");
        }
        signal_token.cancel();
    });

    // Start HTTP server
    let app = api::create_router(app_state);
    let addr = format!("{}:{}", config.server_host, config.server_port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    info!("Server stopped");
    Ok(())
}
