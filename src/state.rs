use crate::blockchain::BscScanClient;
use crate::db::SqliteStore;
use crate::session::{QueryEngine, SessionState};
use tokio::sync::Mutex;

pub struct AppState {
    /// Locked only to start or publish a query, never across network calls.
    pub session: Mutex<SessionState<SqliteStore>>,
    pub engine: QueryEngine<BscScanClient>,
}
