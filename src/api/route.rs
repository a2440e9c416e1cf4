use crate::{
    api::{error::ApiError, response::ApiResponse},
    blockchain::DayWindow,
    db::KeyValueStore,
    session::{QueryError, SessionSnapshot, SessionState},
    state::AppState,
};
use axum::{
    extract::State,
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tokio::{sync::Mutex, task::JoinHandle};
use tower_http::cors::CorsLayer;
use tracing::info;

type QueryTask = JoinHandle<(Result<(), QueryError>, SessionSnapshot)>;

// POST /query body
#[derive(Deserialize)]
pub struct QueryRequest {
    pub address: String,
}

// PUT /credential body
#[derive(Deserialize)]
pub struct CredentialRequest {
    pub api_key: String,
}

// POST /history/select body
#[derive(Deserialize)]
pub struct HistorySelectRequest {
    pub index: usize,
}

// Create router with all routes
pub fn create_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/state", get(get_state))
        .route("/query", post(submit_query))
        .route("/credential", put(set_credential))
        .route("/history/select", post(select_history))
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}

// GET /state handler
async fn get_state(State(state): State<Arc<AppState>>) -> ApiResponse<SessionSnapshot> {
    let session = state.session.lock().await;
    ApiResponse {
        data: session.snapshot(),
    }
}

// POST /query handler
async fn submit_query(
    State(state): State<Arc<AppState>>,
    Json(body): Json<QueryRequest>,
) -> Result<ApiResponse<SessionSnapshot>, ApiError> {
    info!("Processing query request for address: {}", body.address);

    // Lock released before any network call; a second submit sees Loading.
    let plan = {
        let mut session = state.session.lock().await;
        session.begin_query(&body.address, DayWindow::today())?
    };

    // Detached so a dropped connection can't leave the session stuck in Loading.
    let worker = state.clone();
    let handle = tokio::spawn(async move {
        let outcome = worker.engine.run(&plan).await;
        let mut session = worker.session.lock().await;
        let finished = session.finish_query(outcome).await;
        (finished, session.snapshot())
    });

    let snapshot = settle_query(&state.session, handle).await?;
    Ok(ApiResponse { data: snapshot })
}

// Wait for the detached query. A worker that panicked never published, so
// the session is failed here instead.
async fn settle_query<S: KeyValueStore>(
    session: &Mutex<SessionState<S>>,
    handle: QueryTask,
) -> Result<SessionSnapshot, ApiError> {
    match handle.await {
        Ok((finished, snapshot)) => {
            finished?;
            Ok(snapshot)
        }
        Err(e) => {
            let reason = format!("query task failed: {}", e);
            session.lock().await.abandon_query(&reason);
            Err(ApiError::Upstream(reason))
        }
    }
}

// PUT /credential handler
async fn set_credential(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CredentialRequest>,
) -> Result<ApiResponse<SessionSnapshot>, ApiError> {
    let mut session = state.session.lock().await;
    session.set_api_key(&body.api_key).await?;
    Ok(ApiResponse {
        data: session.snapshot(),
    })
}

// POST /history/select handler
async fn select_history(
    State(state): State<Arc<AppState>>,
    Json(body): Json<HistorySelectRequest>,
) -> Result<ApiResponse<SessionSnapshot>, ApiError> {
    let mut session = state.session.lock().await;
    if session.select_history(body.index).is_none() {
        return Err(ApiError::NotFound(format!("history entry {}", body.index)));
    }
    Ok(ApiResponse {
        data: session.snapshot(),
    })
}
