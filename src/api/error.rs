use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use crate::db::StoreError;
use crate::session::{QueryError, MSG_MISSING_API_KEY, MSG_REQUEST_FAILED};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Not configured")]
    NotConfigured,

    #[error("Query already in progress")]
    Conflict,

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::NotConfigured => (StatusCode::PRECONDITION_FAILED, MSG_MISSING_API_KEY.to_string()),
            ApiError::Conflict => (StatusCode::CONFLICT, self.to_string()),
            // Upstream detail stays in the logs
            ApiError::Upstream(_) => (StatusCode::BAD_GATEWAY, MSG_REQUEST_FAILED.to_string()),
            ApiError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Storage error occurred".to_string()),
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::Configuration => ApiError::NotConfigured,
            QueryError::Validation(e) => ApiError::BadRequest(e.to_string()),
            QueryError::Upstream(msg) => ApiError::Upstream(msg),
            QueryError::Busy => ApiError::Conflict,
        }
    }
}
