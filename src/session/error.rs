use crate::blockchain::client::ClientError;
use crate::validation::ValidationError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("No BscScan API key configured")]
    Configuration,

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("A query is already in progress")]
    Busy,
}

impl From<ClientError> for QueryError {
    fn from(err: ClientError) -> Self {
        QueryError::Upstream(err.to_string())
    }
}
