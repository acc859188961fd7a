use roster::{DocumentError, RosterError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Roster(#[from] RosterError),
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error("failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("unknown dataset: {0}")]
    UnknownDataset(String),
    #[error("blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
