// In crates/api-client/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to build the API client: {0}")]
    ClientBuildError(String),
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(#[from] serde_json::Error),
    #[error("API error: status {status}, msg: {msg}")]
    ApiError { status: u16, msg: String },
    #[error("Snapshot log unavailable: {0}")]
    LogUnavailable(#[from] store::Error),
    #[error("Log reader failed: {0}")]
    LogReader(#[from] tokio::task::JoinError),
    #[error("No snapshot available yet")]
    NoSnapshot,
}

pub type Result<T> = std::result::Result<T, Error>;
