// In crates/engine/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Snapshot source unavailable: {0}")]
    SourceUnavailable(String),
    #[error("Malformed snapshot: {0}")]
    MalformedSnapshot(String),
    #[error("Refresh worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

impl From<api_client::Error> for Error {
    fn from(err: api_client::Error) -> Self {
        Error::SourceUnavailable(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
