// In crates/store/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to (de)serialize stored data: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Stored value for '{key}' is corrupt: {reason}")]
    Corrupt { key: String, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
