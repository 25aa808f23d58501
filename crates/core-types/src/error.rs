// In crates/core-types/src/error.rs

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum Error {
    #[error("Unknown column: {0}")]
    UnknownColumn(String),
}

pub type Result<T> = std::result::Result<T, Error>;
