// In crates/web-server/src/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::types::ErrorBody;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to bind the server address: {0}")]
    ServerBindError(#[source] std::io::Error),
    #[error("Server stopped unexpectedly: {0}")]
    ServeError(#[source] std::io::Error),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::BadRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed.");
        }
        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}
