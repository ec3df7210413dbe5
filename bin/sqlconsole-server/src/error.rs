//! Unified server error type.
//!
//! Every handler returns `Result<T, ServerError>`, which implements
//! [`axum::response::IntoResponse`] so errors become a `{"detail": "..."}`
//! JSON body with the matching status code.
//!
//! Execution failures expose the raw driver message to the caller.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use sqlconsole_core::REJECTION_MESSAGE;
use thiserror::Error;
use tracing::error;

use crate::gateway::GatewayError;
use crate::schemas::ErrorBody;

#[derive(Debug, Error)]
pub enum ServerError {
    /// The safety gate rejected the statement.
    #[error("{}", REJECTION_MESSAGE)]
    Forbidden,

    /// The database layer failed; the message is passed through verbatim.
    #[error("{0}")]
    Execution(String),

    /// The request was well-formed HTTP but missing or invalid input.
    #[error("{0}")]
    Unprocessable(String),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::Forbidden => StatusCode::BAD_REQUEST,
            ServerError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServerError::Execution(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(detail = %self, "request failed");
        }
        (status, Json(ErrorBody { detail: self.to_string() })).into_response()
    }
}

impl From<GatewayError> for ServerError {
    fn from(e: GatewayError) -> Self {
        match e {
            GatewayError::Forbidden { .. } => ServerError::Forbidden,
            GatewayError::Execution(message) => ServerError::Execution(message),
        }
    }
}
