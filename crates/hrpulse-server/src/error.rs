//! Unified server error type.
//!
//! Every handler returns `Result<T, ServerError>`, which implements
//! [`axum::response::IntoResponse`] so errors become a JSON envelope
//! with an appropriate status code. Internal errors are logged with
//! full detail but only a generic message reaches the caller.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// All errors that can occur in the request lifecycle.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The caller sent an invalid or malformed request.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// An unclassified internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, client_message) = match &self {
            ServerError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
            ServerError::Internal(m) => {
                error!(error = %m, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "something went wrong handling this request".to_string(),
                )
            }
        };

        let body = Json(json!({
            "success": false,
            "error": client_message,
        }));
        (status, body).into_response()
    }
}
