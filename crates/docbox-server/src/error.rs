//! Server error type.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

/// Error returned by request handlers.
///
/// Not-found conditions are handled inside the page handler so they can be
/// composed with the shell; this type covers the remaining failures.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ServerError {
    /// Unexpected failure while resolving or rendering.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let Self::Internal(message) = self;
        tracing::error!(error = %message, "Request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html("<h1>500</h1><p>Internal server error.</p>".to_owned()),
        )
            .into_response()
    }
}
