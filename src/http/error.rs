//! Forwarding failure surface.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Failure while relaying a request to the upstream origin.
///
/// Nothing is recovered locally: the proxy holds no state and runs no
/// multi-step transaction, so every failure surfaces directly as the
/// server's bad-gateway response. Upstream non-2xx statuses are not
/// errors and pass through untouched.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The outbound call failed (connect, DNS, TLS, timeout).
    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    /// The inbound path could not be resolved against the upstream origin.
    #[error("invalid upstream url: {0}")]
    Url(#[from] url::ParseError),
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Forwarding failed");
        (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
    }
}
