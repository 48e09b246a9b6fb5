//! Request identity.
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - IDs are UUID v4, generated only when the client did not send one
//! - The ID stays local to the proxy's logs; it is neither forwarded
//!   upstream (the allow-list drops it) nor echoed to the client

use axum::http::{HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

/// Canonical request ID header name.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Generates a UUID v4 request ID for requests that lack one.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let value: HeaderValue = Uuid::new_v4().to_string().parse().ok()?;
        Some(RequestId::new(value))
    }
}
