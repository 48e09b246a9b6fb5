//! Cross-origin grants.
//!
//! Every response leaves with the permissive wildcard grants so browser
//! clients can call the proxy from any origin. The set is a process-wide
//! constant; nothing mutates it after startup.

use axum::http::{HeaderMap, HeaderValue};

/// Grants applied to every response, preflight included.
pub const CORS_HEADERS: &[(&str, &str)] = &[
    ("access-control-allow-origin", "*"),
    ("access-control-allow-methods", "*"),
    ("access-control-allow-headers", "*"),
];

/// Insert the CORS grants into `headers`.
///
/// Names already present keep their value, so a grant returned by the
/// upstream wins over the wildcard default.
pub fn apply(headers: &mut HeaderMap) {
    for &(name, value) in CORS_HEADERS {
        headers
            .entry(name)
            .or_insert_with(|| HeaderValue::from_static(value));
    }
}
