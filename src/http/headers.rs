//! Header selection for the upstream hop.
//!
//! # Responsibilities
//! - Decide which inbound headers may cross to the upstream request
//! - Assemble response headers: CORS grants overlaid by upstream's set
//! - Strip encoding/framing headers that no longer describe the body
//!
//! # Design Decisions
//! - Allow-list, not block-list: cookies, authorization schemes, host and
//!   user-agent never leave the proxy
//! - Matching is case-insensitive (header names are ASCII per RFC 9110)
//! - Entries are tagged matchers so a future rule can admit a name family
//!   without touching the filter itself

use axum::http::header::{CONTENT_ENCODING, CONTENT_LENGTH, TRANSFER_ENCODING};
use axum::http::HeaderMap;

use crate::http::cors;

/// A single allow-list entry.
#[derive(Debug, Clone, Copy)]
pub enum HeaderRule {
    /// Admits a header whose name equals this one, ignoring case.
    Exact(&'static str),

    /// Admits any header whose name starts with this prefix, ignoring case.
    Prefix(&'static str),
}

impl HeaderRule {
    /// Returns true if this rule admits the header name.
    pub fn matches(&self, name: &str) -> bool {
        match self {
            HeaderRule::Exact(expected) => name.eq_ignore_ascii_case(expected),
            HeaderRule::Prefix(prefix) => name
                .get(..prefix.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(prefix)),
        }
    }
}

/// Headers permitted to cross from the inbound request to the upstream
/// request. Everything else is dropped.
pub const FORWARD_RULES: &[HeaderRule] = &[
    HeaderRule::Exact("content-type"),
    HeaderRule::Exact("x-goog-api-client"),
    HeaderRule::Exact("x-goog-api-key"),
    HeaderRule::Exact("accept-encoding"),
];

/// Select the inbound headers admitted by [`FORWARD_RULES`].
///
/// Repeated values of an admitted name are all kept.
pub fn filter_request_headers(inbound: &HeaderMap) -> HeaderMap {
    let mut outbound = HeaderMap::new();
    for (name, value) in inbound {
        if FORWARD_RULES.iter().any(|rule| rule.matches(name.as_str())) {
            outbound.append(name.clone(), value.clone());
        }
    }
    outbound
}

/// Build the headers relayed to the client from an upstream response.
///
/// Starts from the upstream set, fills in any missing CORS grant, then
/// drops `content-encoding` together with the framing headers: the body
/// is re-streamed, so the serving layer recomputes framing, and a stale
/// declared encoding or length would desynchronize it from the bytes the
/// client actually receives.
pub fn response_headers(upstream: &HeaderMap) -> HeaderMap {
    let mut headers = upstream.clone();
    cors::apply(&mut headers);
    headers.remove(CONTENT_ENCODING);
    headers.remove(CONTENT_LENGTH);
    headers.remove(TRANSFER_ENCODING);
    headers
}
