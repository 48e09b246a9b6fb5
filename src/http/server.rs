//! HTTP server setup and the request forwarder.
//!
//! # Responsibilities
//! - Create the Axum Router with the catch-all forwarder
//! - Wire up middleware (request ID, tracing, timeout)
//! - Answer CORS preflights and the root info page locally
//! - Rewrite everything else against the upstream origin and relay the
//!   response, streaming bodies in both directions

use std::time::Duration;

use axum::{
    body::Body,
    extract::{Request, State},
    http::{Method, Uri},
    response::{Html, IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::SetRequestIdLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use url::Url;

use crate::config::ProxyConfig;
use crate::http::cors;
use crate::http::error::ProxyError;
use crate::http::headers::{filter_request_headers, response_headers};
use crate::http::request::{MakeRequestUuid, X_REQUEST_ID};

/// Reserved query parameter consumed by the proxy and never forwarded.
const PATH_PARAM: &str = "_path";

/// Markup served for requests to the root path.
const INFO_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="UTF-8">
  <title>Generative Language API proxy</title>
</head>
<body>
  <h1>Generative Language API proxy</h1>
  <p>This server relays requests to the Google generative-language API.
  Point your client at this host and keep the original path and query;
  the <code>key</code> parameter or <code>x-goog-api-key</code> header is
  forwarded as-is.</p>
  <p>Requests to <code>/</code> and CORS preflights are answered locally;
  everything else is proxied.</p>
</body>
</html>
"#;

/// Application state injected into the forwarder.
#[derive(Clone)]
pub struct AppState {
    /// Shared outbound client; connection pooling is delegated to it.
    pub client: reqwest::Client,
    /// Origin every proxied request is resolved against.
    pub upstream: Url,
}

/// HTTP server for the proxy.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server from the given configuration.
    pub fn new(config: &ProxyConfig) -> Result<Self, ProxyError> {
        let state = AppState {
            client: reqwest::Client::new(),
            upstream: Url::parse(&config.upstream.origin)?,
        };

        let router = Self::build_router(config, state);
        Ok(Self { router })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        Router::new()
            .route("/", any(forward))
            .route("/{*path}", any(forward))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http().make_span_with(request_span))
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.timeouts.request_secs,
                    ))),
            )
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

fn request_span(request: &axum::http::Request<Body>) -> tracing::Span {
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");

    tracing::debug_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id,
    )
}

/// The request forwarder.
///
/// Preflights and the root path never reach the upstream; every other
/// request produces exactly one outbound call.
async fn forward(
    State(state): State<AppState>,
    request: Request,
) -> Result<Response, ProxyError> {
    if request.method() == Method::OPTIONS {
        return Ok(preflight());
    }

    if request.uri().path() == "/" {
        return Ok(info_page());
    }

    let target = upstream_url(&state.upstream, request.uri())?;

    let (parts, body) = request.into_parts();
    let outbound_headers = filter_request_headers(&parts.headers);

    tracing::debug!(
        method = %parts.method,
        target = %target,
        "Forwarding request"
    );

    let upstream = state
        .client
        .request(parts.method, target)
        .headers(outbound_headers)
        .body(reqwest::Body::wrap_stream(body.into_data_stream()))
        .send()
        .await?;

    let status = upstream.status();
    let headers = response_headers(upstream.headers());

    let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    Ok(response)
}

/// Empty-body preflight answer carrying only the CORS grants.
fn preflight() -> Response {
    let mut response = Response::new(Body::empty());
    cors::apply(response.headers_mut());
    response
}

/// Static info page for the root path.
fn info_page() -> Response {
    let mut response = Html(INFO_PAGE).into_response();
    cors::apply(response.headers_mut());
    response
}

/// Resolve the inbound path against the upstream origin, carrying every
/// query parameter across except the reserved routing parameter.
fn upstream_url(origin: &Url, uri: &Uri) -> Result<Url, url::ParseError> {
    let mut target = origin.join(uri.path())?;

    if let Some(query) = uri.query() {
        let kept: Vec<(String, String)> = url::form_urlencoded::parse(query.as_bytes())
            .filter(|(name, _)| name != PATH_PARAM)
            .map(|(name, value)| (name.into_owned(), value.into_owned()))
            .collect();

        if !kept.is_empty() {
            target.query_pairs_mut().extend_pairs(kept);
        }
    }

    Ok(target)
}
