//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Request, State};
use axum::response::Response;
use axum::routing::any;
use axum::Router;
use tokio::net::TcpListener;

/// Records how often the mock upstream was called.
#[derive(Default)]
pub struct UpstreamLog {
    hits: AtomicUsize,
}

impl UpstreamLog {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Start a mock upstream that echoes the received request as JSON.
///
/// The echo payload carries the method, path, raw query and headers, so
/// tests can observe exactly what crossed the proxy. Two special paths
/// exercise response-side behavior: `/teapot` answers 418 with a plain
/// body, and `/cors-override` answers with its own CORS grant.
pub async fn start_echo_upstream() -> (SocketAddr, Arc<UpstreamLog>) {
    let log = Arc::new(UpstreamLog::default());

    let app = Router::new()
        .route("/", any(echo))
        .route("/{*path}", any(echo))
        .with_state(log.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, log)
}

async fn echo(State(log): State<Arc<UpstreamLog>>, request: Request) -> Response {
    log.hits.fetch_add(1, Ordering::SeqCst);

    let (parts, body) = request.into_parts();
    let body = axum::body::to_bytes(body, usize::MAX).await.unwrap();

    match parts.uri.path() {
        "/teapot" => Response::builder()
            .status(418)
            .header("x-upstream", "teapot")
            .body(Body::from("short and stout"))
            .unwrap(),
        "/cors-override" => Response::builder()
            .status(200)
            .header("access-control-allow-origin", "https://upstream.example")
            .body(Body::empty())
            .unwrap(),
        _ => {
            let headers: serde_json::Map<String, serde_json::Value> = parts
                .headers
                .iter()
                .map(|(name, value)| {
                    (
                        name.to_string(),
                        serde_json::Value::String(
                            String::from_utf8_lossy(value.as_bytes()).into_owned(),
                        ),
                    )
                })
                .collect();

            let payload = serde_json::json!({
                "method": parts.method.as_str(),
                "path": parts.uri.path(),
                "query": parts.uri.query(),
                "headers": headers,
                "body": String::from_utf8_lossy(&body),
            });

            Response::builder()
                .status(200)
                .header("content-type", "application/json")
                .header("x-upstream", "echo")
                .header("content-encoding", "gzip")
                .body(Body::from(payload.to_string()))
                .unwrap()
        }
    }
}
