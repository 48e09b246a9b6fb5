//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, catch-all forwarder)
//!     → cors.rs   (preflight short-circuit, response grants)
//!     → headers.rs (outbound allow-list, response header assembly)
//!     → upstream round trip (streamed both ways)
//!     → Send to client
//! ```

pub mod cors;
pub mod error;
pub mod headers;
pub mod request;
pub mod server;

pub use error::ProxyError;
pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use server::HttpServer;
