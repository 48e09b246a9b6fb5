//! Reverse proxy library for the Google generative-language API.

pub mod config;
pub mod http;
pub mod lifecycle;

pub use config::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
