//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate the bind address and upstream origin
//! - Validate value ranges (timeouts > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::ProxyConfig;

/// A single semantic violation in the configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("invalid bind address '{address}': {reason}")]
    BindAddress { address: String, reason: String },

    #[error("invalid upstream origin '{origin}': {reason}")]
    UpstreamOrigin { origin: String, reason: String },

    #[error("request timeout must be nonzero")]
    ZeroRequestTimeout,
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = config.listener.bind_address.parse::<SocketAddr>() {
        errors.push(ValidationError::BindAddress {
            address: config.listener.bind_address.clone(),
            reason: e.to_string(),
        });
    }

    match Url::parse(&config.upstream.origin) {
        Ok(url) => {
            if !matches!(url.scheme(), "http" | "https") {
                errors.push(ValidationError::UpstreamOrigin {
                    origin: config.upstream.origin.clone(),
                    reason: "scheme must be http or https".to_string(),
                });
            } else if url.host_str().is_none() {
                errors.push(ValidationError::UpstreamOrigin {
                    origin: config.upstream.origin.clone(),
                    reason: "origin has no host".to_string(),
                });
            }
        }
        Err(e) => {
            errors.push(ValidationError::UpstreamOrigin {
                origin: config.upstream.origin.clone(),
                reason: e.to_string(),
            });
        }
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&ProxyConfig::default()).is_ok());
    }

    #[test]
    fn rejects_unparseable_bind_address() {
        let mut config = ProxyConfig::default();
        config.listener.bind_address = "not-an-address".to_string();

        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(errors[0], ValidationError::BindAddress { .. }));
    }

    #[test]
    fn rejects_non_http_upstream_scheme() {
        let mut config = ProxyConfig::default();
        config.upstream.origin = "ftp://example.com".to_string();

        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(errors[0], ValidationError::UpstreamOrigin { .. }));
    }

    #[test]
    fn collects_every_violation() {
        let mut config = ProxyConfig::default();
        config.listener.bind_address = "nope".to_string();
        config.upstream.origin = "not a url".to_string();
        config.timeouts.request_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
