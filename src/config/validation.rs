//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate required upstream addresses parse as absolute URIs
//! - Validate value ranges (timeouts > 0, addresses bindable)
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system
//! - `upstream.local_apis` entries are deliberately NOT validated here:
//!   malformed entries are skipped at exclusion-set build time instead

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::ProxyConfig;

/// A single semantic problem found in the configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The public destination is missing or not an absolute http(s) URI.
    #[error("upstream.destination is not an absolute http(s) URI: {0:?}")]
    InvalidDestination(String),

    /// The backend address is missing or not an absolute http URI.
    #[error("upstream.backend is not an absolute http URI: {0:?}")]
    InvalidBackend(String),

    /// The listener bind address does not parse as a socket address.
    #[error("listener.bind_address is not a valid socket address: {0:?}")]
    InvalidBindAddress(String),

    /// The upstream request timeout is zero.
    #[error("timeouts.request_secs must be greater than zero")]
    ZeroRequestTimeout,

    /// SPA fallback enabled without a directory to serve from.
    #[error("spa.static_root must not be empty when spa.enabled is set")]
    EmptyStaticRoot,

    /// The SPA root document path is not absolute.
    #[error("spa.index must start with '/': {0:?}")]
    InvalidIndexPath(String),

    /// The metrics endpoint address does not parse as a socket address.
    #[error("observability.metrics_address is not a valid socket address: {0:?}")]
    InvalidMetricsAddress(String),
}

fn is_absolute_http(url: &str, schemes: &[&str]) -> bool {
    match Url::parse(url) {
        Ok(url) => url.has_host() && schemes.contains(&url.scheme()),
        Err(_) => false,
    }
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    // The process must not start with an invalid or missing destination.
    if !is_absolute_http(&config.upstream.destination, &["http", "https"]) {
        errors.push(ValidationError::InvalidDestination(
            config.upstream.destination.clone(),
        ));
    }

    // TLS to the backend is out of scope; the upstream leg is plain http.
    if !is_absolute_http(&config.upstream.backend, &["http"]) {
        errors.push(ValidationError::InvalidBackend(
            config.upstream.backend.clone(),
        ));
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    if config.spa.enabled {
        if config.spa.static_root.is_empty() {
            errors.push(ValidationError::EmptyStaticRoot);
        }
        if !config.spa.index.starts_with('/') {
            errors.push(ValidationError::InvalidIndexPath(config.spa.index.clone()));
        }
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
