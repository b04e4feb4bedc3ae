//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the migration proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Upstream addresses and locally served API paths.
    pub upstream: UpstreamConfig,

    /// Single-page-application fallback settings.
    pub spa: SpaConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Upstream configuration.
///
/// `destination` is the public-facing base URI that clients should see in
/// redirect responses. `backend` is the real address the proxy connects to.
/// During a typical migration both point at the same application through
/// different network paths.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Public base URI substituted into redirect responses.
    /// Required; must be an absolute http(s) URI.
    pub destination: String,

    /// Address of the legacy backend requests are forwarded to.
    /// Required; must be an absolute http URI.
    pub backend: String,

    /// Absolute URLs of co-located APIs (session, authentication, cookies,
    /// ...) whose paths must never be proxied. Malformed entries are
    /// skipped rather than rejected; these APIs are optional in some
    /// deployments.
    pub local_apis: Vec<String>,
}

/// Single-page-application fallback configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SpaConfig {
    /// Enable the SPA fallback branch of the dispatcher.
    pub enabled: bool,

    /// Literal request paths treated as client-side routes (matched
    /// case-insensitively).
    pub paths: Vec<String>,

    /// Directory the root document is served from.
    pub static_root: String,

    /// Path of the root document within `static_root`.
    pub index: String,
}

impl Default for SpaConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            paths: Vec::new(),
            static_root: "wwwroot".to_string(),
            index: "/index.html".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Upstream request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 100 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level used when RUST_LOG is not set (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ProxyConfig::default();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.timeouts.request_secs, 100);
        assert!(!config.spa.enabled);
        assert_eq!(config.spa.index, "/index.html");
        assert!(config.upstream.destination.is_empty());
        assert!(config.upstream.local_apis.is_empty());
    }

    #[test]
    fn test_minimal_config_deserializes() {
        let config: ProxyConfig = toml::from_str(
            r#"
            [upstream]
            destination = "https://public.example.com"
            backend = "http://127.0.0.1:5000"
            "#,
        )
        .unwrap();
        assert_eq!(config.upstream.destination, "https://public.example.com");
        assert_eq!(config.upstream.backend, "http://127.0.0.1:5000");
        // Everything else falls back to defaults
        assert_eq!(config.timeouts.request_secs, 100);
        assert!(!config.observability.metrics_enabled);
    }
}
