//! Migration proxy library.
//!
//! Fronts a legacy backend application server while its replacement is built
//! out. Per request the proxy either answers 404 for paths owned by
//! co-located APIs, serves the single-page application shell for client-side
//! routes, or forwards transparently to the backend with redirect responses
//! rewritten to the public address.

// Core subsystems
pub mod config;
pub mod http;
pub mod proxy;
pub mod spa;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
