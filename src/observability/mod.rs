//! Observability subsystem.
//!
//! # Design Decisions
//! - Logging uses `tracing` with an env-filter; the config supplies the
//!   default directive, RUST_LOG overrides it
//! - One "proxy" span per forwarded request, tagged with the request path;
//!   bypassed and SPA-fallback requests are visible in metrics and debug
//!   logs but deliberately produce no span
//! - Metrics are cheap atomic updates behind the `metrics` facade, exposed
//!   via a Prometheus endpoint when enabled

pub mod metrics;
