//! HTTP server subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum catch-all, one task per request)
//!     → request.rs (stamp x-request-id)
//!     → proxy::dispatcher (decide + execute)
//!     → response back to client
//! ```

pub mod request;
pub mod server;

pub use request::{RequestIdLayer, X_REQUEST_ID};
pub use server::HttpServer;
