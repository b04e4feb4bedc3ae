//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Build server state → Bind listener → Serve
//!
//! Shutdown:
//!     SIGINT/SIGTERM → Shutdown coordinator broadcasts
//!     → server stops accepting, drains in-flight requests, exits
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
