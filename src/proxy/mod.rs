//! Request dispatch and forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path)
//!     → dispatcher.rs (decide: bypass | spa fallback | forward)
//!         bypass      → 404, no upstream contact
//!         spa         → handled by the spa subsystem
//!         forward     → dispatcher.rs (Forwarder: rewrite URI authority,
//!                       pooled client, bounded timeout)
//!                     → redirect.rs (rewrite Location on the response)
//!                     → client
//!
//! At startup:
//!     configured local-API URLs
//!     → exclusions.rs (parse, keep path component, drop malformed)
//!     → ExclusionSet (immutable, shared)
//! ```
//!
//! # Design Decisions
//! - The routing decision is an explicit per-request record, produced by a
//!   pure function and executed by the handler; nothing mutates ambient
//!   request state
//! - First match wins: bypass, then SPA, then forward
//! - No retries; upstream failures map to 502/504 for that request only

pub mod dispatcher;
pub mod exclusions;
pub mod redirect;

pub use dispatcher::{decide, Decision, DispatchOutcome, Forwarder};
pub use exclusions::ExclusionSet;
pub use redirect::RedirectRewriter;
