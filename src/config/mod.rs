//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → shared via Arc to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs; the upstream
//!   destination and backend addresses are the only required values
//! - Validation separates syntactic (serde) from semantic checks
//! - Malformed local-API entries are NOT validation errors; they are
//!   skipped when the exclusion set is built

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::ProxyConfig;
pub use schema::{ListenerConfig, ObservabilityConfig, SpaConfig, TimeoutConfig, UpstreamConfig};
