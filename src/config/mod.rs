//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks, signal names resolved)
//!     → LoadedConfig (validated, immutable)
//!     → used once to build the SignalWaiter
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError, LoadedConfig};
pub use schema::{ObservabilityConfig, ShutdownConfig, WaiterConfig};
pub use validation::ValidationError;
