//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Resolve signal names to signal kinds
//! - Reject signals that cannot be caught and duplicate entries
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: WaiterConfig → Result<Vec<Signal>, Vec<ValidationError>>

use std::collections::HashSet;

use thiserror::Error;

use crate::config::schema::WaiterConfig;
use crate::lifecycle::Signal;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// `shutdown.signals` is empty.
    #[error("shutdown.signals must name at least one signal")]
    NoSignals,

    /// A name that does not map to a signal.
    #[error("shutdown.signals: unknown signal '{0}'")]
    UnknownSignal(String),

    /// SIGKILL, SIGSTOP and friends.
    #[error("shutdown.signals: {0} cannot be caught")]
    Uncatchable(Signal),

    /// The same signal listed twice.
    #[error("shutdown.signals: {0} listed more than once")]
    Duplicate(Signal),
}

/// Validate the configuration and return the resolved signal set.
pub fn validate_config(config: &WaiterConfig) -> Result<Vec<Signal>, Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();
    let mut signals = Vec::new();

    if config.shutdown.signals.is_empty() {
        errors.push(ValidationError::NoSignals);
    }

    for name in &config.shutdown.signals {
        match name.parse::<Signal>() {
            Ok(signal) if signal.is_forbidden() => errors.push(ValidationError::Uncatchable(signal)),
            Ok(signal) if !seen.insert(signal) => errors.push(ValidationError::Duplicate(signal)),
            Ok(signal) => signals.push(signal),
            Err(_) => errors.push(ValidationError::UnknownSignal(name.clone())),
        }
    }

    if errors.is_empty() {
        Ok(signals)
    } else {
        Err(errors)
    }
}
