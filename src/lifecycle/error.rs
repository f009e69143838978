//! Error types for the signal waiter.

use thiserror::Error;

use crate::lifecycle::signals::Signal;

/// Outcome error of a completed wait: a termination signal was observed.
///
/// Timeouts and hook failures never produce one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("received signal {signal}")]
pub struct SignalError {
    /// The signal that triggered (or, if sent twice, ended) the wait.
    pub signal: Signal,
}

impl SignalError {
    /// Conventional exit code for the process, see [`Signal::exit_code`].
    pub fn exit_code(&self) -> i32 {
        self.signal.exit_code()
    }
}

/// Errors that can occur while building a waiter.
#[derive(Debug, Error)]
pub enum WaiterError {
    /// No signal kinds were given.
    #[error("at least one signal must be watched")]
    NoSignals,

    /// The OS does not allow this signal to be caught.
    #[error("{0} cannot be caught")]
    Forbidden(Signal),

    /// Registering the handler with the OS failed.
    #[error("failed to register signal handler: {0}")]
    Register(#[source] std::io::Error),
}
