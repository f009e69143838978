//! OS signal kinds and subscription.
//!
//! # Responsibilities
//! - Name the termination-style signals the waiter can watch
//! - Translate between raw signal numbers and typed kinds
//! - Register interest with the OS and hand back an owned stream
//!
//! # Design Decisions
//! - Uses signal-hook-tokio for async-safe delivery
//! - One subscription per waiter, never a process-wide registry
//! - SIGKILL/SIGSTOP cannot be caught and are rejected up front

use std::fmt;
use std::str::FromStr;

use signal_hook::consts::{
    SIGABRT, SIGALRM, SIGCHLD, SIGCONT, SIGFPE, SIGHUP, SIGILL, SIGINT, SIGKILL, SIGPIPE, SIGQUIT, SIGSEGV,
    SIGSTOP, SIGTERM, SIGUSR1, SIGUSR2, SIGWINCH,
};
use signal_hook_tokio::Signals;

use crate::lifecycle::error::WaiterError;

/// A signal kind observed by (or watched for by) a waiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    /// SIGINT, usually Ctrl-C.
    Interrupt,
    /// SIGTERM, the default `kill` signal.
    Terminate,
    /// SIGQUIT.
    Quit,
    /// SIGHUP.
    Hangup,
    /// SIGUSR1.
    User1,
    /// SIGUSR2.
    User2,
    /// Any other raw signal number.
    Other(i32),
}

impl Signal {
    /// Raw signal number.
    pub fn as_raw(self) -> i32 {
        match self {
            Signal::Interrupt => SIGINT,
            Signal::Terminate => SIGTERM,
            Signal::Quit => SIGQUIT,
            Signal::Hangup => SIGHUP,
            Signal::User1 => SIGUSR1,
            Signal::User2 => SIGUSR2,
            Signal::Other(raw) => raw,
        }
    }

    /// Map a raw signal number to its kind.
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            SIGINT => Signal::Interrupt,
            SIGTERM => Signal::Terminate,
            SIGQUIT => Signal::Quit,
            SIGHUP => Signal::Hangup,
            SIGUSR1 => Signal::User1,
            SIGUSR2 => Signal::User2,
            other => Signal::Other(other),
        }
    }

    /// Whether the OS refuses to let this signal be caught.
    pub fn is_forbidden(self) -> bool {
        signal_hook::consts::FORBIDDEN.contains(&self.as_raw())
    }

    /// Conventional shell exit code for a process ended by this signal.
    pub fn exit_code(self) -> i32 {
        128 + self.as_raw()
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Interrupt => write!(f, "SIGINT"),
            Signal::Terminate => write!(f, "SIGTERM"),
            Signal::Quit => write!(f, "SIGQUIT"),
            Signal::Hangup => write!(f, "SIGHUP"),
            Signal::User1 => write!(f, "SIGUSR1"),
            Signal::User2 => write!(f, "SIGUSR2"),
            Signal::Other(raw) => match other_name(*raw) {
                Some(name) => f.write_str(name),
                None => write!(f, "signal {}", raw),
            },
        }
    }
}

/// Names for the raw numbers without a dedicated variant.
fn other_name(raw: i32) -> Option<&'static str> {
    let name = match raw {
        SIGKILL => "SIGKILL",
        SIGSTOP => "SIGSTOP",
        SIGILL => "SIGILL",
        SIGFPE => "SIGFPE",
        SIGSEGV => "SIGSEGV",
        SIGABRT => "SIGABRT",
        SIGALRM => "SIGALRM",
        SIGPIPE => "SIGPIPE",
        SIGCHLD => "SIGCHLD",
        SIGCONT => "SIGCONT",
        SIGWINCH => "SIGWINCH",
        _ => return None,
    };
    Some(name)
}

impl From<i32> for Signal {
    fn from(raw: i32) -> Self {
        Signal::from_raw(raw)
    }
}

impl From<Signal> for i32 {
    fn from(signal: Signal) -> Self {
        signal.as_raw()
    }
}

/// Error returned when a signal name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown signal name: {0}")]
pub struct UnknownSignal(pub String);

impl FromStr for Signal {
    type Err = UnknownSignal;

    /// Accepts `SIGTERM`, `TERM`, `term` or a bare number.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(raw) = trimmed.parse::<i32>() {
            if raw > 0 {
                return Ok(Signal::from_raw(raw));
            }
            return Err(UnknownSignal(s.to_string()));
        }

        let upper = trimmed.to_ascii_uppercase();
        let name = upper.strip_prefix("SIG").unwrap_or(&upper);
        match name {
            "INT" => Ok(Signal::Interrupt),
            "TERM" => Ok(Signal::Terminate),
            "QUIT" => Ok(Signal::Quit),
            "HUP" => Ok(Signal::Hangup),
            "USR1" => Ok(Signal::User1),
            "USR2" => Ok(Signal::User2),
            "KILL" => Ok(Signal::Other(SIGKILL)),
            "STOP" => Ok(Signal::Other(SIGSTOP)),
            _ => Err(UnknownSignal(s.to_string())),
        }
    }
}

/// Subscribe to delivery of exactly `signals`.
///
/// The returned stream keeps delivering for as long as it (or its handle) is
/// not closed.
pub fn subscribe(signals: &[Signal]) -> Result<Signals, WaiterError> {
    if signals.is_empty() {
        return Err(WaiterError::NoSignals);
    }
    if let Some(forbidden) = signals.iter().copied().find(|s| s.is_forbidden()) {
        return Err(WaiterError::Forbidden(forbidden));
    }

    let raw: Vec<i32> = signals.iter().map(|s| s.as_raw()).collect();
    let stream = Signals::new(&raw).map_err(WaiterError::Register)?;

    tracing::debug!(signals = ?signals, "Subscribed to OS signals");
    Ok(stream)
}
