//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGINT/SIGTERM/... → typed Signal → owned subscription stream
//!
//! Hooks (hooks.rs):
//!     Signal → one task per cleanup callback
//!
//! Shutdown (shutdown.rs):
//!     First signal → fan out hooks → second signal | hooks done | timeout → return
//! ```
//!
//! # Design Decisions
//! - Shutdown has timeout: hooks are abandoned after the deadline
//! - A second signal cuts cleanup short
//! - Process exit is left to the caller

pub mod error;
pub mod hooks;
pub mod shutdown;
pub mod signals;

pub use error::{SignalError, WaiterError};
pub use hooks::Hook;
pub use shutdown::{SignalWaiter, WaitExit};
pub use signals::{Signal, UnknownSignal};
