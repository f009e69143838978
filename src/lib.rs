//! Graceful-shutdown signal waiter.
//!
//! Wait for a termination signal, run cleanup hooks concurrently, and return
//! when a second signal arrives, the hooks finish, or a timeout elapses.

pub mod config;
pub mod lifecycle;
pub mod observability;

pub use config::WaiterConfig;
pub use lifecycle::{Hook, Signal, SignalError, SignalWaiter, WaitExit, WaiterError};
