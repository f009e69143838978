//! Observability subsystem.
//!
//! The waiter emits `tracing` events (signal received, which race branch won,
//! hook panics); this module wires up the subscriber that prints them.

pub mod logging;

pub use logging::init_logging;
