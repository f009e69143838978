//! Shutdown coordination: wait for a signal, then run cleanup hooks.
//!
//! # Flow
//! ```text
//! first signal ──▶ spawn one task per hook ──▶ race:
//!                                               ├─ second signal  → record it, return
//!                                               ├─ all hooks done → return
//!                                               └─ timeout        → return (hooks detached)
//! ```
//!
//! # Design Decisions
//! - The race is `biased`: second signal, then hook completion, then timeout
//! - Hooks still running when `wait` returns are detached, never aborted
//! - `wait` runs at most once per waiter; later calls are no-ops
//! - Raw signals outside the watched set are skipped, whatever the source

use std::time::Duration;

use futures_util::future::join_all;
use futures_util::{Stream, StreamExt};
use signal_hook_tokio::{Handle, Signals};
use tokio::task::JoinHandle;

use crate::lifecycle::error::{SignalError, WaiterError};
use crate::lifecycle::hooks::Hook;
use crate::lifecycle::signals::{subscribe, Signal};

/// Which branch of the race ended a wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitExit {
    /// A second watched signal arrived before cleanup finished.
    SecondSignal,
    /// Every hook task completed.
    HooksFinished,
    /// The timeout elapsed with hooks still running.
    TimedOut,
}

/// Waits for a termination signal and runs cleanup hooks, bounded by a second
/// signal or a timeout.
///
/// ```no_run
/// # async fn run() -> Result<(), signalx::WaiterError> {
/// use std::time::Duration;
/// use signalx::{Hook, Signal, SignalWaiter};
///
/// let mut waiter = SignalWaiter::new(
///     &[Signal::Interrupt, Signal::Terminate],
///     Duration::from_secs(10),
///     vec![Hook::blocking(|sig| println!("flushing after {sig}"))],
/// )?;
///
/// if let Some(err) = waiter.wait().await.err() {
///     eprintln!("{err}");
/// }
/// # Ok(())
/// # }
/// ```
pub struct SignalWaiter<S = Signals> {
    watched: Vec<Signal>,
    subscription: S,
    handle: Option<Handle>,
    incoming: Option<Signal>,
    exit: Option<WaitExit>,
    hooks: Vec<Hook>,
    timeout: Duration,
    waited: bool,
}

impl SignalWaiter<Signals> {
    /// Subscribe to `signals` and build a waiter around the OS subscription.
    ///
    /// Must be called from within a Tokio runtime. The subscription stays
    /// registered until [`Handle::close`] is called on [`Self::handle`].
    pub fn new(signals: &[Signal], timeout: Duration, hooks: Vec<Hook>) -> Result<Self, WaiterError> {
        let subscription = subscribe(signals)?;
        let handle = subscription.handle();

        let mut waiter = Self::from_stream(signals.to_vec(), subscription, timeout, hooks);
        waiter.handle = Some(handle);
        Ok(waiter)
    }
}

impl<S> SignalWaiter<S>
where
    S: Stream<Item = i32> + Unpin,
{
    /// Build a waiter around an existing stream of raw signal numbers.
    ///
    /// Values outside `watched` are skipped, as the OS subscription would.
    pub fn from_stream(watched: Vec<Signal>, subscription: S, timeout: Duration, hooks: Vec<Hook>) -> Self {
        Self {
            watched,
            subscription,
            handle: None,
            incoming: None,
            exit: None,
            hooks,
            timeout,
            waited: false,
        }
    }

    /// Wait for a signal, run the hooks, and return once the second signal
    /// arrives, every hook finishes, or the timeout elapses.
    pub async fn wait(&mut self) -> &mut Self {
        if self.waited {
            tracing::warn!("SignalWaiter::wait called more than once, ignoring");
            return self;
        }
        self.waited = true;

        let first = match next_watched(&mut self.subscription, &self.watched).await {
            Some(signal) => signal,
            None => {
                tracing::warn!("Signal subscription closed before any signal arrived");
                return self;
            }
        };
        self.incoming = Some(first);

        tracing::info!(
            signal = %first,
            hooks = self.hooks.len(),
            timeout_ms = self.timeout.as_millis() as u64,
            "Shutdown signal received, running hooks"
        );

        let handles: Vec<JoinHandle<()>> = self.hooks.iter().map(|hook| hook.spawn(first)).collect();
        let hooks_done = join_hooks(handles);
        let deadline = tokio::time::sleep(self.timeout);
        tokio::pin!(hooks_done, deadline);

        tokio::select! {
            biased;

            Some(second) = next_watched(&mut self.subscription, &self.watched) => {
                tracing::warn!(first = %first, signal = %second, "Second signal received, abandoning hooks");
                self.incoming = Some(second);
                self.exit = Some(WaitExit::SecondSignal);
            }
            () = &mut hooks_done => {
                tracing::info!(signal = %first, "All shutdown hooks finished");
                self.exit = Some(WaitExit::HooksFinished);
            }
            () = &mut deadline => {
                tracing::warn!(
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Shutdown hooks did not finish in time, abandoning them"
                );
                self.exit = Some(WaitExit::TimedOut);
            }
        }

        self
    }
}

impl<S> SignalWaiter<S> {
    /// The signal recorded by the last `wait`, if any.
    pub fn signal(&self) -> Option<Signal> {
        self.incoming
    }

    /// `None` until a signal has been recorded, then an error naming it.
    pub fn err(&self) -> Option<SignalError> {
        self.signal().map(|signal| SignalError { signal })
    }

    /// How the last `wait` ended; `None` if no signal was ever received.
    pub fn exit(&self) -> Option<WaitExit> {
        self.exit
    }

    /// Signal kinds this waiter was built for.
    pub fn watched(&self) -> &[Signal] {
        &self.watched
    }

    /// Hook timeout measured from the start of the fan-out.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Handle to the OS subscription, for callers that want to close it.
    ///
    /// `None` for waiters built with [`SignalWaiter::from_stream`].
    pub fn handle(&self) -> Option<&Handle> {
        self.handle.as_ref()
    }
}

/// Next raw signal from `subscription` that belongs to `watched`.
async fn next_watched<S>(subscription: &mut S, watched: &[Signal]) -> Option<Signal>
where
    S: Stream<Item = i32> + Unpin,
{
    while let Some(raw) = subscription.next().await {
        let signal = Signal::from_raw(raw);
        if watched.contains(&signal) {
            return Some(signal);
        }
        tracing::debug!(%signal, "Ignoring unwatched signal");
    }
    None
}

/// Resolves once every hook task has finished, panicked or not.
async fn join_hooks(handles: Vec<JoinHandle<()>>) {
    for (index, result) in join_all(handles).await.into_iter().enumerate() {
        if let Err(e) = result {
            if e.is_panic() {
                tracing::warn!(hook = index, "Shutdown hook panicked");
            } else {
                tracing::debug!(hook = index, error = %e, "Shutdown hook did not complete");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;
    use std::time::Instant;

    #[tokio::test]
    async fn signal_and_err_empty_before_wait() {
        let waiter = SignalWaiter::from_stream(
            vec![Signal::Interrupt],
            stream::pending::<i32>(),
            Duration::from_millis(10),
            Vec::new(),
        );
        assert_eq!(waiter.signal(), None);
        assert!(waiter.err().is_none());
        assert!(waiter.handle().is_none());
        assert_eq!(waiter.watched(), &[Signal::Interrupt]);
    }

    #[tokio::test]
    async fn zero_hooks_returns_promptly() {
        let source = stream::iter(vec![Signal::Interrupt.as_raw()]).chain(stream::pending());
        let mut waiter = SignalWaiter::from_stream(
            vec![Signal::Interrupt],
            source,
            Duration::from_millis(300),
            Vec::new(),
        );

        let start = Instant::now();
        let signal = waiter.wait().await.signal();
        assert!(start.elapsed() < Duration::from_millis(150));
        assert_eq!(signal, Some(Signal::Interrupt));
    }

    #[tokio::test]
    async fn closed_subscription_records_nothing() {
        let mut waiter = SignalWaiter::from_stream(
            vec![Signal::Interrupt],
            stream::empty::<i32>(),
            Duration::from_millis(10),
            Vec::new(),
        );
        assert!(waiter.wait().await.err().is_none());
        assert!(waiter.exit().is_none());
    }

    #[tokio::test]
    async fn second_wait_is_noop() {
        let raws = vec![Signal::Interrupt.as_raw(), Signal::Terminate.as_raw()];
        let mut waiter = SignalWaiter::from_stream(
            vec![Signal::Interrupt, Signal::Terminate],
            stream::iter(raws),
            Duration::from_millis(10),
            vec![Hook::blocking(|_| std::thread::sleep(Duration::from_millis(200)))],
        );

        // The queued SIGTERM wins the race as the second signal.
        assert_eq!(waiter.wait().await.signal(), Some(Signal::Terminate));
        assert_eq!(waiter.exit(), Some(WaitExit::SecondSignal));

        let start = Instant::now();
        assert_eq!(waiter.wait().await.signal(), Some(Signal::Terminate));
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[tokio::test]
    async fn zero_timeout_fires_immediately() {
        let source = stream::iter(vec![Signal::Interrupt.as_raw()]).chain(stream::pending());
        let mut waiter = SignalWaiter::from_stream(
            vec![Signal::Interrupt],
            source,
            Duration::ZERO,
            vec![Hook::future(|_| tokio::time::sleep(Duration::from_secs(5)))],
        );

        let start = Instant::now();
        assert_eq!(waiter.wait().await.signal(), Some(Signal::Interrupt));
        assert!(start.elapsed() < Duration::from_millis(200));
        assert_eq!(waiter.exit(), Some(WaitExit::TimedOut));
    }

    #[tokio::test]
    async fn finished_fanout_beats_due_timeout() {
        let source = stream::iter(vec![Signal::Interrupt.as_raw()]).chain(stream::pending());
        let mut waiter = SignalWaiter::from_stream(vec![Signal::Interrupt], source, Duration::ZERO, Vec::new());

        let start = Instant::now();
        assert_eq!(waiter.wait().await.signal(), Some(Signal::Interrupt));
        assert!(start.elapsed() < Duration::from_millis(100));
        assert_eq!(waiter.exit(), Some(WaitExit::HooksFinished));
    }

    #[tokio::test]
    async fn queued_second_signal_beats_everything() {
        let raws = vec![Signal::Interrupt.as_raw(), Signal::Terminate.as_raw()];
        let source = stream::iter(raws).chain(stream::pending());
        let mut waiter = SignalWaiter::from_stream(
            vec![Signal::Interrupt, Signal::Terminate],
            source,
            Duration::ZERO,
            Vec::new(),
        );

        assert_eq!(waiter.wait().await.signal(), Some(Signal::Terminate));
        assert_eq!(waiter.exit(), Some(WaitExit::SecondSignal));
    }

    #[tokio::test]
    async fn unwatched_signals_are_skipped() {
        let raws = vec![
            Signal::User1.as_raw(),
            Signal::Interrupt.as_raw(),
            Signal::User2.as_raw(),
        ];
        let source = stream::iter(raws).chain(stream::pending());
        let mut waiter = SignalWaiter::from_stream(
            vec![Signal::Interrupt],
            source,
            Duration::from_millis(50),
            vec![Hook::future(|_| tokio::time::sleep(Duration::from_secs(5)))],
        );

        assert_eq!(waiter.wait().await.signal(), Some(Signal::Interrupt));
        assert_eq!(waiter.exit(), Some(WaitExit::TimedOut));
    }
}
