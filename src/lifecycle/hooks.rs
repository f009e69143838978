//! Cleanup hooks run after the first shutdown signal.
//!
//! # Design Decisions
//! - Each hook runs in its own Tokio task, so a panic stays inside that task
//! - Blocking hooks get a detached OS thread, async hooks a Tokio task
//! - A blocking hook never holds up runtime shutdown once it is abandoned
//! - Hooks get an owned copy of the signal, never a reference into the waiter

use std::fmt;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;

use futures_util::future::{BoxFuture, FutureExt};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::lifecycle::signals::Signal;

type BlockingFn = dyn Fn(Signal) + Send + Sync;
type AsyncFn = dyn Fn(Signal) -> BoxFuture<'static, ()> + Send + Sync;

/// A cleanup callback invoked with the signal that started shutdown.
#[derive(Clone)]
pub enum Hook {
    /// Synchronous callback, free to block (flush files, join threads).
    Blocking(Arc<BlockingFn>),
    /// Asynchronous callback.
    Async(Arc<AsyncFn>),
}

impl Hook {
    /// Wrap a synchronous, possibly blocking callback.
    pub fn blocking<F>(f: F) -> Self
    where
        F: Fn(Signal) + Send + Sync + 'static,
    {
        Hook::Blocking(Arc::new(f))
    }

    /// Wrap an async callback.
    pub fn future<F, Fut>(f: F) -> Self
    where
        F: Fn(Signal) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Hook::Async(Arc::new(move |signal| f(signal).boxed()))
    }

    /// Start the hook on the current runtime.
    ///
    /// Dropping the returned handle detaches the hook; it keeps running.
    /// A panic inside the hook surfaces as a panicked `JoinError`.
    pub(crate) fn spawn(&self, signal: Signal) -> JoinHandle<()> {
        match self {
            Hook::Blocking(f) => spawn_detached(Arc::clone(f), signal),
            Hook::Async(f) => tokio::spawn(f(signal)),
        }
    }
}

/// Run a blocking hook on its own thread and relay the result through a
/// oneshot, so dropping the runtime does not wait for the thread.
fn spawn_detached(f: Arc<BlockingFn>, signal: Signal) -> JoinHandle<()> {
    let (tx, rx) = oneshot::channel();

    let spawned = thread::Builder::new()
        .name("signalx-hook".to_string())
        .spawn(move || {
            let result = panic::catch_unwind(AssertUnwindSafe(|| f(signal)));
            let _ = tx.send(result);
        });

    if let Err(e) = spawned {
        tracing::error!(error = %e, "Failed to start thread for shutdown hook");
    }

    tokio::spawn(async move {
        match rx.await {
            Ok(Ok(())) => {}
            Ok(Err(payload)) => panic::resume_unwind(payload),
            // Thread never started; the sender was dropped with the closure.
            Err(_) => {}
        }
    })
}

impl fmt::Debug for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hook::Blocking(_) => f.write_str("Hook::Blocking"),
            Hook::Async(_) => f.write_str("Hook::Async"),
        }
    }
}
