//! Shared helpers for waiter integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::{self, BoxStream, StreamExt};
use signalx::{Hook, Signal};
use tokio::sync::mpsc;

/// A hand-driven signal source standing in for OS delivery.
pub fn signal_source() -> (mpsc::UnboundedSender<i32>, BoxStream<'static, i32>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let stream = stream::unfold(rx, |mut rx| async move { rx.recv().await.map(|raw| (raw, rx)) }).boxed();
    (tx, stream)
}

/// Send `signal` after `delay` from a background task.
pub fn send_after(tx: &mpsc::UnboundedSender<i32>, signal: Signal, delay: Duration) {
    let tx = tx.clone();
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let _ = tx.send(signal.as_raw());
    });
}

/// A hook that sleeps for `delay` and then bumps `done`.
pub fn sleeping_hook(delay: Duration, done: Arc<AtomicUsize>) -> Hook {
    Hook::future(move |_| {
        let done = done.clone();
        async move {
            tokio::time::sleep(delay).await;
            done.fetch_add(1, Ordering::SeqCst);
        }
    })
}
