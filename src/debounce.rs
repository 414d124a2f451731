//! Debounced search input.
//!
//! Keystrokes arrive on a `watch` channel; only a value that stays
//! unchanged for the whole delay is forwarded. Repeating the last emitted
//! value is suppressed.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

const DEBOUNCE_QUEUE_CAPACITY: usize = 4;

/// Forward settled values of `input` until `cancel` fires or the input
/// sender is dropped. A pending value is flushed when the sender drops.
pub fn debounce_search(
    mut input: watch::Receiver<String>,
    delay: Duration,
    cancel: CancellationToken,
) -> (JoinHandle<()>, mpsc::Receiver<String>) {
    let (tx, rx) = mpsc::channel(DEBOUNCE_QUEUE_CAPACITY);
    let mut last_emitted = input.borrow_and_update().clone();

    let handle = tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => return,
                changed = input.changed() => {
                    if changed.is_err() {
                        return;
                    }
                }
            }

            let mut closed = false;
            loop {
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => return,
                    changed = input.changed() => {
                        if changed.is_err() {
                            closed = true;
                            break;
                        }
                    }
                    () = tokio::time::sleep(delay) => break,
                }
            }

            let value = input.borrow_and_update().clone();
            if value != last_emitted {
                debug!(query = %value, "search settled");
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => return,
                    sent = tx.send(value.clone()) => {
                        if sent.is_err() {
                            return;
                        }
                    }
                }
                last_emitted = value;
            }
            if closed {
                return;
            }
        }
    });

    (handle, rx)
}

#[cfg(test)]
#[path = "debounce_test.rs"]
mod tests;
