//! Debounced propagation of rapidly changing values.
//!
//! [`DebounceState`] is the pure state machine; [`Debouncer`] drives it on a
//! tokio task and forwards settled values to an emit callback.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::debug;

use super::scope::ScopeToken;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebounceState<T> {
    Idle,
    Pending { value: T, deadline: Instant },
}

impl<T> Default for DebounceState<T> {
    fn default() -> Self {
        DebounceState::Idle
    }
}

impl<T> DebounceState<T> {
    /// New input: replaces any pending value and resets the deadline.
    pub fn observe(&mut self, value: T, now: Instant, delay: Duration) {
        *self = DebounceState::Pending {
            value,
            deadline: now + delay,
        };
    }

    pub fn deadline(&self) -> Option<Instant> {
        match self {
            DebounceState::Idle => None,
            DebounceState::Pending { deadline, .. } => Some(*deadline),
        }
    }

    /// Emits the pending value once its deadline has passed.
    pub fn fire(&mut self, now: Instant) -> Option<T> {
        match self.deadline() {
            Some(deadline) if now >= deadline => self.cancel(),
            _ => None,
        }
    }

    /// Drops any pending value and returns to idle.
    pub fn cancel(&mut self) -> Option<T> {
        match std::mem::take(self) {
            DebounceState::Idle => None,
            DebounceState::Pending { value, .. } => Some(value),
        }
    }
}

/// Forwards the last value of every quiet window to `emit`.
///
/// Emission always happens on the driver task, so even a zero delay never
/// propagates inside `observe`. Dropping the debouncer aborts the driver and
/// discards whatever is pending.
pub struct Debouncer<T> {
    tx: mpsc::UnboundedSender<T>,
    task: JoinHandle<()>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn spawn<F>(delay: Duration, scope: ScopeToken, emit: F) -> Self
    where
        F: FnMut(T) + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(rx, delay, scope, emit));
        Self { tx, task }
    }

    pub fn observe(&self, value: T) {
        if self.tx.send(value).is_err() {
            debug!("debouncer already stopped, dropping value");
        }
    }

    /// Ends the driver; a pending value is never emitted.
    pub fn cancel(self) {
        drop(self);
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run<T, F>(mut rx: mpsc::UnboundedReceiver<T>, delay: Duration, scope: ScopeToken, mut emit: F)
where
    F: FnMut(T),
{
    let mut state = DebounceState::Idle;

    loop {
        match state.deadline() {
            None => match rx.recv().await {
                Some(value) => state.observe(value, Instant::now(), delay),
                None => break,
            },
            Some(deadline) => {
                tokio::select! {
                    // Queued inputs supersede an expired deadline.
                    biased;
                    received = rx.recv() => match received {
                        Some(value) => state.observe(value, Instant::now(), delay),
                        None => {
                            state.cancel();
                            break;
                        }
                    },
                    _ = sleep_until(deadline) => {
                        if let Some(value) = state.fire(Instant::now()) {
                            if !scope.is_alive() {
                                debug!("scope ended before debounce fired, discarding value");
                                break;
                            }
                            emit(value);
                        }
                    }
                }
            }
        }
    }
}
