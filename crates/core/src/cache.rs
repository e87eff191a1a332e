// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Memoized terminal-outcome cache
//!
//! Wraps an asynchronous producer so its side effects run at most once per
//! process lifetime. Every subscriber, whether it arrives before, during,
//! or after the run, observes the single cached success or error.

use crate::completion::Completion;
use crate::error::OpError;
use crate::readiness::Readiness;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;
use tracing::debug;

type Outcome = Result<(), OpError>;

enum State {
    /// Producer not yet triggered.
    Idle(Completion),
    /// Producer in flight; waiters to notify once it finishes.
    Running(Vec<oneshot::Sender<Outcome>>),
    /// Terminal outcome, replayed to every future subscriber.
    Done(Outcome),
}

/// Memoizes the terminal outcome of an asynchronous producer.
///
/// The first subscription triggers the producer exactly once; concurrent
/// and late subscriptions receive the same cached outcome without running
/// it again. The producer's success value is discarded: only
/// success-or-error is kept. A producer that panics terminates the cache
/// with an error instead of stranding its waiters.
///
/// Cloning shares the underlying state. Subscribing requires a running
/// tokio runtime, since the producer is driven on a spawned task.
pub struct CachedOutcome {
    state: Arc<Mutex<State>>,
}

impl CachedOutcome {
    /// Wrap `producer`; it will not run until the first subscription.
    pub fn new<T, F>(producer: F) -> Self
    where
        T: Send + 'static,
        F: Future<Output = Result<T, OpError>> + Send + 'static,
    {
        let discarding = Completion::new(async move { producer.await.map(|_| ()) });
        Self {
            state: Arc::new(Mutex::new(State::Idle(discarding))),
        }
    }

    /// Subscribe to the terminal outcome.
    pub fn subscribe(&self) -> Completion {
        let producer;
        let waiter;
        {
            let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
            match std::mem::replace(&mut *state, State::Running(Vec::new())) {
                State::Done(outcome) => {
                    *state = State::Done(outcome.clone());
                    return Completion::resolved(outcome);
                }
                State::Running(mut waiters) => {
                    let (tx, rx) = oneshot::channel();
                    waiters.push(tx);
                    *state = State::Running(waiters);
                    producer = None;
                    waiter = rx;
                }
                State::Idle(pending) => {
                    let (tx, rx) = oneshot::channel();
                    *state = State::Running(vec![tx]);
                    producer = Some(pending);
                    waiter = rx;
                }
            }
        }

        if let Some(producer) = producer {
            self.drive(producer);
        }

        Completion::new(async move {
            waiter
                .await
                .unwrap_or_else(|_| Err(OpError::msg("terminal outcome never delivered")))
        })
    }

    /// Snapshot of the cached outcome. Never reports a transient state as
    /// terminal.
    pub fn readiness(&self) -> Readiness {
        match &*self.state.lock().unwrap_or_else(|e| e.into_inner()) {
            State::Done(Ok(())) => Readiness::Ready,
            State::Done(Err(_)) => Readiness::Failed,
            State::Idle(_) | State::Running(_) => Readiness::NotReady,
        }
    }

    fn drive(&self, producer: Completion) {
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            // The producer runs on its own task so that a panic inside it
            // surfaces here as a JoinError and still yields an outcome.
            let outcome = match tokio::spawn(producer).await {
                Ok(outcome) => outcome,
                Err(join) => Err(OpError::msg(format!("producer panicked: {join}"))),
            };

            let waiters = {
                let mut state = state.lock().unwrap_or_else(|e| e.into_inner());
                match std::mem::replace(&mut *state, State::Done(outcome.clone())) {
                    State::Running(waiters) => waiters,
                    // Only the driver moves out of Running.
                    State::Idle(_) | State::Done(_) => Vec::new(),
                }
            };

            debug!(
                ok = outcome.is_ok(),
                waiters = waiters.len(),
                "terminal outcome cached"
            );
            for waiter in waiters {
                let _ = waiter.send(outcome.clone());
            }
        });
    }
}

impl Clone for CachedOutcome {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl fmt::Debug for CachedOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CachedOutcome({})", self.readiness())
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
