// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Completion sources
//!
//! [`Completion`] is the common currency between lifecycles, the fan-in
//! combinator, and the external adapter: a future that resolves exactly
//! once with success or an opaque error.

use crate::error::OpError;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

/// A pending completion signal.
///
/// Lazy like any future: no work happens until it is polled. Dropping an
/// unpolled completion abandons the subscription it represents without
/// side effects.
pub struct Completion {
    fut: Pin<Box<dyn Future<Output = Result<(), OpError>> + Send>>,
}

impl Completion {
    /// Wrap a future as a completion source.
    pub fn new<F>(fut: F) -> Self
    where
        F: Future<Output = Result<(), OpError>> + Send + 'static,
    {
        Self { fut: Box::pin(fut) }
    }

    /// A completion that is already resolved.
    pub fn resolved(outcome: Result<(), OpError>) -> Self {
        Self::new(std::future::ready(outcome))
    }
}

impl Future for Completion {
    type Output = Result<(), OpError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.fut.as_mut().poll(cx)
    }
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Completion")
    }
}

/// One-off bridge from a callback-style signal to a pending dependency.
///
/// Created by [`Lifecycle::pending`](crate::Lifecycle::pending), which
/// registers an in-flight anonymous dependency against the target; that
/// lifecycle's dependency phase will not resolve until this handle is
/// consumed. The methods take `self`, so the signal can only fire once.
///
/// Dropping the handle unresolved resolves the dependency as an error
/// rather than stalling the target forever.
pub struct PendingCompletion {
    tx: oneshot::Sender<Result<(), OpError>>,
}

impl fmt::Debug for PendingCompletion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PendingCompletion")
    }
}

impl PendingCompletion {
    pub(crate) fn channel() -> (Self, Completion) {
        let (tx, rx) = oneshot::channel();
        let completion = Completion::new(async move {
            match rx.await {
                Ok(outcome) => outcome,
                Err(_) => Err(OpError::msg("completion handle dropped before resolving")),
            }
        });
        (Self { tx }, completion)
    }

    /// Resolve the pending dependency with the given outcome.
    pub fn resolve(self, outcome: Result<(), OpError>) {
        // The receiver is gone only if the target lifecycle was dropped;
        // there is nothing left to notify.
        let _ = self.tx.send(outcome);
    }

    /// Resolve the pending dependency as success.
    pub fn succeed(self) {
        self.resolve(Ok(()));
    }

    /// Resolve the pending dependency as the given error.
    pub fn fail(self, err: OpError) {
        self.resolve(Err(err));
    }
}

#[cfg(test)]
#[path = "completion_tests.rs"]
mod tests;
