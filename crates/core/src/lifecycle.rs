// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lifecycle coordinator
//!
//! A [`Lifecycle`] represents work that must finish before dependents may
//! proceed. Configuration (dependencies, handlers, children) is open until
//! [`Lifecycle::start`] seals it; the resolution protocol then runs at
//! most once and its terminal outcome is cached for every subscriber.

use crate::cache::CachedOutcome;
use crate::completion::{Completion, PendingCompletion};
use crate::error::{ConfigError, OpError};
use crate::fan_in::fan_in;
use crate::readiness::Readiness;
use std::future::Future;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;
use tracing::{debug, trace};

/// Everything registered before start.
struct Setup {
    dependencies: Vec<Completion>,
    handlers: Vec<Completion>,
    children: Vec<Lifecycle>,
    trigger: oneshot::Sender<Protocol>,
}

/// The work handed over to the resolution protocol by `start()`.
struct Protocol {
    dependencies: Vec<Completion>,
    handlers: Vec<Completion>,
}

struct Inner {
    /// `Some` while configuration is open; taken exactly once by `start()`.
    setup: Mutex<Option<Setup>>,
    outcome: CachedOutcome,
}

/// Readiness coordinator for startup-style sequencing.
///
/// Dependencies declared with [`depend_on`](Lifecycle::depend_on) must all
/// succeed before the units of work registered with
/// [`handle`](Lifecycle::handle) run; handlers run concurrently with one
/// another, and the first error observed in either phase becomes the
/// permanent outcome. Subscribers attached at any time, even long after
/// resolution, observe the one cached result.
///
/// Cloning returns another handle to the same lifecycle.
///
/// Plain dependencies are never auto-started: whoever owns a dependency
/// must call its own `start()`. A dependency graph with a cycle therefore
/// deadlocks; detecting that is deliberately left to callers, as are
/// cancellation, timeouts, and retries.
#[derive(Clone)]
pub struct Lifecycle {
    inner: Arc<Inner>,
}

impl Lifecycle {
    /// Create an unstarted lifecycle with open configuration.
    pub fn create() -> Self {
        let (trigger, armed) = oneshot::channel::<Protocol>();
        let outcome = CachedOutcome::new(async move {
            let protocol = match armed.await {
                Ok(protocol) => protocol,
                // Every handle dropped without start(): this lifecycle
                // can never resolve.
                Err(_) => return std::future::pending().await,
            };

            let dependencies = protocol.dependencies.len();
            if let Err(err) = fan_in(protocol.dependencies).await {
                debug!(%err, "dependency failed; handlers will not run");
                return Err(err);
            }
            trace!(dependencies, "dependency phase complete");

            let handlers = protocol.handlers.len();
            if let Err(err) = fan_in(protocol.handlers).await {
                debug!(%err, "handler failed");
                return Err(err);
            }
            trace!(handlers, "handler phase complete");
            Ok(())
        });

        Self {
            inner: Arc::new(Inner {
                setup: Mutex::new(Some(Setup {
                    dependencies: Vec::new(),
                    handlers: Vec::new(),
                    children: Vec::new(),
                    trigger,
                })),
                outcome,
            }),
        }
    }

    fn configure<R>(
        &self,
        operation: &'static str,
        configure: impl FnOnce(&mut Setup) -> R,
    ) -> Result<R, ConfigError> {
        let mut setup = self.inner.setup.lock().unwrap_or_else(|e| e.into_inner());
        match setup.as_mut() {
            Some(setup) => Ok(configure(setup)),
            None => Err(ConfigError::Sealed { operation }),
        }
    }

    /// Require `dep` to succeed before this lifecycle's handlers run.
    ///
    /// The dependency is not started here; whoever owns it must call its
    /// `start()`. If it resolves with an error, that error becomes this
    /// lifecycle's terminal outcome and its handlers never run.
    pub fn depend_on(&self, dep: &Lifecycle) -> Result<(), ConfigError> {
        self.depend_on_completion(dep.completion())
    }

    /// [`depend_on`](Lifecycle::depend_on) for a batch of lifecycles.
    pub fn depend_on_each<'a, I>(&self, deps: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = &'a Lifecycle>,
    {
        let completions: Vec<_> = deps.into_iter().map(Lifecycle::completion).collect();
        self.configure("depend_on", |setup| {
            setup.dependencies.extend(completions);
        })
    }

    /// Admit any completion source as a dependency.
    pub fn depend_on_completion(&self, completion: Completion) -> Result<(), ConfigError> {
        self.configure("depend_on", |setup| {
            setup.dependencies.push(completion);
        })
    }

    /// Register a unit of work for the handler phase.
    ///
    /// All handlers start at the same instant once every dependency has
    /// succeeded, and run concurrently; the future's output is the
    /// completion signal. Handlers are never retried. An error elsewhere
    /// does not cancel a handler already in flight: it runs to completion
    /// and its outcome is discarded.
    pub fn handle<F>(&self, unit: F) -> Result<(), ConfigError>
    where
        F: Future<Output = Result<(), OpError>> + Send + 'static,
    {
        let unit = Completion::new(unit);
        self.configure("handle", |setup| {
            setup.handlers.push(unit);
        })
    }

    /// Create a child lifecycle that is started alongside this one and
    /// awaited as a dependency.
    pub fn during(&self) -> Result<Lifecycle, ConfigError> {
        self.child("during", true)
    }

    /// Create a child lifecycle that is started alongside this one but
    /// not waited for: this lifecycle's outcome is independent of the
    /// child's.
    pub fn during_detached(&self) -> Result<Lifecycle, ConfigError> {
        self.child("during_detached", false)
    }

    fn child(&self, operation: &'static str, linked: bool) -> Result<Lifecycle, ConfigError> {
        let child = Lifecycle::create();
        let completion = child.completion();
        let registered = child.clone();
        self.configure(operation, move |setup| {
            setup.children.push(registered);
            if linked {
                setup.dependencies.push(completion);
            }
        })?;
        Ok(child)
    }

    /// Register an anonymous in-flight dependency and return the one-off
    /// handle that resolves it (the external completion adapter).
    ///
    /// The dependency phase will not resolve until the handle is consumed;
    /// see [`PendingCompletion`].
    pub fn pending(&self) -> Result<PendingCompletion, ConfigError> {
        let (handle, completion) = PendingCompletion::channel();
        self.configure("pending", |setup| {
            setup.dependencies.push(completion);
        })?;
        Ok(handle)
    }

    /// Seal configuration and drive the resolution protocol.
    ///
    /// Children (linked or not) are started first, then the dependency
    /// phase begins. The protocol runs at most once no matter how many
    /// callers consume the returned handle or subscribe later. Must be
    /// called within a tokio runtime.
    ///
    /// Fails with [`ConfigError::AlreadyStarted`] on a second call. A
    /// child that was already started manually surfaces the same error;
    /// that is a programmer error, and the lifecycle is left sealed.
    pub fn start(&self) -> Result<Completion, ConfigError> {
        let setup = {
            let mut slot = self.inner.setup.lock().unwrap_or_else(|e| e.into_inner());
            slot.take().ok_or(ConfigError::AlreadyStarted)?
        };

        debug!(
            dependencies = setup.dependencies.len(),
            handlers = setup.handlers.len(),
            children = setup.children.len(),
            "lifecycle started"
        );

        for child in &setup.children {
            child.start()?;
        }

        // The receiver lives inside the protocol future.
        let _ = setup.trigger.send(Protocol {
            dependencies: setup.dependencies,
            handlers: setup.handlers,
        });

        // Drive the protocol even if no one ever subscribes.
        drop(self.inner.outcome.subscribe());

        Ok(self.completion())
    }

    /// Subscription handle for the terminal outcome.
    ///
    /// Lazy until polled; valid before start, during resolution, or after
    /// the terminal state, and always yields the one cached outcome
    /// without re-running anything.
    pub fn completion(&self) -> Completion {
        let outcome = self.inner.outcome.clone();
        Completion::new(async move { outcome.subscribe().await })
    }

    /// Wait for the terminal outcome.
    pub async fn wait(&self) -> Result<(), OpError> {
        self.completion().await
    }

    /// Invoke `callback` with the terminal outcome from a spawned task.
    pub fn subscribe<F>(&self, callback: F)
    where
        F: FnOnce(Result<(), OpError>) + Send + 'static,
    {
        let completion = self.completion();
        tokio::spawn(async move { callback(completion.await) });
    }

    /// Tri-state snapshot of this lifecycle's progress. The error value
    /// itself is only delivered through subscription.
    pub fn readiness(&self) -> Readiness {
        self.inner.outcome.readiness()
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::create()
    }
}

impl std::fmt::Debug for Lifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Lifecycle({})", self.readiness())
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
