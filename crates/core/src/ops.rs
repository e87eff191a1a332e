// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Free-function mirror of the [`Lifecycle`] method surface
//!
//! Convenience forms for point-free composition; each delegates to the
//! method of the same name.

use crate::completion::{Completion, PendingCompletion};
use crate::error::{ConfigError, OpError};
use crate::lifecycle::Lifecycle;
use crate::readiness::Readiness;
use std::future::Future;

/// Create an unstarted lifecycle.
pub fn create() -> Lifecycle {
    Lifecycle::create()
}

/// Require `dep` to succeed before `lifecycle`'s handlers run.
pub fn depend_on(lifecycle: &Lifecycle, dep: &Lifecycle) -> Result<(), ConfigError> {
    lifecycle.depend_on(dep)
}

/// Register a unit of work for `lifecycle`'s handler phase.
pub fn handle<F>(lifecycle: &Lifecycle, unit: F) -> Result<(), ConfigError>
where
    F: Future<Output = Result<(), OpError>> + Send + 'static,
{
    lifecycle.handle(unit)
}

/// Create a linked child started alongside `lifecycle`.
pub fn during(lifecycle: &Lifecycle) -> Result<Lifecycle, ConfigError> {
    lifecycle.during()
}

/// Create a detached child started alongside `lifecycle`.
pub fn during_detached(lifecycle: &Lifecycle) -> Result<Lifecycle, ConfigError> {
    lifecycle.during_detached()
}

/// Seal configuration and drive `lifecycle`'s resolution protocol.
pub fn start(lifecycle: &Lifecycle) -> Result<Completion, ConfigError> {
    lifecycle.start()
}

/// Tri-state snapshot of `lifecycle`'s progress.
pub fn readiness(lifecycle: &Lifecycle) -> Readiness {
    lifecycle.readiness()
}

/// Invoke `callback` with `lifecycle`'s terminal outcome.
pub fn run<F>(lifecycle: &Lifecycle, callback: F)
where
    F: FnOnce(Result<(), OpError>) + Send + 'static,
{
    lifecycle.subscribe(callback);
}

/// Register an in-flight one-off dependency against `lifecycle` and
/// return its completion handle.
pub fn pending(lifecycle: &Lifecycle) -> Result<PendingCompletion, ConfigError> {
    lifecycle.pending()
}

#[cfg(test)]
#[path = "ops_tests.rs"]
mod tests;
