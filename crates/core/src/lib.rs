// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! kickoff-core: readiness coordination for startup-style sequencing
//!
//! This crate provides:
//! - A [`Lifecycle`] coordinator: declare dependencies and concurrent
//!   units of work, start exactly once, and let any number of subscribers
//!   observe the single cached terminal outcome
//! - A concurrent [`fan_in`] combinator (all-succeed, first-error-wins)
//! - A memoized terminal-outcome cache ([`CachedOutcome`])
//! - A one-off external-completion adapter ([`PendingCompletion`])
//!
//! Deliberately out of scope: cancellation, timeouts, retries, and cycle
//! detection. Plain dependencies are never auto-started, so a dependency
//! cycle (or a forgotten `start()`) deadlocks; bounding waits is the
//! caller's business.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod cache;
pub mod completion;
pub mod error;
pub mod fan_in;
pub mod lifecycle;
pub mod ops;
pub mod readiness;

// Re-exports
pub use cache::CachedOutcome;
pub use completion::{Completion, PendingCompletion};
pub use error::{ConfigError, OpError};
pub use fan_in::fan_in;
pub use lifecycle::Lifecycle;
pub use readiness::Readiness;

// Re-export the free-function surface
pub use ops::{
    create, depend_on, during, during_detached, handle, pending, readiness, run, start,
};
