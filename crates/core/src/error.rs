// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for configuration misuse and operation failures

use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Misuse of the configuration surface: a programmer error, reported
/// loudly at the call site rather than swallowed.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A mutating call arrived after `start()` sealed the lifecycle.
    #[error("lifecycle is sealed: cannot {operation} after start")]
    Sealed { operation: &'static str },

    /// `start()` was invoked a second time.
    #[error("lifecycle already started")]
    AlreadyStarted,
}

/// Opaque error produced by a handler or dependency.
///
/// The coordinator never inspects, wraps, or retries these; the first one
/// observed within a phase becomes the lifecycle's terminal outcome and is
/// replayed identically to every subscriber. Cloning is cheap: the
/// underlying error is shared.
#[derive(Clone)]
pub struct OpError(Arc<dyn std::error::Error + Send + Sync>);

impl OpError {
    /// Wrap a concrete error.
    pub fn new<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self(Arc::new(err))
    }

    /// Build an error from a plain message.
    pub fn msg(msg: impl Into<String>) -> Self {
        Self(Arc::new(Message(msg.into())))
    }
}

#[derive(Debug, Error)]
#[error("{0}")]
struct Message(String);

impl fmt::Display for OpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::Debug for OpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl std::error::Error for OpError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}
