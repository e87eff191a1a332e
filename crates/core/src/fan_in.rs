// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Concurrent fan-in of completion sources

use crate::completion::Completion;
use crate::error::OpError;
use tokio::sync::mpsc;
use tracing::debug;

/// Merge a fixed set of completion sources into one.
///
/// Every source is spawned on its own task as soon as the returned future
/// is polled; nothing is serialized and no ordering holds among them. The
/// merge succeeds once all sources have succeeded (an empty set succeeds
/// immediately) and fails with the first error observed.
///
/// An early failure does not cancel the remaining sources: they keep
/// running detached and their eventual outcomes are discarded.
///
/// Must be awaited within a tokio runtime.
pub async fn fan_in<I>(sources: I) -> Result<(), OpError>
where
    I: IntoIterator<Item = Completion>,
{
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut pending = 0usize;
    for source in sources {
        let tx = tx.clone();
        tokio::spawn(async move {
            // Receiver gone means the merge already resolved; the result
            // of this straggler is discarded.
            let _ = tx.send(source.await);
        });
        pending += 1;
    }
    drop(tx);

    while pending > 0 {
        match rx.recv().await {
            Some(Ok(())) => pending -= 1,
            Some(Err(err)) => {
                if pending > 1 {
                    debug!(
                        remaining = pending - 1,
                        "fan-in failed; sibling outcomes will be discarded"
                    );
                }
                return Err(err);
            }
            // The channel can only close early if a source's task died
            // without reporting, i.e. it panicked.
            None => return Err(OpError::msg("completion source panicked")),
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "fan_in_tests.rs"]
mod tests;
