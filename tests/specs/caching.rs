//! At-most-once execution specs
//!
//! Handlers run exactly once over a lifecycle's entire existence, and
//! every subscriber observes the one cached outcome, no matter when it
//! attached.

use crate::prelude::*;
use kickoff_core::{Lifecycle, OpError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::time::sleep;

#[tokio::test(start_paused = true)]
async fn handlers_run_once_with_subscribers_at_every_stage() {
    let lifecycle = Lifecycle::create();
    let runs = Arc::new(AtomicUsize::new(0));
    let counted = Arc::clone(&runs);
    lifecycle
        .handle(async move {
            counted.fetch_add(1, Ordering::SeqCst);
            sleep(ms(10)).await;
            Ok(())
        })
        .unwrap();

    // Before start.
    let early = tokio::spawn(lifecycle.completion());

    let started = lifecycle.start().unwrap();

    // Mid-resolution.
    let mid = tokio::spawn(lifecycle.completion());

    started.await.unwrap();

    // After the terminal state.
    let late = lifecycle.wait().await;

    assert!(early.await.unwrap().is_ok());
    assert!(mid.await.unwrap().is_ok());
    assert!(late.is_ok());
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn every_subscriber_observes_the_same_error() {
    let lifecycle = Lifecycle::create();
    failing_handler(&lifecycle, "validation failed", ms(10));

    let early = tokio::spawn(lifecycle.completion());
    let started = lifecycle.start().unwrap();
    let mid = tokio::spawn(lifecycle.completion());

    assert_eq!(
        started.await.unwrap_err().to_string(),
        "validation failed"
    );
    assert_eq!(
        early.await.unwrap().unwrap_err().to_string(),
        "validation failed"
    );
    assert_eq!(
        mid.await.unwrap().unwrap_err().to_string(),
        "validation failed"
    );
    assert_eq!(
        lifecycle.wait().await.unwrap_err().to_string(),
        "validation failed"
    );
}

#[tokio::test(start_paused = true)]
async fn repeated_waits_replay_the_cached_outcome() {
    let lifecycle = Lifecycle::create();
    let runs = Arc::new(AtomicUsize::new(0));
    let counted = Arc::clone(&runs);
    lifecycle
        .handle(async move {
            counted.fetch_add(1, Ordering::SeqCst);
            Ok::<_, OpError>(())
        })
        .unwrap();

    let started = lifecycle.start().unwrap();
    started.await.unwrap();

    // Waiting again replays the cached outcome without a second run.
    lifecycle.wait().await.unwrap();
    lifecycle.wait().await.unwrap();
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}
