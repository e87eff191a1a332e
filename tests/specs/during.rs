//! Child lifecycle (`during`) specs
//!
//! Children are started in lockstep with their parent's `start()`;
//! whether the parent waits for one is solely its linkage.

use crate::prelude::*;
use kickoff_core::{Lifecycle, Readiness};
use tokio::time::Instant;

#[tokio::test(start_paused = true)]
async fn linked_child_gates_the_parents_handlers() {
    let recorder = Recorder::new();
    let parent = Lifecycle::create();
    let child = parent.during().unwrap();
    timed_handler(&child, &recorder, "child", ms(15));
    timed_handler(&parent, &recorder, "parent", ms(5));

    let started_at = Instant::now();
    parent.start().unwrap().await.unwrap();

    assert_eq!(started_at.elapsed(), ms(20));
    assert_eq!(
        recorder.entries(),
        vec!["child-start", "child-end", "parent-start", "parent-end"]
    );
}

#[tokio::test(start_paused = true)]
async fn detached_child_runs_alongside_without_gating() {
    let recorder = Recorder::new();
    let parent = Lifecycle::create();
    let child = parent.during_detached().unwrap();
    timed_handler(&child, &recorder, "child", ms(15));
    timed_handler(&parent, &recorder, "parent", ms(5));

    let started_at = Instant::now();
    parent.start().unwrap().await.unwrap();

    // The parent resolved without waiting for the child...
    assert_eq!(started_at.elapsed(), ms(5));
    assert_eq!(
        recorder.entries(),
        vec!["child-start", "parent-start", "parent-end"]
    );

    // ...which was nonetheless started with it and finishes on its own.
    child.wait().await.unwrap();
    assert_eq!(started_at.elapsed(), ms(15));
    assert_eq!(
        recorder.entries(),
        vec!["child-start", "parent-start", "parent-end", "child-end"]
    );
}

#[tokio::test(start_paused = true)]
async fn detached_child_failure_leaves_the_parent_ready() {
    let parent = Lifecycle::create();
    let child = parent.during_detached().unwrap();
    failing_handler(&child, "side failure", ms(10));
    timed_handler(&parent, &Recorder::new(), "parent", ms(5));

    parent.start().unwrap().await.unwrap();

    assert_eq!(parent.readiness(), Readiness::Ready);
    assert_eq!(child.wait().await.unwrap_err().to_string(), "side failure");
    assert_eq!(child.readiness(), Readiness::Failed);
}
