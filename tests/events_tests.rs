// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use fiture_core::services::{follow, EventBus, RunTargetManager, SyncEvent, WeightTargetManager};

mod common;
use common::{day, test_context, test_user};

#[tokio::test]
async fn test_follow_runs_handler_for_matching_event() {
    let bus = EventBus::new(16);
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

    let task = follow(&bus, SyncEvent::RunTargetUpdated, move || {
        let tx = tx.clone();
        async move {
            tx.send(()).unwrap();
        }
    });

    bus.post(SyncEvent::WaterDataUpdated);
    bus.post(SyncEvent::RunTargetUpdated);
    rx.recv().await.unwrap();

    task.abort();
    assert!(task.await.unwrap_err().is_cancelled());
}

#[tokio::test]
async fn test_follow_ends_when_bus_dropped() {
    let bus = EventBus::new(4);
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();

    let task = follow(&bus, SyncEvent::WeightDataUpdated, move || {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    });
    drop(bus);

    tokio::time::timeout(Duration::from_secs(5), task)
        .await
        .expect("listener should stop")
        .unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_listener_repulls_manager_on_event() {
    let (ctx, _store) = test_context();
    let user = test_user();
    let date = day(2024, 1, 1);

    // A view showing the run target, and an unrelated writer
    let view = RunTargetManager::new(&ctx);
    view.fetch(user, date).await.unwrap();
    let writer = RunTargetManager::new(&ctx);
    let weight = WeightTargetManager::new(&ctx);

    let (done_tx, mut done_rx) = tokio::sync::mpsc::unbounded_channel();
    let listener_view = view.clone();
    let task = follow(&ctx.events, SyncEvent::RunTargetUpdated, move || {
        let view = listener_view.clone();
        let done = done_tx.clone();
        async move {
            view.fetch(user, date).await.unwrap();
            done.send(()).unwrap();
        }
    });

    writer.create_or_update(user, 5.0, date).await.unwrap();
    weight.create_or_update(user, 70.0, date).await.unwrap();
    assert!(view.run_target().is_none(), "separate managers do not share state");

    ctx.events.post(SyncEvent::RunTargetUpdated);
    done_rx.recv().await.unwrap();

    assert_eq!(view.run_target().unwrap().target, 5.0);
    task.abort();
}
