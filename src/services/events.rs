// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Change notifications for out-of-flow mutations.
//!
//! Events carry no payload. A listener that receives one re-pulls the
//! affected manager for the date it is showing.

use std::future::Future;

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;

/// "Something changed, re-pull" signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncEvent {
    RunTargetUpdated,
    WeightDataUpdated,
    WaterDataUpdated,
    CaloriesDataUpdated,
    TrainingDataUpdated,
}

/// Publish/subscribe bus for [`SyncEvent`]s.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<SyncEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Post an event to every current subscriber.
    pub fn post(&self, event: SyncEvent) {
        match self.tx.send(event) {
            Ok(listeners) => tracing::debug!(?event, listeners, "Posted sync event"),
            Err(_) => tracing::debug!(?event, "Posted sync event with no listeners"),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.tx.subscribe()
    }
}

/// Run `handler` every time `event` is posted.
///
/// If the listener falls behind and misses events, the handler runs once to
/// catch up. The task ends when every handle to the bus is dropped, or when
/// the returned handle is aborted.
pub fn follow<F, Fut>(bus: &EventBus, event: SyncEvent, mut handler: F) -> JoinHandle<()>
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send,
{
    let mut rx = bus.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(received) if received == event => handler().await,
                Ok(_) => {}
                Err(RecvError::Lagged(missed)) => {
                    tracing::warn!(?event, missed, "Sync listener lagged");
                    handler().await;
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}
