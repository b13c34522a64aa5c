// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Running distance target manager.

use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::watch;

use crate::db::{tables, to_row, RowStore};
use crate::error::Result;
use crate::models::progress::is_achieved;
use crate::models::run::RunTargetInsert;
use crate::models::{DayKey, RunTarget, RunTargetUpdate, UserId};
use crate::services::{fetch_rows, validate_amount, EventBus};
use crate::time_utils::today;
use crate::AppContext;

/// Cached state of a [`RunTargetManager`].
#[derive(Debug, Clone, PartialEq)]
pub struct RunState {
    pub target: Option<RunTarget>,
    pub selected_date: NaiveDate,
}

/// Keeps the running target for one selected day in sync with the store.
#[derive(Clone)]
pub struct RunTargetManager {
    store: Arc<dyn RowStore>,
    events: EventBus,
    state: Arc<watch::Sender<RunState>>,
}

impl RunTargetManager {
    pub fn new(ctx: &AppContext) -> Self {
        let (state, _) = watch::channel(RunState {
            target: None,
            selected_date: today(),
        });
        Self {
            store: ctx.store.clone(),
            events: ctx.events.clone(),
            state: Arc::new(state),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<RunState> {
        self.state.subscribe()
    }

    pub fn run_target(&self) -> Option<RunTarget> {
        self.state.borrow().target.clone()
    }

    pub fn selected_date(&self) -> NaiveDate {
        self.state.borrow().selected_date
    }

    pub fn progress_percentage(&self) -> f64 {
        self.state
            .borrow()
            .target
            .as_ref()
            .map_or(0.0, RunTarget::progress_percentage)
    }

    /// Load the target for `date` into the cache. A missing row is not an error.
    pub async fn fetch(&self, user_id: UserId, date: NaiveDate) -> Result<()> {
        let query = DayKey::new(user_id, date).query(tables::TARGETS_RUN);
        let rows: Vec<RunTarget> = fetch_rows(self.store.as_ref(), &query).await?;
        tracing::debug!(user_id = %user_id, date = %date, found = !rows.is_empty(), "Fetched run target");

        self.state.send_replace(RunState {
            target: rows.into_iter().next(),
            selected_date: date,
        });
        Ok(())
    }

    /// Set the distance goal for `date`, creating the row on first use.
    pub async fn create_or_update(&self, user_id: UserId, target: f64, date: NaiveDate) -> Result<()> {
        validate_amount("target", target)?;
        self.fetch(user_id, date).await?;

        if self.run_target().is_some() {
            return self
                .update(user_id, RunTargetUpdate::target(target), Some(date))
                .await;
        }

        let row = to_row(&RunTargetInsert::new(user_id, date, target))?;
        self.store.insert(tables::TARGETS_RUN, row).await?;
        tracing::info!(user_id = %user_id, date = %date, target, "Created run target");

        self.fetch(user_id, date).await
    }

    /// Apply a partial update to the row for `date` (default: the selected
    /// date). When target or attempt changes, `is_achieved` is recomputed
    /// against a freshly fetched row and sent in the same write.
    pub async fn update(
        &self,
        user_id: UserId,
        mut changes: RunTargetUpdate,
        date: Option<NaiveDate>,
    ) -> Result<()> {
        let date = date.unwrap_or_else(|| self.selected_date());
        if let Some(target) = changes.target {
            validate_amount("target", target)?;
        }
        if let Some(attempt) = changes.attempt {
            validate_amount("attempt", attempt)?;
        }

        if changes.touches_progress() {
            self.fetch(user_id, date).await?;
            let current = self.run_target();
            let target = changes.target.or(current.as_ref().map(|r| r.target));
            let attempt = changes.attempt.or(current.as_ref().map(|r| r.attempt));
            changes.is_achieved = Some(is_achieved(
                attempt.unwrap_or(0.0),
                target.unwrap_or(0.0),
            ));
        }

        let patch = to_row(&changes)?;
        if patch.is_empty() {
            tracing::debug!(user_id = %user_id, date = %date, "Empty run target update");
            return self.fetch(user_id, date).await;
        }

        let query = DayKey::new(user_id, date).query(tables::TARGETS_RUN);
        self.store.update(&query, patch).await?;
        tracing::info!(user_id = %user_id, date = %date, ?changes, "Updated run target");

        self.fetch(user_id, date).await
    }

    /// Delete the row for `date` (default: the selected date) and clear the cache.
    pub async fn delete(&self, user_id: UserId, date: Option<NaiveDate>) -> Result<()> {
        let date = date.unwrap_or_else(|| self.selected_date());
        let query = DayKey::new(user_id, date).query(tables::TARGETS_RUN);
        self.store.delete(&query).await?;
        tracing::info!(user_id = %user_id, date = %date, "Deleted run target");

        self.state.send_modify(|state| state.target = None);
        Ok(())
    }

    pub(crate) fn events(&self) -> &EventBus {
        &self.events
    }
}
