// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Body weight manager.

use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::watch;

use crate::db::{tables, to_row, Query, RowStore};
use crate::error::Result;
use crate::models::weight::{WeightEntryInsert, WeightEntryUpdate};
use crate::models::{DayKey, UserId, WeightEntry};
use crate::services::{fetch_rows, history_window, validate_amount, EventBus, SyncEvent};
use crate::time_utils::{format_day, today};
use crate::AppContext;

#[derive(Debug, Clone, PartialEq)]
pub struct WeightState {
    /// Entry for the selected day
    pub entry: Option<WeightEntry>,
    /// Chart history, oldest first; independent of `entry`
    pub history: Vec<WeightEntry>,
    pub selected_date: NaiveDate,
}

#[derive(Clone)]
pub struct WeightTargetManager {
    store: Arc<dyn RowStore>,
    events: EventBus,
    state: Arc<watch::Sender<WeightState>>,
}

impl WeightTargetManager {
    pub fn new(ctx: &AppContext) -> Self {
        let (state, _) = watch::channel(WeightState {
            entry: None,
            history: Vec::new(),
            selected_date: today(),
        });
        Self {
            store: ctx.store.clone(),
            events: ctx.events.clone(),
            state: Arc::new(state),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<WeightState> {
        self.state.subscribe()
    }

    pub fn weight_entry(&self) -> Option<WeightEntry> {
        self.state.borrow().entry.clone()
    }

    pub fn history(&self) -> Vec<WeightEntry> {
        self.state.borrow().history.clone()
    }

    pub fn selected_date(&self) -> NaiveDate {
        self.state.borrow().selected_date
    }

    pub async fn fetch_entry(&self, user_id: UserId, date: NaiveDate) -> Result<()> {
        let query = DayKey::new(user_id, date).query(tables::WEIGHT_ENTRIES);
        let rows: Vec<WeightEntry> = fetch_rows(self.store.as_ref(), &query).await?;
        tracing::debug!(user_id = %user_id, date = %date, found = !rows.is_empty(), "Fetched weight entry");

        self.state.send_modify(|state| {
            state.entry = rows.into_iter().next();
            state.selected_date = date;
        });
        Ok(())
    }

    /// Record the weight for `date`, replacing any earlier value for that day.
    pub async fn create_or_update(&self, user_id: UserId, weight: f64, date: NaiveDate) -> Result<()> {
        validate_amount("weight", weight)?;
        self.fetch_entry(user_id, date).await?;

        if self.weight_entry().is_some() {
            self.update(user_id, weight, Some(date)).await?;
        } else {
            let row = to_row(&WeightEntryInsert {
                user_id,
                date,
                weight,
            })?;
            self.store.insert(tables::WEIGHT_ENTRIES, row).await?;
            tracing::info!(user_id = %user_id, date = %date, weight, "Created weight entry");
            self.fetch_entry(user_id, date).await?;
        }

        self.events.post(SyncEvent::WeightDataUpdated);
        Ok(())
    }

    pub async fn update(&self, user_id: UserId, weight: f64, date: Option<NaiveDate>) -> Result<()> {
        validate_amount("weight", weight)?;
        let date = date.unwrap_or_else(|| self.selected_date());
        let query = DayKey::new(user_id, date).query(tables::WEIGHT_ENTRIES);
        self.store
            .update(&query, to_row(&WeightEntryUpdate { weight })?)
            .await?;
        tracing::info!(user_id = %user_id, date = %date, weight, "Updated weight entry");

        self.fetch_entry(user_id, date).await
    }

    pub async fn delete(&self, user_id: UserId, date: Option<NaiveDate>) -> Result<()> {
        let date = date.unwrap_or_else(|| self.selected_date());
        let query = DayKey::new(user_id, date).query(tables::WEIGHT_ENTRIES);
        self.store.delete(&query).await?;
        tracing::info!(user_id = %user_id, date = %date, "Deleted weight entry");

        self.state.send_modify(|state| state.entry = None);
        Ok(())
    }

    /// Most recent entry on any day. Does not touch the cache.
    pub async fn fetch_latest(&self, user_id: UserId) -> Result<Option<WeightEntry>> {
        let query = Query::from(tables::WEIGHT_ENTRIES)
            .user(user_id)
            .order("date", false)
            .order("created_at", false)
            .limit(1);
        let rows: Vec<WeightEntry> = fetch_rows(self.store.as_ref(), &query).await?;
        Ok(rows.into_iter().next())
    }

    /// Load entries from the trailing `days` into the history cache, oldest first.
    pub async fn fetch_entries(&self, user_id: UserId, days: u32) -> Result<()> {
        let (start, _) = history_window(days)?;
        let query = Query::from(tables::WEIGHT_ENTRIES)
            .user(user_id)
            .gte("date", format_day(start))
            .order("date", true);
        let history: Vec<WeightEntry> = fetch_rows(self.store.as_ref(), &query).await?;
        tracing::debug!(user_id = %user_id, days, count = history.len(), "Fetched weight history");

        self.state.send_modify(|state| state.history = history);
        Ok(())
    }
}
