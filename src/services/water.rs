// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Water intake manager.
//!
//! One accumulator row per user and day, written with a native upsert on
//! `(user_id, date)`.

use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::watch;

use crate::db::{tables, to_row, Query, RowStore};
use crate::error::Result;
use crate::models::progress::{dense_daily_series, DailyTotal};
use crate::models::water::{WaterEntryUpsert, WATER_CONFLICT_KEY};
use crate::models::{DayKey, UserId, WaterEntry};
use crate::services::{fetch_rows, history_window, validate_amount, EventBus, SyncEvent};
use crate::time_utils::today;
use crate::AppContext;

#[derive(Debug, Clone, PartialEq)]
pub struct WaterState {
    pub entry: Option<WaterEntry>,
    pub selected_date: NaiveDate,
}

#[derive(Clone)]
pub struct WaterEntryManager {
    store: Arc<dyn RowStore>,
    events: EventBus,
    state: Arc<watch::Sender<WaterState>>,
}

impl WaterEntryManager {
    pub fn new(ctx: &AppContext) -> Self {
        let (state, _) = watch::channel(WaterState {
            entry: None,
            selected_date: today(),
        });
        Self {
            store: ctx.store.clone(),
            events: ctx.events.clone(),
            state: Arc::new(state),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<WaterState> {
        self.state.subscribe()
    }

    pub fn water_entry(&self) -> Option<WaterEntry> {
        self.state.borrow().entry.clone()
    }

    pub fn selected_date(&self) -> NaiveDate {
        self.state.borrow().selected_date
    }

    /// Day total in ml; 0 when nothing is logged.
    pub fn total_ml(&self) -> f64 {
        self.state.borrow().entry.as_ref().map_or(0.0, |e| e.ml)
    }

    pub async fn fetch(&self, user_id: UserId, date: NaiveDate) -> Result<()> {
        let query = DayKey::new(user_id, date)
            .query(tables::WATER_ENTRIES)
            .order("created_at", false);
        let rows: Vec<WaterEntry> = fetch_rows(self.store.as_ref(), &query).await?;
        tracing::debug!(user_id = %user_id, date = %date, found = !rows.is_empty(), "Fetched water entry");

        self.state.send_replace(WaterState {
            entry: rows.into_iter().next(),
            selected_date: date,
        });
        Ok(())
    }

    /// Set the day's total to `ml`, creating the row if needed.
    pub async fn create_or_update(&self, user_id: UserId, ml: f64, date: NaiveDate) -> Result<()> {
        validate_amount("ml", ml)?;
        let row = to_row(&WaterEntryUpsert { user_id, date, ml })?;
        self.store
            .upsert(tables::WATER_ENTRIES, row, WATER_CONFLICT_KEY)
            .await?;
        tracing::info!(user_id = %user_id, date = %date, ml, "Saved water entry");
        self.events.post(SyncEvent::WaterDataUpdated);

        self.fetch(user_id, date).await
    }

    /// Add `delta_ml` to the day's total.
    ///
    /// This is a read followed by a write, not an atomic increment: two
    /// concurrent calls for the same day can lose one of the additions.
    pub async fn add_intake(&self, user_id: UserId, delta_ml: f64, date: NaiveDate) -> Result<()> {
        validate_amount("ml", delta_ml)?;
        self.fetch(user_id, date).await?;
        let total = self.total_ml() + delta_ml;
        self.create_or_update(user_id, total, date).await
    }

    pub async fn delete(&self, user_id: UserId, date: Option<NaiveDate>) -> Result<()> {
        let date = date.unwrap_or_else(|| self.selected_date());
        let query = DayKey::new(user_id, date).query(tables::WATER_ENTRIES);
        self.store.delete(&query).await?;
        tracing::info!(user_id = %user_id, date = %date, "Deleted water entry");

        self.state.send_modify(|state| state.entry = None);
        Ok(())
    }

    /// Per-day totals over the trailing `days`, missing days as zero. The day
    /// cache is left alone.
    pub async fn fetch_history(&self, user_id: UserId, days: u32) -> Result<Vec<DailyTotal>> {
        let (start, end) = history_window(days)?;
        let query = Query::from(tables::WATER_ENTRIES)
            .user(user_id)
            .day_range(start, end)
            .order("date", true);
        let rows: Vec<WaterEntry> = fetch_rows(self.store.as_ref(), &query).await?;
        tracing::debug!(user_id = %user_id, days, count = rows.len(), "Fetched water history");

        Ok(dense_daily_series(start, end, rows.iter().map(|e| (e.date, e.ml))))
    }
}
