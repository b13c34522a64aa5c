// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Calories target and food ledger manager.
//!
//! The day's total is derived from the cached ledger on every access; it is
//! never stored.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tokio::sync::watch;

use crate::db::{tables, to_row, Query, RowStore};
use crate::error::{AppError, Result};
use crate::models::calories::{CaloriesEntryInsert, CaloriesTargetInsert, CaloriesTargetUpdate};
use crate::models::progress::{self, CalorieImage, DailyTotal, Rgb, StatusColor};
use crate::models::{CaloriesEntry, CaloriesTarget, DayKey, NewCaloriesEntry, UserId};
use crate::services::{fetch_rows, history_window, validate_amount, EventBus, SyncEvent};
use crate::time_utils::today;
use crate::AppContext;

#[derive(Debug, Clone, PartialEq)]
pub struct CaloriesState {
    pub target: Option<CaloriesTarget>,
    /// Ledger for the selected day, newest first
    pub entries: Vec<CaloriesEntry>,
    pub selected_date: NaiveDate,
}

/// Everything the calories card shows for the selected day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaloriesSummary {
    pub date: NaiveDate,
    pub total: f64,
    pub target: Option<f64>,
    pub percentage: f64,
    pub color: Rgb,
    pub image: CalorieImage,
    pub status: StatusColor,
    pub over_target: bool,
}

#[derive(Clone)]
pub struct CaloriesTargetManager {
    store: Arc<dyn RowStore>,
    events: EventBus,
    state: Arc<watch::Sender<CaloriesState>>,
}

impl CaloriesTargetManager {
    pub fn new(ctx: &AppContext) -> Self {
        let (state, _) = watch::channel(CaloriesState {
            target: None,
            entries: Vec::new(),
            selected_date: today(),
        });
        Self {
            store: ctx.store.clone(),
            events: ctx.events.clone(),
            state: Arc::new(state),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<CaloriesState> {
        self.state.subscribe()
    }

    pub fn calories_target(&self) -> Option<CaloriesTarget> {
        self.state.borrow().target.clone()
    }

    pub fn entries(&self) -> Vec<CaloriesEntry> {
        self.state.borrow().entries.clone()
    }

    pub fn selected_date(&self) -> NaiveDate {
        self.state.borrow().selected_date
    }

    pub fn total_calories(&self) -> f64 {
        let state = self.state.borrow();
        progress::total_calories(state.entries.iter().map(|e| &e.calories))
    }

    pub fn summary(&self) -> CaloriesSummary {
        let total = self.total_calories();
        let (date, target) = {
            let state = self.state.borrow();
            (state.selected_date, state.target.as_ref().map(|t| t.target))
        };
        CaloriesSummary {
            date,
            total,
            target,
            percentage: progress::progress_percentage(total, target.unwrap_or(0.0)),
            color: progress::calorie_progress_color(total, target),
            image: progress::calorie_image(total, target),
            status: progress::calorie_status_color(total, target),
            over_target: progress::is_over_target(total, target),
        }
    }

    /// Load the ledger for `date`, newest first.
    pub async fn fetch_entries(&self, user_id: UserId, date: NaiveDate) -> Result<()> {
        let query = DayKey::new(user_id, date)
            .query(tables::CALORIES_ENTRIES)
            .order("created_at", false);
        let entries: Vec<CaloriesEntry> = fetch_rows(self.store.as_ref(), &query).await?;
        tracing::debug!(user_id = %user_id, date = %date, count = entries.len(), "Fetched calories entries");

        self.state.send_modify(|state| {
            state.entries = entries;
            state.selected_date = date;
        });
        Ok(())
    }

    /// Append a food item to the ledger for `date`.
    pub async fn add_entry(&self, user_id: UserId, entry: NewCaloriesEntry, date: NaiveDate) -> Result<()> {
        if entry.food_name.trim().is_empty() {
            return Err(AppError::InvalidInput("Food name must not be empty".to_string()));
        }
        validate_amount("calories", entry.calories)?;
        for (name, value) in [("protein", entry.protein), ("fat", entry.fat), ("carbs", entry.carbs)] {
            if let Some(value) = value {
                validate_amount(name, value)?;
            }
        }

        let row = to_row(&CaloriesEntryInsert::new(user_id, date, &entry))?;
        self.store.insert(tables::CALORIES_ENTRIES, row).await?;
        tracing::info!(
            user_id = %user_id,
            date = %date,
            food = %entry.food_name.trim(),
            calories = entry.calories,
            "Added calories entry"
        );
        self.events.post(SyncEvent::CaloriesDataUpdated);

        self.fetch_entries(user_id, date).await
    }

    /// Remove one ledger row. The delete is scoped by user and day as well as id.
    pub async fn delete_entry(&self, entry_id: i64, user_id: UserId, date: Option<NaiveDate>) -> Result<()> {
        let date = date.unwrap_or_else(|| self.selected_date());
        let query = DayKey::new(user_id, date)
            .query(tables::CALORIES_ENTRIES)
            .eq("id", entry_id);
        self.store.delete(&query).await?;
        tracing::info!(user_id = %user_id, date = %date, entry_id, "Deleted calories entry");
        self.events.post(SyncEvent::CaloriesDataUpdated);

        self.fetch_entries(user_id, date).await
    }

    /// Past entries whose food name contains `text` (case-insensitive), within
    /// the trailing `days`. The cache is left alone.
    pub async fn search_entries(&self, user_id: UserId, text: &str, days: u32) -> Result<Vec<CaloriesEntry>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Vec::new());
        }

        let (start, end) = history_window(days)?;
        let query = Query::from(tables::CALORIES_ENTRIES)
            .user(user_id)
            .ilike("food_name", &format!("%{text}%"))
            .day_range(start, end)
            .order("date", false)
            .order("created_at", false);
        let entries: Vec<CaloriesEntry> = fetch_rows(self.store.as_ref(), &query).await?;
        tracing::debug!(user_id = %user_id, text, count = entries.len(), "Searched calories entries");
        Ok(entries)
    }

    /// Daily calorie totals over the trailing `days`, one point per day.
    pub async fn fetch_history(&self, user_id: UserId, days: u32) -> Result<Vec<DailyTotal>> {
        let (start, end) = history_window(days)?;
        let query = Query::from(tables::CALORIES_ENTRIES)
            .user(user_id)
            .day_range(start, end)
            .order("date", true);
        let entries: Vec<CaloriesEntry> = fetch_rows(self.store.as_ref(), &query).await?;

        Ok(progress::dense_daily_series(
            start,
            end,
            entries.iter().map(|e| (e.date, e.calories)),
        ))
    }

    pub async fn fetch_target(&self, user_id: UserId, date: NaiveDate) -> Result<()> {
        let query = DayKey::new(user_id, date).query(tables::TARGETS_CALORIES);
        let rows: Vec<CaloriesTarget> = fetch_rows(self.store.as_ref(), &query).await?;
        tracing::debug!(user_id = %user_id, date = %date, found = !rows.is_empty(), "Fetched calories target");

        self.state.send_modify(|state| {
            state.target = rows.into_iter().next();
            state.selected_date = date;
        });
        Ok(())
    }

    pub async fn create_or_update_target(&self, user_id: UserId, target: f64, date: NaiveDate) -> Result<()> {
        validate_amount("target", target)?;
        self.fetch_target(user_id, date).await?;

        if self.calories_target().is_some() {
            return self.update_target(user_id, target, Some(date)).await;
        }

        let row = to_row(&CaloriesTargetInsert {
            user_id,
            date,
            target,
        })?;
        self.store.insert(tables::TARGETS_CALORIES, row).await?;
        tracing::info!(user_id = %user_id, date = %date, target, "Created calories target");

        self.fetch_target(user_id, date).await
    }

    pub async fn update_target(&self, user_id: UserId, target: f64, date: Option<NaiveDate>) -> Result<()> {
        validate_amount("target", target)?;
        let date = date.unwrap_or_else(|| self.selected_date());
        let query = DayKey::new(user_id, date).query(tables::TARGETS_CALORIES);
        self.store
            .update(&query, to_row(&CaloriesTargetUpdate { target })?)
            .await?;
        tracing::info!(user_id = %user_id, date = %date, target, "Updated calories target");

        self.fetch_target(user_id, date).await
    }

    pub async fn delete_target(&self, user_id: UserId, date: Option<NaiveDate>) -> Result<()> {
        let date = date.unwrap_or_else(|| self.selected_date());
        let query = DayKey::new(user_id, date).query(tables::TARGETS_CALORIES);
        self.store.delete(&query).await?;
        tracing::info!(user_id = %user_id, date = %date, "Deleted calories target");

        self.state.send_modify(|state| state.target = None);
        Ok(())
    }
}
