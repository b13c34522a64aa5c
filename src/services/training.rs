// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strength-training target manager.
//!
//! Targets are keyed by exercise within a day, so one day may hold several
//! independent rows. The manager also owns the user's exercise-name tags,
//! which are suggestions only and unrelated to the target rows.

use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::watch;
use uuid::Uuid;

use crate::db::{tables, to_row, Query, RowStore, StoreError};
use crate::error::{AppError, Result};
use crate::models::progress::is_achieved;
use crate::models::training::{TrainingTagInsert, TrainingTargetInsert};
use crate::models::{DayKey, TrainingKey, TrainingTag, TrainingTarget, TrainingTargetUpdate, UserId};
use crate::services::{fetch_rows, validate_amount, EventBus, SyncEvent};
use crate::time_utils::today;
use crate::AppContext;

#[derive(Debug, Clone, PartialEq)]
pub struct TrainingState {
    /// All exercises for the selected day
    pub targets: Vec<TrainingTarget>,
    /// Exercise-name suggestions, newest first
    pub tags: Vec<TrainingTag>,
    pub selected_date: NaiveDate,
}

#[derive(Clone)]
pub struct TrainingTargetManager {
    store: Arc<dyn RowStore>,
    events: EventBus,
    state: Arc<watch::Sender<TrainingState>>,
}

impl TrainingTargetManager {
    pub fn new(ctx: &AppContext) -> Self {
        let (state, _) = watch::channel(TrainingState {
            targets: Vec::new(),
            tags: Vec::new(),
            selected_date: today(),
        });
        Self {
            store: ctx.store.clone(),
            events: ctx.events.clone(),
            state: Arc::new(state),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<TrainingState> {
        self.state.subscribe()
    }

    pub fn training_targets(&self) -> Vec<TrainingTarget> {
        self.state.borrow().targets.clone()
    }

    pub fn tags(&self) -> Vec<TrainingTag> {
        self.state.borrow().tags.clone()
    }

    pub fn selected_date(&self) -> NaiveDate {
        self.state.borrow().selected_date
    }

    /// Cached target for one exercise on the selected day.
    pub fn target_for(&self, exercise_type: &str) -> Option<TrainingTarget> {
        self.state
            .borrow()
            .targets
            .iter()
            .find(|t| t.exercise_type == exercise_type)
            .cloned()
    }

    /// Load every exercise for `date` into the cache.
    pub async fn fetch(&self, user_id: UserId, date: NaiveDate) -> Result<()> {
        let query = DayKey::new(user_id, date).query(tables::TARGETS_TRAINING);
        let targets: Vec<TrainingTarget> = fetch_rows(self.store.as_ref(), &query).await?;
        tracing::debug!(user_id = %user_id, date = %date, count = targets.len(), "Fetched training targets");

        self.state.send_modify(|state| {
            state.targets = targets;
            state.selected_date = date;
        });
        Ok(())
    }

    /// Single exercise row, read straight from the store without touching the cache.
    pub async fn fetch_one(&self, key: &TrainingKey) -> Result<Option<TrainingTarget>> {
        let query = key.query(tables::TARGETS_TRAINING);
        let rows: Vec<TrainingTarget> = fetch_rows(self.store.as_ref(), &query).await?;
        Ok(rows.into_iter().next())
    }

    pub async fn create_or_update(&self, key: &TrainingKey, target: f64) -> Result<()> {
        validate_amount("target", target)?;
        if key.exercise_type.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Exercise name must not be empty".to_string(),
            ));
        }

        if self.fetch_one(key).await?.is_some() {
            return self
                .update(
                    key.user_id,
                    &key.exercise_type,
                    TrainingTargetUpdate::target(target),
                    Some(key.date),
                )
                .await;
        }

        let row = to_row(&TrainingTargetInsert::new(key, target))?;
        self.store.insert(tables::TARGETS_TRAINING, row).await?;
        tracing::info!(
            user_id = %key.user_id,
            date = %key.date,
            exercise = %key.exercise_type,
            target,
            "Created training target"
        );

        self.fetch(key.user_id, key.date).await
    }

    /// Partial update of one exercise on `date` (default: the selected date).
    /// `is_achieved` is recomputed from the fresh row whenever target or
    /// attempt changes.
    pub async fn update(
        &self,
        user_id: UserId,
        exercise_type: &str,
        mut changes: TrainingTargetUpdate,
        date: Option<NaiveDate>,
    ) -> Result<()> {
        let date = date.unwrap_or_else(|| self.selected_date());
        let key = TrainingKey::new(user_id, date, exercise_type);
        if let Some(target) = changes.target {
            validate_amount("target", target)?;
        }
        if let Some(attempt) = changes.attempt {
            validate_amount("attempt", attempt)?;
        }

        if changes.touches_progress() {
            let current = self.fetch_one(&key).await?;
            let target = changes.target.or(current.as_ref().map(|t| t.target));
            let attempt = changes.attempt.or(current.as_ref().map(|t| t.attempt));
            changes.is_achieved = Some(is_achieved(
                attempt.unwrap_or(0.0),
                target.unwrap_or(0.0),
            ));
        }

        let patch = to_row(&changes)?;
        if !patch.is_empty() {
            self.store
                .update(&key.query(tables::TARGETS_TRAINING), patch)
                .await?;
            tracing::info!(
                user_id = %user_id,
                date = %date,
                exercise = %exercise_type,
                ?changes,
                "Updated training target"
            );
            self.events.post(SyncEvent::TrainingDataUpdated);
        }

        self.fetch(user_id, date).await
    }

    /// Delete one exercise on `date` and drop it from the cache.
    pub async fn delete(
        &self,
        user_id: UserId,
        exercise_type: &str,
        date: Option<NaiveDate>,
    ) -> Result<()> {
        let date = date.unwrap_or_else(|| self.selected_date());
        let key = TrainingKey::new(user_id, date, exercise_type);
        self.store
            .delete(&key.query(tables::TARGETS_TRAINING))
            .await?;
        tracing::info!(user_id = %user_id, date = %date, exercise = %exercise_type, "Deleted training target");

        self.state.send_modify(|state| {
            state
                .targets
                .retain(|t| !(t.exercise_type == exercise_type && t.date == date));
        });
        Ok(())
    }

    /// Load the user's tags, newest first.
    pub async fn fetch_tags(&self, user_id: UserId) -> Result<()> {
        let query = Query::from(tables::TRAINING_TAGS)
            .user(user_id)
            .order("created_at", false);
        let tags: Vec<TrainingTag> = fetch_rows(self.store.as_ref(), &query).await?;
        tracing::debug!(user_id = %user_id, count = tags.len(), "Fetched training tags");

        self.state.send_modify(|state| state.tags = tags);
        Ok(())
    }

    /// Add a tag. Names are trimmed and must be unique per user ignoring case.
    pub async fn create_tag(&self, user_id: UserId, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::InvalidInput("Tag name must not be empty".to_string()));
        }

        self.fetch_tags(user_id).await?;
        let lowered = name.to_lowercase();
        if self
            .tags()
            .iter()
            .any(|tag| tag.tag_name.to_lowercase() == lowered)
        {
            return Err(AppError::Conflict(format!("Tag \"{name}\" already exists")));
        }

        let row = to_row(&TrainingTagInsert {
            user_id,
            tag_name: name,
        })?;
        self.store
            .insert(tables::TRAINING_TAGS, row)
            .await
            .map_err(|e| match e {
                StoreError::Conflict { .. } => {
                    AppError::Conflict(format!("Tag \"{name}\" already exists"))
                }
                other => other.into(),
            })?;
        tracing::info!(user_id = %user_id, tag = %name, "Created training tag");

        self.fetch_tags(user_id).await
    }

    pub async fn delete_tag(&self, user_id: UserId, tag_id: Uuid) -> Result<()> {
        let query = Query::from(tables::TRAINING_TAGS)
            .user(user_id)
            .eq("id", tag_id.to_string());
        self.store.delete(&query).await?;
        tracing::info!(user_id = %user_id, tag_id = %tag_id, "Deleted training tag");

        self.fetch_tags(user_id).await
    }
}
