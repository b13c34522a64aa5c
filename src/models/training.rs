// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strength-training targets and exercise-name tags.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::codec;
use crate::models::keys::TrainingKey;
use crate::models::progress;
use crate::models::UserId;

/// Set target for one exercise on one day (`targets_training`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TrainingTarget {
    pub user_id: UserId,
    #[serde(deserialize_with = "codec::day")]
    pub date: NaiveDate,
    pub exercise_type: String,
    /// Goal number of sets
    #[serde(deserialize_with = "codec::number")]
    pub target: f64,
    /// Sets completed so far
    #[serde(deserialize_with = "codec::number")]
    pub attempt: f64,
    pub is_achieved: bool,
    #[serde(deserialize_with = "codec::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(deserialize_with = "codec::timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl TrainingTarget {
    pub fn key(&self) -> TrainingKey {
        TrainingKey::new(self.user_id, self.date, self.exercise_type.clone())
    }

    pub fn progress_percentage(&self) -> f64 {
        progress::progress_percentage(self.attempt, self.target)
    }
}

#[derive(Debug, Serialize)]
pub struct TrainingTargetInsert<'a> {
    pub user_id: UserId,
    pub date: NaiveDate,
    pub exercise_type: &'a str,
    pub target: f64,
    pub attempt: f64,
    pub is_achieved: bool,
}

impl<'a> TrainingTargetInsert<'a> {
    pub fn new(key: &'a TrainingKey, target: f64) -> Self {
        Self {
            user_id: key.user_id,
            date: key.date,
            exercise_type: &key.exercise_type,
            target,
            attempt: 0.0,
            is_achieved: progress::is_achieved(0.0, target),
        }
    }
}

/// Partial update of a training target.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrainingTargetUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempt: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_achieved: Option<bool>,
}

impl TrainingTargetUpdate {
    pub fn target(target: f64) -> Self {
        Self {
            target: Some(target),
            ..Default::default()
        }
    }

    pub fn attempt(attempt: f64) -> Self {
        Self {
            attempt: Some(attempt),
            ..Default::default()
        }
    }

    pub fn touches_progress(&self) -> bool {
        self.target.is_some() || self.attempt.is_some()
    }
}

/// Free-text exercise name suggestion (`training_tags`).
///
/// Tags are only used for autocomplete and have no link to targets beyond
/// string equality with `exercise_type`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TrainingTag {
    #[serde(deserialize_with = "codec::uuid_key")]
    pub id: Uuid,
    pub user_id: UserId,
    pub tag_name: String,
    #[serde(deserialize_with = "codec::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(deserialize_with = "codec::timestamp")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct TrainingTagInsert<'a> {
    pub user_id: UserId,
    pub tag_name: &'a str,
}
