// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Daily running distance target.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::codec;
use crate::models::progress;
use crate::models::UserId;

/// Running target for one user and day (`targets_run`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RunTarget {
    pub id: i64,
    pub user_id: UserId,
    #[serde(deserialize_with = "codec::day")]
    pub date: NaiveDate,
    /// Goal distance in km
    #[serde(deserialize_with = "codec::number")]
    pub target: f64,
    /// Distance run so far in km
    #[serde(deserialize_with = "codec::number")]
    pub attempt: f64,
    pub is_achieved: bool,
    #[serde(deserialize_with = "codec::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(deserialize_with = "codec::timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl RunTarget {
    pub fn progress_percentage(&self) -> f64 {
        progress::progress_percentage(self.attempt, self.target)
    }
}

#[derive(Debug, Serialize)]
pub struct RunTargetInsert {
    pub user_id: UserId,
    pub date: NaiveDate,
    pub target: f64,
    pub attempt: f64,
    pub is_achieved: bool,
}

impl RunTargetInsert {
    /// New row with no distance run yet.
    pub fn new(user_id: UserId, date: NaiveDate, target: f64) -> Self {
        Self {
            user_id,
            date,
            target,
            attempt: 0.0,
            is_achieved: progress::is_achieved(0.0, target),
        }
    }
}

/// Partial update of a running target; unset fields are left as stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunTargetUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempt: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_achieved: Option<bool>,
}

impl RunTargetUpdate {
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
