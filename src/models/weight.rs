// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Body weight log.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::codec;
use crate::models::UserId;

/// Weight for one user and day (`weight_entries`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WeightEntry {
    pub id: i64,
    pub user_id: UserId,
    #[serde(deserialize_with = "codec::day")]
    pub date: NaiveDate,
    /// Kilograms
    #[serde(deserialize_with = "codec::number")]
    pub weight: f64,
    #[serde(deserialize_with = "codec::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(deserialize_with = "codec::timestamp")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct WeightEntryInsert {
    pub user_id: UserId,
    pub date: NaiveDate,
    pub weight: f64,
}

#[derive(Debug, Serialize)]
pub struct WeightEntryUpdate {
    pub weight: f64,
}
