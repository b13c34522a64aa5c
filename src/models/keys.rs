// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Composite natural keys.
//!
//! Rows keyed by user and day (and, for training, exercise) are addressed by
//! these values rather than by a joined string id, so an exercise name may
//! contain any character.

use chrono::NaiveDate;

use crate::db::Query;
use crate::models::UserId;

/// One user on one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DayKey {
    pub user_id: UserId,
    pub date: NaiveDate,
}

impl DayKey {
    pub fn new(user_id: UserId, date: NaiveDate) -> Self {
        Self { user_id, date }
    }

    /// Rows of `table` belonging to this key.
    pub fn query(&self, table: &str) -> Query {
        Query::from(table).user(self.user_id).day(self.date)
    }
}

/// One exercise for one user on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrainingKey {
    pub user_id: UserId,
    pub date: NaiveDate,
    pub exercise_type: String,
}

impl TrainingKey {
    pub fn new(user_id: UserId, date: NaiveDate, exercise_type: impl Into<String>) -> Self {
        Self {
            user_id,
            date,
            exercise_type: exercise_type.into(),
        }
    }

    pub fn day(&self) -> DayKey {
        DayKey::new(self.user_id, self.date)
    }

    pub fn query(&self, table: &str) -> Query {
        self.day()
            .query(table)
            .eq("exercise_type", self.exercise_type.as_str())
    }
}
