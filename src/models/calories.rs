// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Calories ledger entries and the daily calories target.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::codec;
use crate::models::UserId;

/// One food item logged against a day (`calories_entries`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CaloriesEntry {
    pub id: i64,
    pub user_id: UserId,
    #[serde(deserialize_with = "codec::day")]
    pub date: NaiveDate,
    pub food_name: String,
    /// Energy in kcal
    #[serde(deserialize_with = "codec::number")]
    pub calories: f64,
    /// Grams; None when not recorded (distinct from zero)
    #[serde(default, deserialize_with = "codec::opt_number")]
    pub protein: Option<f64>,
    #[serde(default, deserialize_with = "codec::opt_number")]
    pub fat: Option<f64>,
    #[serde(default, deserialize_with = "codec::opt_number")]
    pub carbs: Option<f64>,
    #[serde(deserialize_with = "codec::timestamp")]
    pub created_at: DateTime<Utc>,
}

/// A food item to be added to the ledger.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewCaloriesEntry {
    pub food_name: String,
    pub calories: f64,
    pub protein: Option<f64>,
    pub fat: Option<f64>,
    pub carbs: Option<f64>,
}

impl NewCaloriesEntry {
    pub fn new(food_name: impl Into<String>, calories: f64) -> Self {
        Self {
            food_name: food_name.into(),
            calories,
            ..Default::default()
        }
    }

    pub fn with_macros(mut self, protein: Option<f64>, fat: Option<f64>, carbs: Option<f64>) -> Self {
        self.protein = protein;
        self.fat = fat;
        self.carbs = carbs;
        self
    }
}

/// Insert payload for `calories_entries`.
#[derive(Debug, Serialize)]
pub struct CaloriesEntryInsert<'a> {
    pub user_id: UserId,
    pub date: NaiveDate,
    pub food_name: &'a str,
    pub calories: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protein: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carbs: Option<f64>,
}

impl<'a> CaloriesEntryInsert<'a> {
    pub fn new(user_id: UserId, date: NaiveDate, entry: &'a NewCaloriesEntry) -> Self {
        Self {
            user_id,
            date,
            food_name: entry.food_name.trim(),
            calories: entry.calories,
            protein: entry.protein,
            fat: entry.fat,
            carbs: entry.carbs,
        }
    }
}

/// Daily calories target (`targets_calories`), at most one per user and day.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CaloriesTarget {
    pub user_id: UserId,
    #[serde(deserialize_with = "codec::day")]
    pub date: NaiveDate,
    /// Goal in kcal
    #[serde(deserialize_with = "codec::number")]
    pub target: f64,
    #[serde(deserialize_with = "codec::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(deserialize_with = "codec::timestamp")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct CaloriesTargetInsert {
    pub user_id: UserId,
    pub date: NaiveDate,
    pub target: f64,
}

#[derive(Debug, Serialize)]
pub struct CaloriesTargetUpdate {
    pub target: f64,
}
