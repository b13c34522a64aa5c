// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Daily water intake accumulator.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::codec;
use crate::models::UserId;

/// Conflict target for the water upsert.
pub const WATER_CONFLICT_KEY: &[&str] = &["user_id", "date"];

/// Cumulative water intake for one user and day (`water_entries`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WaterEntry {
    pub user_id: UserId,
    #[serde(deserialize_with = "codec::day")]
    pub date: NaiveDate,
    #[serde(deserialize_with = "codec::number")]
    pub ml: f64,
    #[serde(deserialize_with = "codec::timestamp")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct WaterEntryUpsert {
    pub user_id: UserId,
    pub date: NaiveDate,
    pub ml: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::to_row;
    use crate::models::decode_row;
    use serde_json::json;

    #[test]
    fn test_decode_water_entry_numeric_string() {
        let row = to_row(&json!({
            "user_id": "6f9619ff-8b86-d011-b42d-00c04fc964ff",
            "date": "2024-01-01",
            "ml": "750.0",
            "created_at": "2024-01-01T08:00:00"
        }))
        .unwrap();

        let entry: WaterEntry = decode_row(row).unwrap();
        assert_eq!(entry.ml, 750.0);
    }
}
