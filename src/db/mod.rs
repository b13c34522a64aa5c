//! Row store layer (PostgREST backend, in-memory backend for tests).
//!
//! Managers speak to the store through the [`RowStore`] trait with plain JSON
//! rows and a small [`Query`] builder mirroring the PostgREST filter syntax.

pub mod memory;
pub mod postgrest;

pub use memory::MemoryStore;
pub use postgrest::PostgrestStore;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::models::UserId;
use crate::time_utils::format_day;

/// Table names as constants.
pub mod tables {
    pub const USERS: &str = "users";
    pub const CALORIES_ENTRIES: &str = "calories_entries";
    pub const TARGETS_CALORIES: &str = "targets_calories";
    pub const TARGETS_RUN: &str = "targets_run";
    pub const TARGETS_TRAINING: &str = "targets_training";
    pub const TRAINING_TAGS: &str = "training_tags";
    /// One accumulator row per user and day (conflict target: user_id, date)
    pub const WATER_ENTRIES: &str = "water_entries";
    pub const WEIGHT_ENTRIES: &str = "weight_entries";
}

/// A wire row: column name to JSON value.
pub type Row = Map<String, Value>;

/// A single column filter.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Eq(String, Value),
    Gte(String, Value),
    Lte(String, Value),
    /// Case-insensitive pattern match; `%` matches any run of characters.
    ILike(String, String),
}

impl Filter {
    pub fn column(&self) -> &str {
        match self {
            Filter::Eq(col, _) | Filter::Gte(col, _) | Filter::Lte(col, _) => col,
            Filter::ILike(col, _) => col,
        }
    }
}

/// Sort key.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub column: String,
    pub ascending: bool,
}

/// A filtered, ordered view of one table.
///
/// Used for `select`, and as the row scope for `update` and `delete`.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub table: String,
    pub filters: Vec<Filter>,
    pub order: Vec<Order>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn from(table: &str) -> Self {
        Self {
            table: table.to_string(),
            filters: Vec::new(),
            order: Vec::new(),
            limit: None,
        }
    }

    pub fn eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Eq(column.to_string(), value.into()));
        self
    }

    pub fn gte(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.filters
            .push(Filter::Gte(column.to_string(), value.into()));
        self
    }

    pub fn lte(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.filters
            .push(Filter::Lte(column.to_string(), value.into()));
        self
    }

    pub fn ilike(mut self, column: &str, pattern: &str) -> Self {
        self.filters
            .push(Filter::ILike(column.to_string(), pattern.to_string()));
        self
    }

    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        self.order.push(Order {
            column: column.to_string(),
            ascending,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Scope to one user (ids go over the wire lowercase).
    pub fn user(self, user_id: UserId) -> Self {
        self.eq("user_id", user_id.to_string())
    }

    /// Scope to one calendar day.
    pub fn day(self, date: NaiveDate) -> Self {
        self.eq("date", format_day(date))
    }

    /// Scope to calendar days in `[start, end]`.
    pub fn day_range(self, start: NaiveDate, end: NaiveDate) -> Self {
        self.gte("date", format_day(start))
            .lte("date", format_day(end))
    }
}

/// Errors from row store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Unique key violation on {table}: {detail}")]
    Conflict { table: String, detail: String },

    #[error("Failed to encode row: {0}")]
    Serialization(String),

    #[error("Row store not reachable (offline mode)")]
    Offline,
}

/// Generic per-table CRUD/query service.
#[async_trait]
pub trait RowStore: Send + Sync {
    /// Rows matching the query, ordered and limited as requested.
    async fn select(&self, query: &Query) -> Result<Vec<Row>, StoreError>;

    /// Insert one row.
    async fn insert(&self, table: &str, row: Row) -> Result<(), StoreError>;

    /// Merge `patch` into every row matching the query's filters.
    async fn update(&self, query: &Query, patch: Row) -> Result<(), StoreError>;

    /// Insert, or merge into the row that shares the `on_conflict` columns.
    async fn upsert(&self, table: &str, row: Row, on_conflict: &[&str]) -> Result<(), StoreError>;

    /// Delete every row matching the query's filters.
    async fn delete(&self, query: &Query) -> Result<(), StoreError>;
}

/// Encode a payload struct into a wire row.
pub fn to_row<T: Serialize>(payload: &T) -> Result<Row, StoreError> {
    match serde_json::to_value(payload) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(StoreError::Serialization(format!(
            "expected an object payload, got {other}"
        ))),
        Err(e) => Err(StoreError::Serialization(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_builder_scopes() {
        let user = UserId::parse("6F9619FF-8B86-D011-B42D-00C04FC964FF").unwrap();
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let query = Query::from(tables::TARGETS_RUN)
            .user(user)
            .day(day)
            .order("created_at", false)
            .limit(1);

        assert_eq!(query.table, "targets_run");
        assert_eq!(
            query.filters,
            vec![
                Filter::Eq(
                    "user_id".to_string(),
                    json!("6f9619ff-8b86-d011-b42d-00c04fc964ff")
                ),
                Filter::Eq("date".to_string(), json!("2024-01-01")),
            ]
        );
        assert_eq!(query.limit, Some(1));
        assert!(!query.order[0].ascending);
    }

    #[test]
    fn test_to_row_rejects_non_objects() {
        assert!(to_row(&json!({"a": 1})).is_ok());
        assert!(matches!(
            to_row(&json!([1, 2])),
            Err(StoreError::Serialization(_))
        ));
    }
}
