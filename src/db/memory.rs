// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process row store.
//!
//! Implements the same filter, ordering and upsert semantics as the PostgREST
//! backend so managers can be exercised without a network. Used by the test
//! suite and for offline runs of the sync tool.

use std::cmp::Ordering;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering as AtomicOrdering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde_json::Value;

use crate::db::{tables, Filter, Query, Row, RowStore, StoreError};
use crate::time_utils::format_utc_rfc3339;

/// In-memory row store backed by a concurrent map of tables.
#[derive(Default)]
pub struct MemoryStore {
    tables: DashMap<String, Vec<Row>>,
    /// Optional unique keys per table (column lists).
    unique_keys: DashMap<String, Vec<String>>,
    next_id: AtomicI64,
    last_stamp: Mutex<Option<DateTime<Utc>>>,
    offline: AtomicBool,
    selects: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enforce a unique key on `table`, turning duplicate inserts into
    /// [`StoreError::Conflict`].
    pub fn with_unique_key(self, table: &str, columns: &[&str]) -> Self {
        self.unique_keys.insert(
            table.to_string(),
            columns.iter().map(|c| c.to_string()).collect(),
        );
        self
    }

    /// Make every subsequent call fail with [`StoreError::Offline`].
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, AtomicOrdering::SeqCst);
    }

    /// Number of `select` calls served so far.
    pub fn select_count(&self) -> usize {
        self.selects.load(AtomicOrdering::SeqCst)
    }

    /// Snapshot of every row in a table, in insertion order.
    pub fn rows(&self, table: &str) -> Vec<Row> {
        self.tables
            .get(table)
            .map(|rows| rows.value().clone())
            .unwrap_or_default()
    }

    /// Insert a row verbatim, without id assignment or timestamp stamping.
    pub fn seed(&self, table: &str, row: Row) {
        self.tables.entry(table.to_string()).or_default().push(row);
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline.load(AtomicOrdering::SeqCst) {
            return Err(StoreError::Offline);
        }
        Ok(())
    }

    /// Strictly increasing audit timestamp so `created_at` ordering is total.
    fn stamp(&self) -> String {
        let mut last = self
            .last_stamp
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut now = Utc::now();
        if let Some(prev) = *last {
            if now <= prev {
                now = prev + Duration::microseconds(1);
            }
        }
        *last = Some(now);
        format_utc_rfc3339(now)
    }

    fn assign_id(&self, table: &str, row: &mut Row) {
        if row.contains_key("id") {
            return;
        }
        let id = if table == tables::TRAINING_TAGS || table == tables::USERS {
            Value::from(uuid::Uuid::new_v4().to_string())
        } else {
            Value::from(self.next_id.fetch_add(1, AtomicOrdering::SeqCst) + 1)
        };
        row.insert("id".to_string(), id);
    }

    fn insert_row(&self, table: &str, mut row: Row) -> Result<(), StoreError> {
        let mut rows = self.tables.entry(table.to_string()).or_default();

        if let Some(key) = self.unique_keys.get(table) {
            let duplicate = rows.iter().any(|existing| {
                key.iter()
                    .all(|col| values_equal(existing.get(col), row.get(col)))
            });
            if duplicate {
                return Err(StoreError::Conflict {
                    table: table.to_string(),
                    detail: format!("duplicate key ({})", key.join(", ")),
                });
            }
        }

        self.assign_id(table, &mut row);
        let now = self.stamp();
        row.entry("created_at")
            .or_insert_with(|| Value::from(now.clone()));
        row.entry("updated_at").or_insert_with(|| Value::from(now));
        rows.push(row);
        Ok(())
    }
}

#[async_trait]
impl RowStore for MemoryStore {
    async fn select(&self, query: &Query) -> Result<Vec<Row>, StoreError> {
        self.check_online()?;
        self.selects.fetch_add(1, AtomicOrdering::SeqCst);

        let mut rows: Vec<Row> = self
            .tables
            .get(&query.table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| matches_all(row, &query.filters))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if !query.order.is_empty() {
            rows.sort_by(|a, b| {
                for key in &query.order {
                    let ord = compare_values(a.get(&key.column), b.get(&key.column));
                    let ord = if key.ascending { ord } else { ord.reverse() };
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                Ordering::Equal
            });
        }

        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }

        tracing::trace!(table = %query.table, count = rows.len(), "Memory select");
        Ok(rows)
    }

    async fn insert(&self, table: &str, row: Row) -> Result<(), StoreError> {
        self.check_online()?;
        self.insert_row(table, row)
    }

    async fn update(&self, query: &Query, patch: Row) -> Result<(), StoreError> {
        self.check_online()?;
        let now = self.stamp();
        if let Some(mut rows) = self.tables.get_mut(&query.table) {
            for row in rows
                .iter_mut()
                .filter(|row| matches_all(row, &query.filters))
            {
                for (col, value) in &patch {
                    row.insert(col.clone(), value.clone());
                }
                row.insert("updated_at".to_string(), Value::from(now.clone()));
            }
        }
        Ok(())
    }

    async fn upsert(&self, table: &str, row: Row, on_conflict: &[&str]) -> Result<(), StoreError> {
        self.check_online()?;
        {
            let now = self.stamp();
            let mut rows = self.tables.entry(table.to_string()).or_default();
            let existing = rows.iter_mut().find(|existing| {
                on_conflict
                    .iter()
                    .all(|col| values_equal(existing.get(*col), row.get(*col)))
            });
            if let Some(existing) = existing {
                for (col, value) in &row {
                    existing.insert(col.clone(), value.clone());
                }
                existing.insert("updated_at".to_string(), Value::from(now));
                return Ok(());
            }
        }
        self.insert_row(table, row)
    }

    async fn delete(&self, query: &Query) -> Result<(), StoreError> {
        self.check_online()?;
        if let Some(mut rows) = self.tables.get_mut(&query.table) {
            rows.retain(|row| !matches_all(row, &query.filters));
        }
        Ok(())
    }
}

fn matches_all(row: &Row, filters: &[Filter]) -> bool {
    filters.iter().all(|filter| matches(row, filter))
}

fn matches(row: &Row, filter: &Filter) -> bool {
    let value = row.get(filter.column());
    match filter {
        Filter::Eq(_, expected) => values_equal(value, Some(expected)),
        Filter::Gte(_, bound) => {
            value.is_some_and(|v| !v.is_null())
                && compare_values(value, Some(bound)) != Ordering::Less
        }
        Filter::Lte(_, bound) => {
            value.is_some_and(|v| !v.is_null())
                && compare_values(value, Some(bound)) != Ordering::Greater
        }
        Filter::ILike(_, pattern) => value
            .and_then(Value::as_str)
            .is_some_and(|text| like_match(&text.to_lowercase(), &pattern.to_lowercase())),
    }
}

/// Equality with numeric coercion (`1` equals `1.0`).
fn values_equal(a: Option<&Value>, b: Option<&Value>) -> bool {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x.as_f64() == y.as_f64(),
        (Some(x), Some(y)) => x == y,
        (None, None) => true,
        _ => false,
    }
}

/// Total order used for sorting; nulls and missing values sort last.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
    }
}

/// SQL `LIKE` matching where `%` matches any run of characters.
fn like_match(text: &str, pattern: &str) -> bool {
    let parts: Vec<&str> = pattern.split('%').collect();
    if parts.len() == 1 {
        return text == pattern;
    }

    let first = parts[0];
    let last = parts[parts.len() - 1];
    if !text.starts_with(first) {
        return false;
    }

    let mut rest = &text[first.len()..];
    for part in &parts[1..parts.len() - 1] {
        match rest.find(part) {
            Some(pos) => rest = &rest[pos + part.len()..],
            None => return false,
        }
    }
    rest.len() >= last.len() && rest.ends_with(last)
}
