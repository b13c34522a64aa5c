// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Wire row decoding shared by all entities.
//!
//! Entities derive `Deserialize`. Rows arrive as JSON maps with string dates
//! (`YYYY-MM-DD`), ISO-8601 timestamps, lowercase UUID strings and, for
//! `numeric` columns, numbers rendered as strings; the `deserialize_with`
//! helpers here cover those. Rows are fed to serde one field at a time so a
//! failure reports the offending field and raw value.

use std::fmt::Display;

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::value::{MapAccessDeserializer, StrDeserializer};
use serde::de::{self, DeserializeOwned, DeserializeSeed, MapAccess};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use uuid::Uuid;

use crate::db::Row;
use crate::time_utils::{parse_day, parse_timestamp};

pub(crate) const BAD_DAY: &str = "expected a YYYY-MM-DD day";
pub(crate) const BAD_TIMESTAMP: &str = "expected an ISO-8601 timestamp";
pub(crate) const BAD_ID: &str = "expected a UUID";
const BAD_NUMBER: &str = "expected a number";

/// Errors from decoding a wire row.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecodeError {
    #[error("Missing field `{field}`")]
    MissingField { field: String },

    #[error("Field `{field}` has the wrong type ({reason}, got {raw})")]
    InvalidType {
        field: String,
        raw: String,
        reason: String,
    },

    #[error("Invalid date format in `{field}`: {raw:?}")]
    InvalidDate { field: String, raw: String },

    #[error("Invalid timestamp format in `{field}`: {raw:?}")]
    InvalidTimestamp { field: String, raw: String },

    #[error("Invalid identifier in `{field}`: {raw:?}")]
    InvalidId { field: String, raw: String },

    #[error("Malformed row: {0}")]
    Malformed(String),
}

impl DecodeError {
    /// Name of the field that failed to decode; empty for whole-row failures.
    pub fn field(&self) -> &str {
        match self {
            DecodeError::MissingField { field }
            | DecodeError::InvalidType { field, .. }
            | DecodeError::InvalidDate { field, .. }
            | DecodeError::InvalidTimestamp { field, .. }
            | DecodeError::InvalidId { field, .. } => field,
            DecodeError::Malformed(_) => "",
        }
    }

    fn at_field(field: &str, value: &Value, err: &serde_json::Error) -> Self {
        let field = field.to_string();
        if value.is_null() {
            return DecodeError::MissingField { field };
        }

        let raw = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        match err.to_string().as_str() {
            BAD_DAY => DecodeError::InvalidDate { field, raw },
            BAD_TIMESTAMP => DecodeError::InvalidTimestamp { field, raw },
            BAD_ID => DecodeError::InvalidId { field, raw },
            reason => DecodeError::InvalidType {
                field,
                raw,
                reason: reason.to_string(),
            },
        }
    }
}

impl de::Error for DecodeError {
    fn custom<T: Display>(msg: T) -> Self {
        DecodeError::Malformed(msg.to_string())
    }

    fn missing_field(field: &'static str) -> Self {
        DecodeError::MissingField {
            field: field.to_string(),
        }
    }
}

/// Decode one row into an entity.
pub fn decode_row<T: DeserializeOwned>(row: Row) -> Result<T, DecodeError> {
    T::deserialize(MapAccessDeserializer::new(RowAccess {
        entries: row.into_iter(),
        pending: None,
    }))
}

/// Decode every row, failing the whole batch on the first bad row.
pub fn decode_rows<T: DeserializeOwned>(rows: Vec<Row>) -> Result<Vec<T>, DecodeError> {
    rows.into_iter().map(decode_row).collect()
}

/// Walks a row for serde, remembering which field is being decoded.
struct RowAccess {
    entries: serde_json::map::IntoIter,
    pending: Option<(String, Value)>,
}

impl<'de> MapAccess<'de> for RowAccess {
    type Error = DecodeError;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>, DecodeError>
    where
        K: DeserializeSeed<'de>,
    {
        let Some((field, value)) = self.entries.next() else {
            return Ok(None);
        };
        let key = seed.deserialize(StrDeserializer::<DecodeError>::new(&field))?;
        self.pending = Some((field, value));
        Ok(Some(key))
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value, DecodeError>
    where
        V: DeserializeSeed<'de>,
    {
        let (field, value) = self
            .pending
            .take()
            .ok_or_else(|| DecodeError::Malformed("value without a field".to_string()))?;
        seed.deserialize(value.clone())
            .map_err(|e| DecodeError::at_field(&field, &value, &e))
    }
}

/// `YYYY-MM-DD` calendar day.
pub(crate) fn day<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_day(&raw).ok_or_else(|| de::Error::custom(BAD_DAY))
}

/// ISO-8601 instant: fractional seconds, whole seconds, or offset-less UTC.
pub(crate) fn timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).ok_or_else(|| de::Error::custom(BAD_TIMESTAMP))
}

/// UUID primary key.
pub(crate) fn uuid_key<'de, D>(deserializer: D) -> Result<Uuid, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Uuid::parse_str(raw.trim()).map_err(|_| de::Error::custom(BAD_ID))
}

/// A JSON number or a numeric string (PostgREST renders `numeric` columns as
/// strings).
pub(crate) fn number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    as_number(&value).ok_or_else(|| de::Error::custom(BAD_NUMBER))
}

/// Like [`number`], with null as `None`. Pair with `#[serde(default)]` so an
/// absent field is `None` too.
pub(crate) fn opt_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        value => as_number(&value)
            .map(Some)
            .ok_or_else(|| de::Error::custom(BAD_NUMBER)),
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(deserialize_with = "day")]
        date: NaiveDate,
        #[serde(deserialize_with = "number")]
        target: f64,
        #[serde(default, deserialize_with = "opt_number")]
        protein: Option<f64>,
        #[serde(default, deserialize_with = "opt_number")]
        fat: Option<f64>,
        #[serde(default)]
        done: bool,
    }

    #[derive(Debug, Deserialize)]
    struct Stamped {
        #[serde(deserialize_with = "timestamp")]
        created_at: DateTime<Utc>,
    }

    fn row(value: Value) -> Row {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_optional_numbers_distinguish_absent_from_zero() {
        let sample: Sample =
            decode_row(row(json!({"date": "2024-01-15", "target": 1, "protein": 0, "fat": null}))).unwrap();
        assert_eq!(sample.protein, Some(0.0));
        assert_eq!(sample.fat, None);
    }

    #[test]
    fn test_numeric_strings_are_accepted() {
        let sample: Sample = decode_row(row(json!({"date": "2024-01-15", "target": "2000.5"}))).unwrap();
        assert_eq!(sample.target, 2000.5);
        assert_eq!(sample.date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    }

    #[test]
    fn test_missing_and_null_required_fields() {
        let err = decode_row::<Sample>(row(json!({"date": "2024-01-15", "target": null}))).unwrap_err();
        assert_eq!(
            err,
            DecodeError::MissingField {
                field: "target".to_string()
            }
        );

        let err = decode_row::<Sample>(row(json!({"target": 5}))).unwrap_err();
        assert_eq!(err.field(), "date");
    }

    #[test]
    fn test_bad_timestamp_names_field_and_raw_value() {
        let err = decode_row::<Stamped>(row(json!({"created_at": "15/01/2024 10:00"}))).unwrap_err();
        assert_eq!(
            err,
            DecodeError::InvalidTimestamp {
                field: "created_at".to_string(),
                raw: "15/01/2024 10:00".to_string(),
            }
        );
        assert!(err.to_string().contains("15/01/2024 10:00"));
    }

    #[test]
    fn test_bad_date_and_wrong_type() {
        let err = decode_row::<Sample>(row(json!({"date": "2024-1-99", "target": 5}))).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidDate { ref raw, .. } if raw == "2024-1-99"));

        let err = decode_row::<Sample>(row(json!({"date": "2024-01-15", "target": true}))).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidType { ref field, ref raw, .. } if field == "target" && raw == "true"));

        let err = decode_row::<Sample>(row(json!({"date": "2024-01-15", "target": 1, "done": "yes"}))).unwrap_err();
        assert_eq!(err.field(), "done");
    }

    #[test]
    fn test_timestamp_without_offset_is_utc() {
        let stamped: Stamped = decode_row(row(json!({"created_at": "2024-01-01T08:00:00"}))).unwrap();
        assert_eq!(stamped.created_at.to_rfc3339(), "2024-01-01T08:00:00+00:00");
    }

    #[test]
    fn test_one_bad_row_fails_the_batch() {
        let rows = vec![
            row(json!({"date": "2024-01-15", "target": 1})),
            row(json!({"date": "someday", "target": 1})),
        ];
        assert!(decode_rows::<Sample>(rows).is_err());
    }

    #[test]
    fn test_unknown_columns_are_ignored() {
        let sample: Sample =
            decode_row(row(json!({"date": "2024-01-15", "target": 1, "notes": {"a": [1, 2]}}))).unwrap();
        assert_eq!(sample.target, 1.0);
    }
}
