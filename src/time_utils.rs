// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for calendar days and audit timestamps.
//!
//! Calendar days travel over the wire as `YYYY-MM-DD` and are always derived
//! from the local time zone. Audit timestamps (`created_at`, `updated_at`) are
//! true instants and are kept in UTC.

use chrono::{DateTime, Days, Local, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

/// Wire format for calendar days.
pub const DAY_FORMAT: &str = "%Y-%m-%d";

/// Format a UTC timestamp as RFC3339 with microseconds and a `Z` suffix,
/// matching what PostgREST returns for `timestamptz` columns.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Today's calendar day in the local time zone.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Format a calendar day as `YYYY-MM-DD`.
pub fn format_day(day: NaiveDate) -> String {
    day.format(DAY_FORMAT).to_string()
}

/// Parse a `YYYY-MM-DD` calendar day.
pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, DAY_FORMAT).ok()
}

/// Parse an ISO-8601 timestamp.
///
/// Fractional seconds are tried first, then whole seconds. Timestamps without
/// an offset (PostgREST renders `timestamp` columns that way) are read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%:z") {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Longest trailing window accepted for history and search queries.
pub const MAX_HISTORY_DAYS: u32 = 3660;

/// First day of a trailing window of `days` days ending at `end` (inclusive).
pub fn window_start(end: NaiveDate, days: u32) -> NaiveDate {
    end.checked_sub_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MIN)
}

/// Every calendar day from `start` to `end`, both inclusive.
pub fn days_between(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take_while(|day| *day <= end).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone, Timelike};

    #[test]
    fn test_day_round_trip() {
        let mut day = NaiveDate::from_ymd_opt(2023, 12, 25).unwrap();
        for _ in 0..800 {
            assert_eq!(parse_day(&format_day(day)), Some(day));
            day = day.succ_opt().unwrap();
        }
    }

    #[test]
    fn test_format_day_is_zero_padded() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(format_day(day), "2024-01-05");
    }

    #[test]
    fn test_parse_day_rejects_garbage() {
        assert_eq!(parse_day("2024/01/05"), None);
        assert_eq!(parse_day("2024-13-01"), None);
        assert_eq!(parse_day(""), None);
    }

    #[test]
    fn test_parse_timestamp_fractional_seconds() {
        let ts = parse_timestamp("2024-01-15T10:30:00.123456+00:00").unwrap();
        assert_eq!(ts.hour(), 10);
        assert_eq!(ts.nanosecond(), 123_456_000);
    }

    #[test]
    fn test_parse_timestamp_whole_seconds_with_zulu() {
        let ts = parse_timestamp("2024-01-15T10:30:00Z").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap());
    }

    #[test]
    fn test_parse_timestamp_converts_offsets_to_utc() {
        let ts = parse_timestamp("2024-01-15T09:00:00+09:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_timestamp_without_offset_is_utc() {
        let ts = parse_timestamp("2024-01-15T10:30:00.5").unwrap();
        assert_eq!(ts.day(), 15);
        assert_eq!(ts.hour(), 10);
    }

    #[test]
    fn test_parse_timestamp_rejects_date_only() {
        assert_eq!(parse_timestamp("2024-01-15"), None);
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn test_format_utc_rfc3339() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        assert_eq!(format_utc_rfc3339(ts), "2024-01-15T10:30:00.000000Z");
        assert_eq!(parse_timestamp(&format_utc_rfc3339(ts)), Some(ts));
    }

    #[test]
    fn test_window_and_days_between() {
        let end = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
        let start = window_start(end, 3);
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 2, 28).unwrap());

        let days = days_between(start, end);
        assert_eq!(days.len(), 4);
        assert_eq!(days.first(), Some(&start));
        assert_eq!(days.last(), Some(&end));
    }
}
