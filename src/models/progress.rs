// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Derived progress aggregates.
//!
//! Pure functions over attempt/target pairs and calorie totals. Nothing here
//! touches the row store; managers call these on their cached state.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::time_utils::days_between;

/// Percentage of `target` reached by `attempt`, clamped to `[0, 100]`.
///
/// Returns 0 when there is no positive target.
pub fn progress_percentage(attempt: f64, target: f64) -> f64 {
    if target > 0.0 {
        (attempt / target * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    }
}

pub fn is_achieved(attempt: f64, target: f64) -> bool {
    attempt >= target
}

/// Sum of calories across ledger entries.
pub fn total_calories<'a, I>(calories: I) -> f64
where
    I: IntoIterator<Item = &'a f64>,
{
    calories.into_iter().sum()
}

/// Unclamped percentage of a calorie target consumed, if there is a target.
fn calorie_percentage(total: f64, target: Option<f64>) -> Option<f64> {
    match target {
        Some(target) if target > 0.0 => Some(total / target * 100.0),
        _ => None,
    }
}

/// An sRGB color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Rgb {
    pub const GREEN: Rgb = Rgb::new(0, 255, 0);
    pub const YELLOW: Rgb = Rgb::new(255, 255, 0);
    pub const ORANGE: Rgb = Rgb::new(255, 165, 0);
    pub const RED: Rgb = Rgb::new(255, 0, 0);

    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    fn from_channels(red: f64, green: f64) -> Self {
        Self::new(channel(red), channel(green), 0)
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

fn channel(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Progress bar color for a day's calories.
///
/// Green fades to yellow up to 80% of the target, yellow to orange up to 90%,
/// orange to red below 100%, and red at or past the target.
pub fn calorie_progress_color(total: f64, target: Option<f64>) -> Rgb {
    let Some(p) = calorie_percentage(total, target) else {
        return Rgb::GREEN;
    };

    if p >= 100.0 {
        Rgb::RED
    } else if p <= 80.0 {
        Rgb::from_channels(p.max(0.0) / 80.0 * 255.0, 255.0)
    } else if p <= 90.0 {
        Rgb::from_channels(255.0, 255.0 - 90.0 * ((p - 80.0) / 10.0))
    } else {
        Rgb::from_channels(255.0, 165.0 - 165.0 * ((p - 90.0) / 10.0))
    }
}

/// Illustration shown on the calories card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CalorieImage {
    Default,
    Overindulgence,
}

/// `Overindulgence` once the total reaches 120% of a positive target.
pub fn calorie_image(total: f64, target: Option<f64>) -> CalorieImage {
    match calorie_percentage(total, target) {
        Some(p) if p >= 120.0 => CalorieImage::Overindulgence,
        _ => CalorieImage::Default,
    }
}

/// Coarse status color for the calories card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusColor {
    Green,
    Orange,
    Red,
}

pub fn calorie_status_color(total: f64, target: Option<f64>) -> StatusColor {
    match calorie_percentage(total, target) {
        None => StatusColor::Green,
        Some(p) if p >= 120.0 => StatusColor::Red,
        Some(p) if p >= 80.0 => StatusColor::Green,
        Some(_) => StatusColor::Orange,
    }
}

/// True when a positive target has been exceeded.
pub fn is_over_target(total: f64, target: Option<f64>) -> bool {
    matches!(target, Some(target) if target > 0.0 && total > target)
}

/// One point of a per-day chart series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub value: f64,
}

/// Fold `(date, value)` samples into one point per day from `start` to `end`,
/// summing samples on the same day and filling missing days with zero.
pub fn dense_daily_series<I>(start: NaiveDate, end: NaiveDate, samples: I) -> Vec<DailyTotal>
where
    I: IntoIterator<Item = (NaiveDate, f64)>,
{
    let mut by_day: HashMap<NaiveDate, f64> = HashMap::new();
    for (date, value) in samples {
        *by_day.entry(date).or_default() += value;
    }

    days_between(start, end)
        .into_iter()
        .map(|date| DailyTotal {
            date,
            value: by_day.get(&date).copied().unwrap_or(0.0),
        })
        .collect()
}
