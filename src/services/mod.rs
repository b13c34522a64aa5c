// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - target managers and session plumbing.

pub mod calories;
pub mod events;
pub mod run;
pub mod session;
pub mod snapshot;
pub mod training;
pub mod trip;
pub mod water;
pub mod weight;

pub use calories::{CaloriesState, CaloriesSummary, CaloriesTargetManager};
pub use events::{follow, EventBus, SyncEvent};
pub use run::{RunState, RunTargetManager};
pub use session::{bootstrap, AuthProvider, AuthState, StaticAuth, TokenAuth};
pub use snapshot::DailySnapshot;
pub use training::{TrainingState, TrainingTargetManager};
pub use trip::{complete_trip, TripDistance};
pub use water::{WaterEntryManager, WaterState};
pub use weight::{WeightState, WeightTargetManager};

use chrono::NaiveDate;
use serde::de::DeserializeOwned;

use crate::db::{Query, RowStore};
use crate::error::{AppError, Result};
use crate::models::decode_rows;
use crate::time_utils::{today, window_start, MAX_HISTORY_DAYS};

/// Select and decode rows; one bad row fails the whole fetch.
pub(crate) async fn fetch_rows<T: DeserializeOwned>(store: &dyn RowStore, query: &Query) -> Result<Vec<T>> {
    let rows = store.select(query).await?;
    Ok(decode_rows(rows)?)
}

/// Reject negative, NaN and infinite quantities.
pub(crate) fn validate_amount(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(AppError::InvalidInput(format!(
            "{name} must be a non-negative number"
        )))
    }
}

/// Inclusive `(start, today)` bounds of a trailing window of `days` days.
pub(crate) fn history_window(days: u32) -> Result<(NaiveDate, NaiveDate)> {
    if days > MAX_HISTORY_DAYS {
        return Err(AppError::InvalidInput(format!(
            "History window must be at most {MAX_HISTORY_DAYS} days"
        )));
    }
    let end = today();
    Ok((window_start(end, days), end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount("target", 0.0).is_ok());
        assert!(validate_amount("target", 5.5).is_ok());
        assert!(matches!(
            validate_amount("target", -1.0),
            Err(AppError::InvalidInput(_))
        ));
        assert!(validate_amount("target", f64::NAN).is_err());
        assert!(validate_amount("target", f64::INFINITY).is_err());
    }

    #[test]
    fn test_history_window_is_capped() {
        let (start, end) = history_window(30).unwrap();
        assert_eq!((end - start).num_days(), 30);
        assert!(history_window(MAX_HISTORY_DAYS).is_ok());
        assert!(matches!(
            history_window(MAX_HISTORY_DAYS + 1),
            Err(AppError::InvalidInput(_))
        ));
        assert!(history_window(u32::MAX).is_err());
    }
}
