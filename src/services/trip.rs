// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Run trip distance tracking.
//!
//! Location samples come from the device; this module only sums the
//! great-circle distance between consecutive samples and, when the trip ends,
//! adds it to the day's run attempt.

use chrono::NaiveDate;
use geo::{Distance, Haversine, Point};

use crate::error::{AppError, Result};
use crate::models::{RunTargetUpdate, UserId};
use crate::services::{RunTargetManager, SyncEvent};

/// Accumulated distance of one run, in meters.
#[derive(Debug, Clone, Default)]
pub struct TripDistance {
    last: Option<Point<f64>>,
    meters: f64,
    samples: usize,
}

impl TripDistance {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a location sample and return the length of the new segment in
    /// meters (0 for the first sample).
    pub fn add_sample(&mut self, latitude: f64, longitude: f64) -> Result<f64> {
        if !(latitude.is_finite() && (-90.0..=90.0).contains(&latitude))
            || !(longitude.is_finite() && (-180.0..=180.0).contains(&longitude))
        {
            return Err(AppError::InvalidInput(format!(
                "Invalid coordinate ({latitude}, {longitude})"
            )));
        }

        // geo points are (x = longitude, y = latitude)
        let point = Point::new(longitude, latitude);
        let segment = self
            .last
            .map_or(0.0, |prev| Haversine.distance(prev, point));

        self.meters += segment;
        self.samples += 1;
        self.last = Some(point);
        Ok(segment)
    }

    pub fn meters(&self) -> f64 {
        self.meters
    }

    pub fn km(&self) -> f64 {
        self.meters / 1000.0
    }

    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Start a new trip.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Add a finished trip to the run attempt for `date` and notify listeners.
///
/// Returns the new attempt in km. A trip with no distance is refused, as is
/// a day without a run target.
pub async fn complete_trip(
    manager: &RunTargetManager,
    user_id: UserId,
    date: NaiveDate,
    trip: &TripDistance,
) -> Result<f64> {
    if trip.meters() <= 0.0 {
        return Err(AppError::InvalidInput(
            "Distance is zero; the run cannot be recorded".to_string(),
        ));
    }

    manager.fetch(user_id, date).await?;
    let current = manager.run_target().ok_or_else(|| {
        AppError::InvalidInput("No run target is set for this day".to_string())
    })?;

    let attempt = current.attempt + trip.km();
    manager
        .update(user_id, RunTargetUpdate::attempt(attempt), Some(date))
        .await?;
    tracing::info!(
        user_id = %user_id,
        date = %date,
        trip_km = trip.km(),
        attempt,
        "Recorded run trip"
    );

    manager.events().post(SyncEvent::RunTargetUpdated);
    Ok(attempt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_sample_adds_no_distance() {
        let mut trip = TripDistance::new();
        assert_eq!(trip.add_sample(35.6812, 139.7671).unwrap(), 0.0);
        assert_eq!(trip.meters(), 0.0);
        assert_eq!(trip.samples(), 1);
    }

    #[test]
    fn test_accumulates_great_circle_distance() {
        // One degree of longitude along the equator is ~111.2 km
        let mut trip = TripDistance::new();
        trip.add_sample(0.0, 0.0).unwrap();
        trip.add_sample(0.0, 0.5).unwrap();
        trip.add_sample(0.0, 1.0).unwrap();

        assert!((trip.km() - 111.19).abs() < 0.1, "got {}", trip.km());
        assert_eq!(trip.samples(), 3);

        trip.reset();
        assert_eq!(trip.meters(), 0.0);
        assert_eq!(trip.samples(), 0);
    }

    #[test]
    fn test_rejects_invalid_coordinates() {
        let mut trip = TripDistance::new();
        assert!(trip.add_sample(91.0, 0.0).is_err());
        assert!(trip.add_sample(0.0, f64::NAN).is_err());
        assert_eq!(trip.samples(), 0);
    }
}
