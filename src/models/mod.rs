// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod calories;
pub mod codec;
pub mod keys;
pub mod progress;
pub mod run;
pub mod training;
pub mod user;
pub mod water;
pub mod weight;

pub use calories::{CaloriesEntry, CaloriesTarget, NewCaloriesEntry};
pub use codec::{decode_row, decode_rows, DecodeError};
pub use keys::{DayKey, TrainingKey};
pub use progress::{CalorieImage, DailyTotal, Rgb, StatusColor};
pub use run::{RunTarget, RunTargetUpdate};
pub use training::{TrainingTag, TrainingTarget, TrainingTargetUpdate};
pub use user::{User, UserId};
pub use water::WaterEntry;
pub use weight::WeightEntry;
