// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! One-day view across all five managers.

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::Result;
use crate::models::{RunTarget, TrainingTarget, UserId};
use crate::services::{
    CaloriesSummary, CaloriesTargetManager, RunTargetManager, TrainingTargetManager,
    WaterEntryManager, WeightTargetManager,
};
use crate::AppContext;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetProgress {
    pub target: f64,
    pub attempt: f64,
    pub percentage: f64,
    pub achieved: bool,
}

impl From<&RunTarget> for TargetProgress {
    fn from(run: &RunTarget) -> Self {
        Self {
            target: run.target,
            attempt: run.attempt,
            percentage: run.progress_percentage(),
            achieved: run.is_achieved,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExerciseProgress {
    pub exercise_type: String,
    #[serde(flatten)]
    pub progress: TargetProgress,
}

impl From<&TrainingTarget> for ExerciseProgress {
    fn from(t: &TrainingTarget) -> Self {
        Self {
            exercise_type: t.exercise_type.clone(),
            progress: TargetProgress {
                target: t.target,
                attempt: t.attempt,
                percentage: t.progress_percentage(),
                achieved: t.is_achieved,
            },
        }
    }
}

/// Everything tracked for one user on one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySnapshot {
    pub user_id: UserId,
    pub date: NaiveDate,
    pub calories: CaloriesSummary,
    pub entries: usize,
    pub run: Option<TargetProgress>,
    pub training: Vec<ExerciseProgress>,
    pub water_ml: f64,
    pub weight_kg: Option<f64>,
    pub latest_weight_kg: Option<f64>,
}

impl DailySnapshot {
    /// Fetch every manager for `date` concurrently with throwaway managers.
    pub async fn load(ctx: &AppContext, user_id: UserId, date: NaiveDate) -> Result<Self> {
        let calories = CaloriesTargetManager::new(ctx);
        let run = RunTargetManager::new(ctx);
        let training = TrainingTargetManager::new(ctx);
        let water = WaterEntryManager::new(ctx);
        let weight = WeightTargetManager::new(ctx);

        let (_, _, _, _, _, _, latest) = futures_util::try_join!(
            calories.fetch_target(user_id, date),
            calories.fetch_entries(user_id, date),
            run.fetch(user_id, date),
            training.fetch(user_id, date),
            water.fetch(user_id, date),
            weight.fetch_entry(user_id, date),
            weight.fetch_latest(user_id),
        )?;

        Ok(Self {
            user_id,
            date,
            calories: calories.summary(),
            entries: calories.entries().len(),
            run: run.run_target().as_ref().map(TargetProgress::from),
            training: training
                .training_targets()
                .iter()
                .map(ExerciseProgress::from)
                .collect(),
            water_ml: water.total_ml(),
            weight_kg: weight.weight_entry().map(|w| w.weight),
            latest_weight_kg: latest.map(|w| w.weight),
        })
    }
}
