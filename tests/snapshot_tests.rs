// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use fiture_core::error::AppError;
use fiture_core::models::{NewCaloriesEntry, RunTargetUpdate, TrainingKey, TrainingTargetUpdate};
use fiture_core::services::{
    CaloriesTargetManager, DailySnapshot, RunTargetManager, TrainingTargetManager,
    WaterEntryManager, WeightTargetManager,
};

mod common;
use common::{day, other_user, test_context, test_user};

#[tokio::test]
async fn test_snapshot_collects_every_manager() {
    let (ctx, _store) = test_context();
    let user = test_user();
    let date = day(2024, 5, 10);

    let calories = CaloriesTargetManager::new(&ctx);
    calories.create_or_update_target(user, 2000.0, date).await.unwrap();
    calories
        .add_entry(user, NewCaloriesEntry::new("Oatmeal", 350.0), date)
        .await
        .unwrap();
    calories
        .add_entry(user, NewCaloriesEntry::new("Curry", 650.0), date)
        .await
        .unwrap();

    let run = RunTargetManager::new(&ctx);
    run.create_or_update(user, 5.0, date).await.unwrap();
    run.update(user, RunTargetUpdate::attempt(2.5), Some(date))
        .await
        .unwrap();

    let training = TrainingTargetManager::new(&ctx);
    training
        .create_or_update(&TrainingKey::new(user, date, "Squat"), 4.0)
        .await
        .unwrap();
    training
        .update(user, "Squat", TrainingTargetUpdate::attempt(4.0), Some(date))
        .await
        .unwrap();

    WaterEntryManager::new(&ctx)
        .create_or_update(user, 1500.0, date)
        .await
        .unwrap();
    let weight = WeightTargetManager::new(&ctx);
    weight.create_or_update(user, 64.2, date).await.unwrap();
    weight.create_or_update(user, 63.9, day(2024, 5, 12)).await.unwrap();

    let snapshot = DailySnapshot::load(&ctx, user, date).await.unwrap();

    assert_eq!(snapshot.date, date);
    assert_eq!(snapshot.entries, 2);
    assert_eq!(snapshot.calories.total, 1000.0);
    assert_eq!(snapshot.calories.percentage, 50.0);
    let run = snapshot.run.unwrap();
    assert_eq!(run.percentage, 50.0);
    assert!(!run.achieved);
    assert_eq!(snapshot.training.len(), 1);
    assert_eq!(snapshot.training[0].exercise_type, "Squat");
    assert!(snapshot.training[0].progress.achieved);
    assert_eq!(snapshot.water_ml, 1500.0);
    assert_eq!(snapshot.weight_kg, Some(64.2));
    assert_eq!(snapshot.latest_weight_kg, Some(63.9));
}

#[tokio::test]
async fn test_snapshot_of_empty_day() {
    let (ctx, _store) = test_context();
    WaterEntryManager::new(&ctx)
        .create_or_update(other_user(), 900.0, day(2024, 5, 10))
        .await
        .unwrap();

    let snapshot = DailySnapshot::load(&ctx, test_user(), day(2024, 5, 10))
        .await
        .unwrap();

    assert_eq!(snapshot.entries, 0);
    assert_eq!(snapshot.calories.target, None);
    assert!(snapshot.run.is_none());
    assert!(snapshot.training.is_empty());
    assert_eq!(snapshot.water_ml, 0.0);
    assert_eq!(snapshot.weight_kg, None);
    assert_eq!(snapshot.latest_weight_kg, None);

    let json = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(json["date"], "2024-05-10");
    assert_eq!(json["user_id"], test_user().to_string());
}

#[tokio::test]
async fn test_snapshot_fails_when_offline() {
    let (ctx, store) = test_context();
    store.set_offline(true);

    let err = DailySnapshot::load(&ctx, test_user(), day(2024, 5, 10))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Store(_)));
    assert!(err.is_transient());
}
