// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use fiture_core::db::tables;
use fiture_core::error::AppError;
use fiture_core::models::{TrainingKey, TrainingTargetUpdate};
use fiture_core::services::TrainingTargetManager;

mod common;
use common::{day, other_user, test_context, test_user};

#[tokio::test]
async fn test_exercises_are_independent() {
    let (ctx, store) = test_context();
    let training = TrainingTargetManager::new(&ctx);
    let user = test_user();
    let date = day(2024, 3, 1);

    training
        .create_or_update(&TrainingKey::new(user, date, "Squat"), 5.0)
        .await
        .unwrap();
    training
        .create_or_update(&TrainingKey::new(user, date, "Bench press"), 3.0)
        .await
        .unwrap();
    training
        .create_or_update(&TrainingKey::new(user, date, "Squat"), 6.0)
        .await
        .unwrap();

    assert_eq!(store.rows(tables::TARGETS_TRAINING).len(), 2);
    assert_eq!(training.training_targets().len(), 2);
    assert_eq!(training.target_for("Squat").unwrap().target, 6.0);
    assert_eq!(training.target_for("Bench press").unwrap().target, 3.0);
}

#[tokio::test]
async fn test_exercise_names_with_separators_do_not_collide() {
    let (ctx, _store) = test_context();
    let training = TrainingTargetManager::new(&ctx);
    let user = test_user();
    let date = day(2024, 3, 1);

    training
        .create_or_update(&TrainingKey::new(user, date, "row_2024-03-01"), 2.0)
        .await
        .unwrap();
    training
        .create_or_update(&TrainingKey::new(user, date, "row"), 4.0)
        .await
        .unwrap();

    assert_eq!(training.training_targets().len(), 2);
    assert_eq!(training.target_for("row").unwrap().target, 4.0);
}

#[tokio::test]
async fn test_update_recomputes_achievement() {
    let (ctx, _store) = test_context();
    let training = TrainingTargetManager::new(&ctx);
    let user = test_user();
    let date = day(2024, 3, 1);
    let key = TrainingKey::new(user, date, "Deadlift");
    training.create_or_update(&key, 3.0).await.unwrap();

    training
        .update(user, "Deadlift", TrainingTargetUpdate::attempt(3.0), Some(date))
        .await
        .unwrap();
    let target = training.fetch_one(&key).await.unwrap().unwrap();
    assert!(target.is_achieved);
    assert_eq!(target.progress_percentage(), 100.0);

    training
        .update(user, "Deadlift", TrainingTargetUpdate::target(4.0), None)
        .await
        .unwrap();
    let target = training.target_for("Deadlift").unwrap();
    assert_eq!(target.attempt, 3.0);
    assert!(!target.is_achieved);
}

#[tokio::test]
async fn test_fetch_one_leaves_cache_alone() {
    let (ctx, _store) = test_context();
    let training = TrainingTargetManager::new(&ctx);
    let user = test_user();
    let key = TrainingKey::new(user, day(2024, 3, 2), "Lunge");
    training.create_or_update(&key, 2.0).await.unwrap();
    training.fetch(user, day(2024, 3, 1)).await.unwrap();

    let found = training.fetch_one(&key).await.unwrap();

    assert_eq!(found.unwrap().exercise_type, "Lunge");
    assert!(training.training_targets().is_empty());
    assert_eq!(training.selected_date(), day(2024, 3, 1));
}

#[tokio::test]
async fn test_delete_removes_only_that_exercise() {
    let (ctx, store) = test_context();
    let training = TrainingTargetManager::new(&ctx);
    let user = test_user();
    let date = day(2024, 3, 1);
    for name in ["Squat", "Press"] {
        training
            .create_or_update(&TrainingKey::new(user, date, name), 3.0)
            .await
            .unwrap();
    }

    training.delete(user, "Squat", Some(date)).await.unwrap();

    let names: Vec<String> = training
        .training_targets()
        .into_iter()
        .map(|t| t.exercise_type)
        .collect();
    assert_eq!(names, vec!["Press".to_string()]);
    assert_eq!(store.rows(tables::TARGETS_TRAINING).len(), 1);
}

#[tokio::test]
async fn test_blank_exercise_rejected() {
    let (ctx, _store) = test_context();
    let training = TrainingTargetManager::new(&ctx);

    let err = training
        .create_or_update(&TrainingKey::new(test_user(), day(2024, 3, 1), "  "), 3.0)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::InvalidInput(_)));
}

#[tokio::test]
async fn test_tags_are_trimmed_unique_and_newest_first() {
    let (ctx, store) = test_context();
    let training = TrainingTargetManager::new(&ctx);
    let user = test_user();

    training.create_tag(user, "  Squat ").await.unwrap();
    training.create_tag(user, "Bench press").await.unwrap();

    let err = training.create_tag(user, "squat").await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
    assert_eq!(err.code(), "conflict");

    let err = training.create_tag(user, "   ").await.unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(_)));

    let names: Vec<String> = training.tags().into_iter().map(|t| t.tag_name).collect();
    assert_eq!(names, vec!["Bench press".to_string(), "Squat".to_string()]);
    assert_eq!(store.rows(tables::TRAINING_TAGS).len(), 2);

    // Another user may reuse the name
    training.create_tag(other_user(), "Squat").await.unwrap();
    assert_eq!(training.tags().len(), 1);
}

#[tokio::test]
async fn test_delete_tag_is_scoped_by_user() {
    let (ctx, store) = test_context();
    let training = TrainingTargetManager::new(&ctx);
    let user = test_user();
    training.create_tag(user, "Squat").await.unwrap();
    let tag_id = training.tags()[0].id;

    training.delete_tag(other_user(), tag_id).await.unwrap();
    assert_eq!(store.rows(tables::TRAINING_TAGS).len(), 1);

    training.delete_tag(user, tag_id).await.unwrap();
    assert!(store.rows(tables::TRAINING_TAGS).is_empty());
    assert!(training.tags().is_empty());
}
