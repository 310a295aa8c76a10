// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore integration tests.
//!
//! These tests require the Firestore emulator to be running and
//! FIRESTORE_EMULATOR_HOST to point at it; they are skipped otherwise.

use nutrition_tracker::error::AppError;
use nutrition_tracker::models::{ActivityLevel, Gender};

mod common;
use common::{test_db, test_user};

/// Unique suffix for test isolation.
fn unique_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

#[tokio::test]
async fn test_create_and_lookup_user() {
    require_emulator!();

    let db = test_db().await;
    let id = unique_id();
    let email = format!("{id}@example.com");

    assert!(db.get_user(&id).await.unwrap().is_none());
    assert!(db.get_user_by_email(&email).await.unwrap().is_none());

    db.create_user(&test_user(&id, &email)).await.unwrap();

    let by_id = db.get_user(&id).await.unwrap().expect("user by id");
    assert_eq!(by_id.email, email);
    let by_email = db.get_user_by_email(&email).await.unwrap().expect("user by email");
    assert_eq!(by_email.id, id);
}

#[tokio::test]
async fn test_duplicate_email_conflicts() {
    require_emulator!();

    let db = test_db().await;
    let email = format!("{}@example.com", unique_id());

    db.create_user(&test_user(&unique_id(), &email)).await.unwrap();
    let err = db
        .create_user(&test_user(&unique_id(), &email))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn test_concurrent_sign_ups_single_winner() {
    require_emulator!();

    let db = test_db().await;
    let email = format!("{}@example.com", unique_id());

    let attempts = (0..8).map(|_| {
        let db = db.clone();
        let user = test_user(&unique_id(), &email);
        tokio::spawn(async move { db.create_user(&user).await })
    });
    let results = futures_util::future::join_all(attempts).await;

    let winners = results
        .into_iter()
        .map(|joined| joined.unwrap())
        .filter(|result| result.is_ok())
        .count();
    assert_eq!(winners, 1);
}

#[tokio::test]
async fn test_update_profile_fields() {
    require_emulator!();

    let db = test_db().await;
    let id = unique_id();
    let mut user = test_user(&id, &format!("{id}@example.com"));
    db.create_user(&user).await.unwrap();

    user.weight = Some(72.5);
    user.gender = Some(Gender::Female);
    user.activity_level = Some(ActivityLevel::VeryActive);
    db.update_user(&user).await.unwrap();

    let stored = db.get_user(&id).await.unwrap().unwrap();
    assert_eq!(stored.weight, Some(72.5));
    assert_eq!(stored.gender, Some(Gender::Female));
    assert_eq!(stored.activity_level, Some(ActivityLevel::VeryActive));
}
