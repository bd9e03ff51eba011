// ABOUTME: Integration tests for profile creation, owner updates, and directories
// ABOUTME: Signup creates the extension row; client updates cannot touch the connection
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 EvolveCoach

#![allow(missing_docs, clippy::unwrap_used)]

use evolvecoach::database::{ClientProfileUpdate, Database, ProfileUpdate, TrainerProfileUpdate};
use evolvecoach::errors::ErrorCode;
use evolvecoach::models::{Profile, UserType};

async fn create_test_db() -> Database {
    Database::new("sqlite::memory:").await.unwrap()
}

#[tokio::test]
async fn test_signup_creates_the_extension_row() {
    let db = create_test_db().await;

    let trainer = Profile::new(
        "trainer@example.com".to_owned(),
        Some("Alex Coach".to_owned()),
        UserType::Trainer,
    );
    db.create_profile(&trainer, "hash").await.unwrap();

    let stored = db.get_profile(trainer.id).await.unwrap().unwrap();
    assert_eq!(stored.email, "trainer@example.com");
    assert_eq!(stored.user_type, UserType::Trainer);

    // The trainer extension exists and the client one does not
    assert!(db.get_trainer_profile(trainer.id).await.unwrap().is_some());
    assert!(db.get_client_profile(trainer.id).await.unwrap().is_none());

    let client = Profile::new("client@example.com".to_owned(), None, UserType::Client);
    db.create_profile(&client, "hash").await.unwrap();
    let extension = db.get_client_profile(client.id).await.unwrap().unwrap();
    assert_eq!(extension.trainer_id, None);
    assert!(extension.goals.is_empty());
}

#[tokio::test]
async fn test_duplicate_email_is_rejected() {
    let db = create_test_db().await;

    let first = Profile::new("same@example.com".to_owned(), None, UserType::Client);
    db.create_profile(&first, "hash").await.unwrap();

    let second = Profile::new("same@example.com".to_owned(), None, UserType::Trainer);
    let err = db.create_profile(&second, "hash").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);

    // The failed signup left no orphaned extension row behind
    assert!(db.get_trainer_profile(second.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_base_profile_update_merges_fields() {
    let db = create_test_db().await;
    let profile = Profile::new(
        "user@example.com".to_owned(),
        Some("Before".to_owned()),
        UserType::Client,
    );
    db.create_profile(&profile, "hash").await.unwrap();

    let updated = db
        .update_profile(
            profile.id,
            &ProfileUpdate {
                full_name: Some("After".to_owned()),
                avatar_url: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.full_name.as_deref(), Some("After"));
    // Untouched fields survive the partial update
    assert_eq!(updated.email, "user@example.com");
    assert!(updated.updated_at >= profile.updated_at);
}

#[tokio::test]
async fn test_trainer_profile_update() {
    let db = create_test_db().await;
    let profile = Profile::new("trainer@example.com".to_owned(), None, UserType::Trainer);
    db.create_profile(&profile, "hash").await.unwrap();

    let updated = db
        .update_trainer_profile(
            profile.id,
            &TrainerProfileUpdate {
                bio: Some("Strength and conditioning".to_owned()),
                hourly_rate: Some(80.0),
                specializations: Some(vec!["powerlifting".to_owned(), "mobility".to_owned()]),
                ..TrainerProfileUpdate::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.bio.as_deref(), Some("Strength and conditioning"));
    assert_eq!(updated.hourly_rate, Some(80.0));
    assert_eq!(updated.specializations.len(), 2);

    // A later partial update leaves earlier fields in place
    let updated = db
        .update_trainer_profile(
            profile.id,
            &TrainerProfileUpdate {
                business_name: Some("Evolve Strength".to_owned()),
                ..TrainerProfileUpdate::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.bio.as_deref(), Some("Strength and conditioning"));
    assert_eq!(updated.business_name.as_deref(), Some("Evolve Strength"));
}

#[tokio::test]
async fn test_client_profile_update_cannot_set_the_connection() {
    let db = create_test_db().await;
    let profile = Profile::new("client@example.com".to_owned(), None, UserType::Client);
    db.create_profile(&profile, "hash").await.unwrap();

    let updated = db
        .update_client_profile(
            profile.id,
            &ClientProfileUpdate {
                fitness_level: Some("intermediate".to_owned()),
                goals: Some(vec!["lose weight".to_owned()]),
                height_cm: Some(178.0),
                weight_kg: Some(82.5),
                ..ClientProfileUpdate::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.fitness_level.as_deref(), Some("intermediate"));
    assert_eq!(updated.goals, ["lose weight"]);
    // The update surface has no trainer_id field; the connection is untouched
    assert_eq!(updated.trainer_id, None);
}

#[tokio::test]
async fn test_trainer_directory_lists_only_trainers() {
    let db = create_test_db().await;

    for (email, user_type) in [
        ("t1@example.com", UserType::Trainer),
        ("t2@example.com", UserType::Trainer),
        ("c1@example.com", UserType::Client),
    ] {
        let profile = Profile::new(email.to_owned(), None, user_type);
        db.create_profile(&profile, "hash").await.unwrap();
    }

    let trainers = db.list_trainers().await.unwrap();
    assert_eq!(trainers.len(), 2);
    assert!(trainers
        .iter()
        .all(|t| t.profile.user_type == UserType::Trainer));
}

#[tokio::test]
async fn test_login_lookup_returns_the_stored_hash() {
    let db = create_test_db().await;
    let profile = Profile::new("user@example.com".to_owned(), None, UserType::Client);
    db.create_profile(&profile, "stored-hash").await.unwrap();

    let (found, hash) = db
        .get_profile_with_hash_by_email("user@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, profile.id);
    assert_eq!(hash, "stored-hash");

    assert!(db
        .get_profile_with_hash_by_email("missing@example.com")
        .await
        .unwrap()
        .is_none());
}
