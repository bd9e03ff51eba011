// ABOUTME: Integration tests for workout program storage and template assignment
// ABOUTME: Assignment is a value copy; later template edits must not propagate
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 EvolveCoach

#![allow(missing_docs, clippy::unwrap_used)]

use evolvecoach::database::{Database, WorkoutProgramUpdate};
use evolvecoach::errors::ErrorCode;
use evolvecoach::models::{Exercise, NewWorkoutProgram, Profile, UserType};
use uuid::Uuid;

async fn create_test_db() -> Database {
    Database::new("sqlite::memory:").await.unwrap()
}

async fn create_trainer(db: &Database, email: &str) -> Uuid {
    let profile = Profile::new(email.to_owned(), Some("Trainer".to_owned()), UserType::Trainer);
    db.create_profile(&profile, "hash").await.unwrap()
}

/// Create a client already connected to the given trainer
async fn create_connected_client(db: &Database, email: &str, trainer: Uuid) -> Uuid {
    let profile = Profile::new(email.to_owned(), Some("Client".to_owned()), UserType::Client);
    let client = db.create_profile(&profile, "hash").await.unwrap();
    let request = db
        .submit_trainer_request(client, trainer, None)
        .await
        .unwrap();
    db.approve_trainer_request(request.id, trainer).await.unwrap();
    client
}

fn strength_block() -> Vec<Exercise> {
    vec![
        Exercise::Strength {
            name: "Back Squat".to_owned(),
            sets: 5,
            reps: 5,
        },
        Exercise::Timed {
            name: "Plank".to_owned(),
            duration_seconds: 60,
        },
    ]
}

fn template_spec() -> NewWorkoutProgram {
    NewWorkoutProgram {
        name: "Strength Base".to_owned(),
        description: Some("Foundational strength block".to_owned()),
        difficulty_level: Some("beginner".to_owned()),
        duration_weeks: Some(8),
        exercises: strength_block(),
        client_id: None,
        is_template: true,
    }
}

#[tokio::test]
async fn test_create_template() {
    let db = create_test_db().await;
    let trainer = create_trainer(&db, "trainer@example.com").await;

    let program = db.create_program(trainer, &template_spec()).await.unwrap();

    assert!(program.is_template);
    assert_eq!(program.client_id, None);
    assert_eq!(program.exercises, strength_block());

    let stored = db.get_program(program.id).await.unwrap().unwrap();
    assert_eq!(stored.exercises, strength_block());
}

#[tokio::test]
async fn test_template_cannot_carry_a_client() {
    let db = create_test_db().await;
    let trainer = create_trainer(&db, "trainer@example.com").await;

    let mut spec = template_spec();
    spec.client_id = Some(Uuid::new_v4());
    let err = db.create_program(trainer, &spec).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
}

#[tokio::test]
async fn test_assignment_snapshots_the_template() {
    let db = create_test_db().await;
    let trainer = create_trainer(&db, "trainer@example.com").await;
    let client = create_connected_client(&db, "client@example.com", trainer).await;

    let template = db.create_program(trainer, &template_spec()).await.unwrap();
    let assignment = db
        .assign_program(template.id, client, trainer)
        .await
        .unwrap();

    assert!(!assignment.is_template);
    assert_eq!(assignment.client_id, Some(client));
    assert_eq!(assignment.name, template.name);
    assert_eq!(assignment.exercises, template.exercises);
    assert_ne!(assignment.id, template.id);

    // Edit the template after assignment
    let updates = WorkoutProgramUpdate {
        exercises: Some(vec![Exercise::Distance {
            name: "Tempo Run".to_owned(),
            meters: 5000,
        }]),
        ..WorkoutProgramUpdate::default()
    };
    db.update_program(template.id, trainer, &updates)
        .await
        .unwrap();

    // The copy is unaffected
    let stored = db.get_program(assignment.id).await.unwrap().unwrap();
    assert_eq!(stored.exercises, strength_block());
}

#[tokio::test]
async fn test_assignment_preconditions() {
    let db = create_test_db().await;
    let trainer = create_trainer(&db, "trainer@example.com").await;
    let other = create_trainer(&db, "other@example.com").await;
    let client = create_connected_client(&db, "client@example.com", trainer).await;

    let template = db.create_program(trainer, &template_spec()).await.unwrap();

    // Another trainer cannot assign it
    let err = db
        .assign_program(template.id, client, other)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::Forbidden);

    // An unconnected client cannot receive it
    let stranger_profile = Profile::new(
        "stranger@example.com".to_owned(),
        None,
        UserType::Client,
    );
    let stranger = db.create_profile(&stranger_profile, "hash").await.unwrap();
    let err = db
        .assign_program(template.id, stranger, trainer)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);

    // An assigned copy is not itself assignable
    let assignment = db
        .assign_program(template.id, client, trainer)
        .await
        .unwrap();
    let err = db
        .assign_program(assignment.id, client, trainer)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
}

#[tokio::test]
async fn test_listings_split_templates_and_assignments() {
    let db = create_test_db().await;
    let trainer = create_trainer(&db, "trainer@example.com").await;
    let client = create_connected_client(&db, "client@example.com", trainer).await;

    let template = db.create_program(trainer, &template_spec()).await.unwrap();
    let assignment = db
        .assign_program(template.id, client, trainer)
        .await
        .unwrap();

    let client_programs = db.list_programs_for_client(client).await.unwrap();
    assert_eq!(client_programs.len(), 1);
    assert_eq!(client_programs[0].id, assignment.id);

    let templates = db.list_templates(trainer).await.unwrap();
    assert_eq!(templates.len(), 1);
    assert_eq!(templates[0].id, template.id);

    let owned = db.list_programs_for_trainer(trainer).await.unwrap();
    assert_eq!(owned.len(), 2);
}

#[tokio::test]
async fn test_only_the_owner_edits_a_program() {
    let db = create_test_db().await;
    let trainer = create_trainer(&db, "trainer@example.com").await;
    let other = create_trainer(&db, "other@example.com").await;

    let template = db.create_program(trainer, &template_spec()).await.unwrap();
    let updates = WorkoutProgramUpdate {
        name: Some("Renamed".to_owned()),
        ..WorkoutProgramUpdate::default()
    };

    let err = db
        .update_program(template.id, other, &updates)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::Forbidden);

    let updated = db
        .update_program(template.id, trainer, &updates)
        .await
        .unwrap();
    assert_eq!(updated.name, "Renamed");
}

#[tokio::test]
async fn test_malformed_stored_exercises_surface_as_errors() {
    let db = create_test_db().await;
    let trainer = create_trainer(&db, "trainer@example.com").await;

    // Write a payload that does not match the closed exercise schema
    let bad_id = Uuid::new_v4();
    sqlx::query(
        r"
        INSERT INTO workout_programs (
            id, trainer_id, client_id, name, description, difficulty_level,
            duration_weeks, exercises, is_template, created_at, updated_at
        ) VALUES ($1, $2, NULL, 'Bad', NULL, NULL, NULL, $3, 1, '2025-01-01', '2025-01-01')
        ",
    )
    .bind(bad_id.to_string())
    .bind(trainer.to_string())
    .bind(r#"[{"kind":"swim","laps":10}]"#)
    .execute(db.pool())
    .await
    .unwrap();

    let err = db.get_program(bad_id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::Internal);
}
