// ABOUTME: Integration tests for the trainer connection request workflow
// ABOUTME: Covers pending->approved/rejected transitions, the atomic grant, and duplicate prevention
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 EvolveCoach

#![allow(missing_docs, clippy::unwrap_used)]

use std::time::Duration;

use evolvecoach::database::Database;
use evolvecoach::errors::ErrorCode;
use evolvecoach::models::{Profile, RequestStatus, UserType};
use uuid::Uuid;

async fn create_test_db() -> Database {
    Database::new("sqlite::memory:").await.unwrap()
}

async fn create_trainer(db: &Database, email: &str) -> Uuid {
    let profile = Profile::new(email.to_owned(), Some("Trainer".to_owned()), UserType::Trainer);
    db.create_profile(&profile, "hash").await.unwrap()
}

async fn create_client(db: &Database, email: &str) -> Uuid {
    let profile = Profile::new(email.to_owned(), Some("Client".to_owned()), UserType::Client);
    db.create_profile(&profile, "hash").await.unwrap()
}

#[tokio::test]
async fn test_submit_creates_pending_request() {
    let db = create_test_db().await;
    let trainer = create_trainer(&db, "trainer@example.com").await;
    let client = create_client(&db, "client@example.com").await;

    let request = db
        .submit_trainer_request(client, trainer, Some("Hi"))
        .await
        .unwrap();

    assert_eq!(request.status, RequestStatus::Pending);
    assert_eq!(request.client_id, client);
    assert_eq!(request.trainer_id, trainer);
    assert_eq!(request.message.as_deref(), Some("Hi"));

    let stored = db.get_trainer_request(request.id).await.unwrap().unwrap();
    assert_eq!(stored.status, RequestStatus::Pending);
}

#[tokio::test]
async fn test_submit_to_non_trainer_is_rejected() {
    let db = create_test_db().await;
    let client_a = create_client(&db, "a@example.com").await;
    let client_b = create_client(&db, "b@example.com").await;

    let err = db
        .submit_trainer_request(client_a, client_b, None)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);

    let err = db
        .submit_trainer_request(client_a, Uuid::new_v4(), None)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);
}

#[tokio::test]
async fn test_duplicate_pending_request_is_a_conflict() {
    let db = create_test_db().await;
    let trainer = create_trainer(&db, "trainer@example.com").await;
    let client = create_client(&db, "client@example.com").await;

    db.submit_trainer_request(client, trainer, None)
        .await
        .unwrap();
    let err = db
        .submit_trainer_request(client, trainer, Some("again"))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::Conflict);
}

#[tokio::test]
async fn test_resubmission_allowed_after_rejection() {
    let db = create_test_db().await;
    let trainer = create_trainer(&db, "trainer@example.com").await;
    let client = create_client(&db, "client@example.com").await;

    let first = db
        .submit_trainer_request(client, trainer, None)
        .await
        .unwrap();
    db.reject_trainer_request(first.id, trainer).await.unwrap();

    // The settled row stays behind as history; only pending rows are unique
    let second = db
        .submit_trainer_request(client, trainer, None)
        .await
        .unwrap();
    assert_eq!(second.status, RequestStatus::Pending);
    assert_ne!(second.id, first.id);
}

#[tokio::test]
async fn test_approve_grants_the_connection_atomically() {
    let db = create_test_db().await;
    let trainer = create_trainer(&db, "trainer@example.com").await;
    let client = create_client(&db, "client@example.com").await;

    let before = db.get_client_profile(client).await.unwrap().unwrap();
    assert_eq!(before.trainer_id, None);

    let request = db
        .submit_trainer_request(client, trainer, None)
        .await
        .unwrap();
    let approved = db.approve_trainer_request(request.id, trainer).await.unwrap();

    assert_eq!(approved.status, RequestStatus::Approved);
    let after = db.get_client_profile(client).await.unwrap().unwrap();
    assert_eq!(after.trainer_id, Some(trainer));
}

#[tokio::test]
async fn test_only_the_addressed_trainer_can_settle() {
    let db = create_test_db().await;
    let trainer = create_trainer(&db, "trainer@example.com").await;
    let other = create_trainer(&db, "other@example.com").await;
    let client = create_client(&db, "client@example.com").await;

    let request = db
        .submit_trainer_request(client, trainer, None)
        .await
        .unwrap();

    let err = db
        .approve_trainer_request(request.id, other)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::Forbidden);

    let err = db
        .reject_trainer_request(request.id, other)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::Forbidden);

    // The request is untouched and the connection was not granted
    let stored = db.get_trainer_request(request.id).await.unwrap().unwrap();
    assert_eq!(stored.status, RequestStatus::Pending);
    let profile = db.get_client_profile(client).await.unwrap().unwrap();
    assert_eq!(profile.trainer_id, None);
}

#[tokio::test]
async fn test_settled_requests_are_terminal() {
    let db = create_test_db().await;
    let trainer = create_trainer(&db, "trainer@example.com").await;
    let client = create_client(&db, "client@example.com").await;

    let request = db
        .submit_trainer_request(client, trainer, None)
        .await
        .unwrap();
    db.approve_trainer_request(request.id, trainer).await.unwrap();

    let err = db
        .approve_trainer_request(request.id, trainer)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::Conflict);

    let err = db
        .reject_trainer_request(request.id, trainer)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::Conflict);

    let stored = db.get_trainer_request(request.id).await.unwrap().unwrap();
    assert_eq!(stored.status, RequestStatus::Approved);
}

#[tokio::test]
async fn test_reject_does_not_touch_the_client_profile() {
    let db = create_test_db().await;
    let trainer = create_trainer(&db, "trainer@example.com").await;
    let client = create_client(&db, "client@example.com").await;

    let request = db
        .submit_trainer_request(client, trainer, None)
        .await
        .unwrap();
    let rejected = db.reject_trainer_request(request.id, trainer).await.unwrap();

    assert_eq!(rejected.status, RequestStatus::Rejected);
    let profile = db.get_client_profile(client).await.unwrap().unwrap();
    assert_eq!(profile.trainer_id, None);
}

#[tokio::test]
async fn test_listing_is_ownership_scoped_and_newest_first() {
    let db = create_test_db().await;
    let trainer_a = create_trainer(&db, "a@example.com").await;
    let trainer_b = create_trainer(&db, "b@example.com").await;
    let client = create_client(&db, "client@example.com").await;

    db.submit_trainer_request(client, trainer_a, Some("first"))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;
    db.submit_trainer_request(client, trainer_b, Some("second"))
        .await
        .unwrap();

    // The client sees both rows, newest first
    let client_view = db.list_trainer_requests(client).await.unwrap();
    assert_eq!(client_view.len(), 2);
    assert_eq!(client_view[0].request.message.as_deref(), Some("second"));
    assert_eq!(client_view[1].request.message.as_deref(), Some("first"));
    assert_eq!(client_view[0].client.id, client);

    // Each trainer sees only their own row
    let a_view = db.list_trainer_requests(trainer_a).await.unwrap();
    assert_eq!(a_view.len(), 1);
    assert_eq!(a_view[0].request.trainer_id, trainer_a);
    assert_eq!(a_view[0].trainer.id, trainer_a);

    let b_view = db.list_trainer_requests(trainer_b).await.unwrap();
    assert_eq!(b_view.len(), 1);
    assert_eq!(b_view[0].request.trainer_id, trainer_b);
}

#[tokio::test]
async fn test_full_connection_scenario() {
    let db = create_test_db().await;
    let trainer = create_trainer(&db, "trainer@example.com").await;
    let client = create_client(&db, "client@example.com").await;

    // Client requests the trainer with an introduction
    let request = db
        .submit_trainer_request(client, trainer, Some("Hi"))
        .await
        .unwrap();

    // Trainer approves
    db.approve_trainer_request(request.id, trainer).await.unwrap();

    // The client's profile now shows the connection
    let profile = db.get_client_profile(client).await.unwrap().unwrap();
    assert_eq!(profile.trainer_id, Some(trainer));

    // The trainer's list no longer shows any pending request
    let trainer_view = db.list_trainer_requests(trainer).await.unwrap();
    assert!(trainer_view
        .iter()
        .all(|r| r.request.status != RequestStatus::Pending));

    // And the connected client shows up on the trainer's roster
    let clients = db.list_clients_for_trainer(trainer).await.unwrap();
    assert_eq!(clients.len(), 1);
    assert_eq!(clients[0].profile.id, client);
}
