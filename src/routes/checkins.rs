// ABOUTME: Weekly check-in route handlers
// ABOUTME: Clients submit a feeling/energy report; the named trainer reviews it
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 EvolveCoach

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use super::{authenticate, require_client, require_trainer, ServerResources};
use crate::errors::AppError;
use crate::models::{CheckInResponses, EnergyLevel, WorkoutFeeling};

/// Check-in submission payload. Both selections are required; a submission
/// missing either one is rejected before any write.
#[derive(Debug, Deserialize)]
pub struct SubmitCheckInPayload {
    /// Workout feeling selection
    pub feeling: Option<WorkoutFeeling>,
    /// Energy-delta selection
    pub energy: Option<EnergyLevel>,
    /// Optional free-form notes
    #[serde(default)]
    pub notes: Option<String>,
    /// Progress photo URLs
    #[serde(default)]
    pub progress_photos: Vec<String>,
}

/// Trainer review payload
#[derive(Debug, Deserialize)]
pub struct ReviewCheckInPayload {
    /// Written feedback for the client
    pub feedback: String,
}

/// Check-in routes
pub struct CheckInRoutes;

impl CheckInRoutes {
    /// Create all check-in routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/checkins",
                post(Self::handle_submit).get(Self::handle_list),
            )
            .route("/api/checkins/:id/review", post(Self::handle_review))
            .with_state(resources)
    }

    async fn handle_submit(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(payload): Json<SubmitCheckInPayload>,
    ) -> Result<Response, AppError> {
        let viewer = authenticate(&headers, &resources).await?;
        require_client(&viewer)?;

        let feeling = payload
            .feeling
            .ok_or_else(|| AppError::invalid_input("Select how your workouts felt this week"))?;
        let energy = payload
            .energy
            .ok_or_else(|| AppError::invalid_input("Select your energy level for this week"))?;

        let responses = CheckInResponses {
            feeling,
            energy,
            notes: payload.notes,
        };

        let check_in = resources
            .database
            .submit_check_in(viewer.id, &responses, &payload.progress_photos)
            .await?;

        info!(check_in_id = %check_in.id, week = check_in.week_number, "Check-in submitted");
        Ok((StatusCode::CREATED, Json(check_in)).into_response())
    }

    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let viewer = authenticate(&headers, &resources).await?;
        let check_ins = resources.database.list_check_ins(viewer.id).await?;
        Ok((StatusCode::OK, Json(check_ins)).into_response())
    }

    async fn handle_review(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(check_in_id): Path<Uuid>,
        Json(payload): Json<ReviewCheckInPayload>,
    ) -> Result<Response, AppError> {
        let viewer = authenticate(&headers, &resources).await?;
        require_trainer(&viewer)?;

        if payload.feedback.trim().is_empty() {
            return Err(AppError::invalid_input("Feedback cannot be empty"));
        }

        let check_in = resources
            .database
            .review_check_in(check_in_id, viewer.id, &payload.feedback)
            .await?;

        info!(check_in_id = %check_in.id, "Check-in reviewed");
        Ok((StatusCode::OK, Json(check_in)).into_response())
    }
}
