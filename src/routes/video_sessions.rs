// ABOUTME: Video session route handlers
// ABOUTME: Trainers schedule and settle sessions; both sides list their own
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 EvolveCoach

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use super::{authenticate, require_trainer, ServerResources};
use crate::errors::AppError;
use crate::models::SessionStatus;

/// Session scheduling payload
#[derive(Debug, Deserialize)]
pub struct ScheduleSessionPayload {
    /// Attending client
    pub client_id: Uuid,
    /// Scheduled start
    pub session_date: DateTime<Utc>,
    /// Planned length in minutes
    #[serde(default)]
    pub duration_minutes: Option<i64>,
    /// Join link
    #[serde(default)]
    pub meeting_url: Option<String>,
}

/// Session settlement payload
#[derive(Debug, Deserialize)]
pub struct UpdateSessionStatusPayload {
    /// New status, `completed` or `cancelled`
    pub status: SessionStatus,
}

/// Video session routes
pub struct VideoSessionRoutes;

impl VideoSessionRoutes {
    /// Create all video session routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/sessions",
                post(Self::handle_schedule).get(Self::handle_list),
            )
            .route("/api/sessions/:id/status", post(Self::handle_update_status))
            .with_state(resources)
    }

    async fn handle_schedule(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(payload): Json<ScheduleSessionPayload>,
    ) -> Result<Response, AppError> {
        let viewer = authenticate(&headers, &resources).await?;
        require_trainer(&viewer)?;

        let session = resources
            .database
            .schedule_session(
                viewer.id,
                payload.client_id,
                payload.session_date,
                payload.duration_minutes,
                payload.meeting_url.as_deref(),
            )
            .await?;

        info!(session_id = %session.id, client_id = %payload.client_id, "Session scheduled");
        Ok((StatusCode::CREATED, Json(session)).into_response())
    }

    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let viewer = authenticate(&headers, &resources).await?;
        let sessions = resources.database.list_sessions(viewer.id).await?;
        Ok((StatusCode::OK, Json(sessions)).into_response())
    }

    async fn handle_update_status(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(session_id): Path<Uuid>,
        Json(payload): Json<UpdateSessionStatusPayload>,
    ) -> Result<Response, AppError> {
        let viewer = authenticate(&headers, &resources).await?;
        require_trainer(&viewer)?;

        let session = resources
            .database
            .update_session_status(session_id, viewer.id, payload.status)
            .await?;
        Ok((StatusCode::OK, Json(session)).into_response())
    }
}
