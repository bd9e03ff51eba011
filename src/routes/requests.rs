// ABOUTME: Trainer connection request route handlers
// ABOUTME: Clients submit, the addressed trainer settles, both sides list their own rows
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

/// Connection request submission payload
#[derive(Debug, Deserialize)]
pub struct SubmitRequestPayload {
    /// Addressed trainer
    pub trainer_id: Uuid,
    /// Optional introduction shown to the trainer
    #[serde(default)]
    pub message: Option<String>,
}

/// Connection request routes
pub struct RequestRoutes;

impl RequestRoutes {
    /// Create all connection request routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/requests",
                post(Self::handle_submit).get(Self::handle_list),
            )
            .route("/api/requests/:id/approve", post(Self::handle_approve))
            .route("/api/requests/:id/reject", post(Self::handle_reject))
            .with_state(resources)
    }

    async fn handle_submit(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(payload): Json<SubmitRequestPayload>,
    ) -> Result<Response, AppError> {
        let viewer = authenticate(&headers, &resources).await?;
        require_client(&viewer)?;

        let request = resources
            .database
            .submit_trainer_request(viewer.id, payload.trainer_id, payload.message.as_deref())
            .await?;

        info!(request_id = %request.id, trainer_id = %payload.trainer_id, "Connection request submitted");
        Ok((StatusCode::CREATED, Json(request)).into_response())
    }

    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let viewer = authenticate(&headers, &resources).await?;
        let requests = resources.database.list_trainer_requests(viewer.id).await?;
        Ok((StatusCode::OK, Json(requests)).into_response())
    }

    async fn handle_approve(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(request_id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        let viewer = authenticate(&headers, &resources).await?;
        require_trainer(&viewer)?;

        let request = resources
            .database
            .approve_trainer_request(request_id, viewer.id)
            .await?;

        info!(request_id = %request.id, client_id = %request.client_id, "Connection request approved");
        Ok((StatusCode::OK, Json(request)).into_response())
    }

    async fn handle_reject(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(request_id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        let viewer = authenticate(&headers, &resources).await?;
        require_trainer(&viewer)?;

        let request = resources
            .database
            .reject_trainer_request(request_id, viewer.id)
            .await?;

        info!(request_id = %request.id, "Connection request rejected");
        Ok((StatusCode::OK, Json(request)).into_response())
    }
}
