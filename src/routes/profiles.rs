// ABOUTME: Profile route handlers for owner updates and directories
// ABOUTME: Owner-scoped edits plus the trainer directory and a trainer's client roster
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 EvolveCoach

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};

use super::{authenticate, require_client, require_trainer, ServerResources};
use crate::database::{ClientProfileUpdate, ProfileUpdate, TrainerProfileUpdate};
use crate::errors::AppError;

/// Profile routes
pub struct ProfileRoutes;

impl ProfileRoutes {
    /// Create all profile routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/profiles/me", put(Self::handle_update_profile))
            .route(
                "/api/profiles/me/trainer",
                put(Self::handle_update_trainer_profile),
            )
            .route(
                "/api/profiles/me/client",
                put(Self::handle_update_client_profile),
            )
            .route("/api/trainers", get(Self::handle_list_trainers))
            .route("/api/clients", get(Self::handle_list_clients))
            .with_state(resources)
    }

    async fn handle_update_profile(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(updates): Json<ProfileUpdate>,
    ) -> Result<Response, AppError> {
        let viewer = authenticate(&headers, &resources).await?;
        let updated = resources.database.update_profile(viewer.id, &updates).await?;
        Ok((StatusCode::OK, Json(updated)).into_response())
    }

    async fn handle_update_trainer_profile(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(updates): Json<TrainerProfileUpdate>,
    ) -> Result<Response, AppError> {
        let viewer = authenticate(&headers, &resources).await?;
        require_trainer(&viewer)?;
        let updated = resources
            .database
            .update_trainer_profile(viewer.id, &updates)
            .await?;
        Ok((StatusCode::OK, Json(updated)).into_response())
    }

    async fn handle_update_client_profile(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(updates): Json<ClientProfileUpdate>,
    ) -> Result<Response, AppError> {
        let viewer = authenticate(&headers, &resources).await?;
        require_client(&viewer)?;
        let updated = resources
            .database
            .update_client_profile(viewer.id, &updates)
            .await?;
        Ok((StatusCode::OK, Json(updated)).into_response())
    }

    /// Public trainer directory used for trainer search
    async fn handle_list_trainers(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        authenticate(&headers, &resources).await?;
        let trainers = resources.database.list_trainers().await?;
        Ok((StatusCode::OK, Json(trainers)).into_response())
    }

    /// The caller's connected clients
    async fn handle_list_clients(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let viewer = authenticate(&headers, &resources).await?;
        require_trainer(&viewer)?;
        let clients = resources
            .database
            .list_clients_for_trainer(viewer.id)
            .await?;
        Ok((StatusCode::OK, Json(clients)).into_response())
    }
}
