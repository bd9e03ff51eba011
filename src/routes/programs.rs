// ABOUTME: Workout program route handlers
// ABOUTME: Trainers create, edit, and assign; clients list what was assigned to them
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 EvolveCoach

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use super::{authenticate, require_trainer, ServerResources};
use crate::database::WorkoutProgramUpdate;
use crate::errors::AppError;
use crate::models::{NewWorkoutProgram, UserType};

/// Template assignment payload
#[derive(Debug, Deserialize)]
pub struct AssignProgramPayload {
    /// Source template
    pub template_id: Uuid,
    /// Receiving client
    pub client_id: Uuid,
}

/// Workout program routes
pub struct ProgramRoutes;

impl ProgramRoutes {
    /// Create all program routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/programs",
                post(Self::handle_create).get(Self::handle_list),
            )
            .route("/api/programs/templates", get(Self::handle_list_templates))
            .route("/api/programs/assign", post(Self::handle_assign))
            .route("/api/programs/:id", put(Self::handle_update))
            .with_state(resources)
    }

    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(spec): Json<NewWorkoutProgram>,
    ) -> Result<Response, AppError> {
        let viewer = authenticate(&headers, &resources).await?;
        require_trainer(&viewer)?;

        let program = resources.database.create_program(viewer.id, &spec).await?;
        info!(program_id = %program.id, is_template = program.is_template, "Program created");
        Ok((StatusCode::CREATED, Json(program)).into_response())
    }

    /// Clients see programs assigned to them; trainers see everything they own
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let viewer = authenticate(&headers, &resources).await?;
        let programs = match viewer.user_type {
            UserType::Client => {
                resources
                    .database
                    .list_programs_for_client(viewer.id)
                    .await?
            }
            UserType::Trainer => {
                resources
                    .database
                    .list_programs_for_trainer(viewer.id)
                    .await?
            }
        };
        Ok((StatusCode::OK, Json(programs)).into_response())
    }

    async fn handle_list_templates(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let viewer = authenticate(&headers, &resources).await?;
        require_trainer(&viewer)?;
        let templates = resources.database.list_templates(viewer.id).await?;
        Ok((StatusCode::OK, Json(templates)).into_response())
    }

    async fn handle_assign(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(payload): Json<AssignProgramPayload>,
    ) -> Result<Response, AppError> {
        let viewer = authenticate(&headers, &resources).await?;
        require_trainer(&viewer)?;

        let assignment = resources
            .database
            .assign_program(payload.template_id, payload.client_id, viewer.id)
            .await?;

        info!(
            program_id = %assignment.id,
            template_id = %payload.template_id,
            client_id = %payload.client_id,
            "Program assigned"
        );
        Ok((StatusCode::CREATED, Json(assignment)).into_response())
    }

    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(program_id): Path<Uuid>,
        Json(updates): Json<WorkoutProgramUpdate>,
    ) -> Result<Response, AppError> {
        let viewer = authenticate(&headers, &resources).await?;
        require_trainer(&viewer)?;

        let program = resources
            .database
            .update_program(program_id, viewer.id, &updates)
            .await?;
        Ok((StatusCode::OK, Json(program)).into_response())
    }
}
