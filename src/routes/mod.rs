// ABOUTME: Route module organization for the EvolveCoach HTTP API
// ABOUTME: Shared server resources, bearer authentication, and per-domain router assembly
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 EvolveCoach

//! HTTP routes organized by domain. Each module contains route definitions
//! and thin handlers that delegate to the database layer. Every handler
//! receives the caller's profile from [`authenticate`] explicitly; there is
//! no ambient session state.

/// Registration, login, and session introspection
pub mod auth;
/// Weekly check-in submission and trainer review
pub mod checkins;
/// Health check
pub mod health;
/// Direct messaging
pub mod messages;
/// Profile updates and trainer/client directories
pub mod profiles;
/// Workout programs and template assignment
pub mod programs;
/// Trainer connection requests
pub mod requests;
/// Video session scheduling
pub mod video_sessions;

pub use auth::AuthRoutes;
pub use checkins::CheckInRoutes;
pub use health::HealthRoutes;
pub use messages::MessageRoutes;
pub use profiles::ProfileRoutes;
pub use programs::ProgramRoutes;
pub use requests::RequestRoutes;
pub use video_sessions::VideoSessionRoutes;

use std::sync::Arc;

use axum::http::HeaderMap;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{extract_bearer_token, AuthManager};
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{Profile, UserType};

/// Shared state handed to every route handler
pub struct ServerResources {
    /// Database pool and operations
    pub database: Database,
    /// Session token manager
    pub auth: AuthManager,
}

impl ServerResources {
    /// Bundle the server's shared state
    #[must_use]
    pub const fn new(database: Database, auth: AuthManager) -> Self {
        Self { database, auth }
    }
}

/// Assemble the full application router
pub fn router(resources: &Arc<ServerResources>) -> Router {
    Router::new()
        .merge(HealthRoutes::routes())
        .merge(AuthRoutes::routes(resources.clone()))
        .merge(ProfileRoutes::routes(resources.clone()))
        .merge(RequestRoutes::routes(resources.clone()))
        .merge(ProgramRoutes::routes(resources.clone()))
        .merge(CheckInRoutes::routes(resources.clone()))
        .merge(MessageRoutes::routes(resources.clone()))
        .merge(VideoSessionRoutes::routes(resources.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Resolve the caller from the `Authorization` header.
///
/// Validates the bearer token and loads the caller's profile so handlers get
/// identity and role in one value.
pub(crate) async fn authenticate(
    headers: &HeaderMap,
    resources: &Arc<ServerResources>,
) -> AppResult<Profile> {
    let token = extract_bearer_token(headers)?;
    let user_id = resources.auth.validate_token(token)?;
    resources
        .database
        .get_profile(user_id)
        .await?
        .ok_or_else(|| AppError::auth_invalid("Account no longer exists"))
}

/// Reject callers that are not trainers
pub(crate) fn require_trainer(profile: &Profile) -> AppResult<()> {
    if profile.user_type == UserType::Trainer {
        Ok(())
    } else {
        Err(AppError::forbidden("This operation requires a trainer account"))
    }
}

/// Reject callers that are not clients
pub(crate) fn require_client(profile: &Profile) -> AppResult<()> {
    if profile.user_type == UserType::Client {
        Ok(())
    } else {
        Err(AppError::forbidden("This operation requires a client account"))
    }
}
