// ABOUTME: Registration, login, and session introspection route handlers
// ABOUTME: Signup creates the base profile plus its extension row; login returns a session token
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 EvolveCoach

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{authenticate, ServerResources};
use crate::auth::{hash_password, verify_password};
use crate::errors::{AppError, AppResult};
use crate::models::{ClientProfile, Profile, TrainerProfile, UserType};

/// Minimum accepted password length
const PASSWORD_MIN_LEN: usize = 6;

/// Registration request payload
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// Login email
    pub email: String,
    /// Plaintext password, hashed before storage
    pub password: String,
    /// Display name
    #[serde(default)]
    pub full_name: Option<String>,
    /// Account discriminator, immutable after signup
    pub user_type: UserType,
}

/// Registration response payload
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    /// New user id
    pub user_id: String,
    /// Human-readable confirmation
    pub message: String,
}

/// Login request payload
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Login email
    pub email: String,
    /// Plaintext password
    pub password: String,
}

/// Caller identity snapshot returned on login
#[derive(Debug, Serialize)]
pub struct UserInfo {
    /// User id
    pub user_id: String,
    /// Login email
    pub email: String,
    /// Display name
    pub full_name: Option<String>,
    /// Account discriminator
    pub user_type: UserType,
}

/// Login response payload
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Session token
    pub jwt_token: String,
    /// Token expiry, RFC 3339
    pub expires_at: String,
    /// Caller identity
    pub user: UserInfo,
}

/// Profile bundle returned by the session introspection endpoint: the base
/// profile plus the extension record matching the account type
#[derive(Debug, Serialize)]
pub struct SessionProfile {
    /// Base profile
    pub profile: Profile,
    /// Trainer extension, present for trainer accounts
    pub trainer_profile: Option<TrainerProfile>,
    /// Client extension, present for client accounts
    pub client_profile: Option<ClientProfile>,
}

/// Authentication routes
pub struct AuthRoutes;

impl AuthRoutes {
    /// Create all authentication routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/auth/register", post(Self::handle_register))
            .route("/api/auth/login", post(Self::handle_login))
            .route("/api/auth/me", get(Self::handle_me))
            .with_state(resources)
    }

    async fn handle_register(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<RegisterRequest>,
    ) -> Result<Response, AppError> {
        info!("User registration attempt");

        if !Self::is_valid_email(&request.email) {
            return Err(AppError::invalid_input("Invalid email format"));
        }
        if request.password.len() < PASSWORD_MIN_LEN {
            return Err(AppError::invalid_input(
                "Password must be at least 6 characters",
            ));
        }
        if resources
            .database
            .get_profile_by_email(&request.email)
            .await?
            .is_some()
        {
            return Err(AppError::invalid_input(
                "Email already in use by another user",
            ));
        }

        let password_hash = hash_password(&request.password)?;
        let profile = Profile::new(
            request.email.clone(),
            request.full_name,
            request.user_type,
        );

        let user_id = resources
            .database
            .create_profile(&profile, &password_hash)
            .await?;

        info!(user_id = %user_id, user_type = %request.user_type, "User registered");

        let response = RegisterResponse {
            user_id: user_id.to_string(),
            message: "Account created. You can sign in now.".to_owned(),
        };
        Ok((StatusCode::CREATED, Json(response)).into_response())
    }

    async fn handle_login(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<LoginRequest>,
    ) -> Result<Response, AppError> {
        debug!("User login attempt");

        // Unknown email and wrong password are indistinguishable to the caller
        let (profile, password_hash) = resources
            .database
            .get_profile_with_hash_by_email(&request.email)
            .await?
            .ok_or_else(|| AppError::auth_invalid("Invalid email or password"))?;

        let is_valid = verify_password(request.password, password_hash).await?;
        if !is_valid {
            return Err(AppError::auth_invalid("Invalid email or password"));
        }

        let jwt_token = resources.auth.generate_token(&profile)?;
        let expires_at = Utc::now() + Duration::hours(resources.auth.expiry_hours());

        info!(user_id = %profile.id, "User logged in");

        let response = LoginResponse {
            jwt_token,
            expires_at: expires_at.to_rfc3339(),
            user: UserInfo {
                user_id: profile.id.to_string(),
                email: profile.email,
                full_name: profile.full_name,
                user_type: profile.user_type,
            },
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    async fn handle_me(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let profile = authenticate(&headers, &resources).await?;
        let bundle = Self::load_session_profile(&resources, profile).await?;
        Ok((StatusCode::OK, Json(bundle)).into_response())
    }

    /// Load the extension record matching the account type
    pub(crate) async fn load_session_profile(
        resources: &Arc<ServerResources>,
        profile: Profile,
    ) -> AppResult<SessionProfile> {
        let (trainer_profile, client_profile) = match profile.user_type {
            UserType::Trainer => (
                resources.database.get_trainer_profile(profile.id).await?,
                None,
            ),
            UserType::Client => (
                None,
                resources.database.get_client_profile(profile.id).await?,
            ),
        };

        Ok(SessionProfile {
            profile,
            trainer_profile,
            client_profile,
        })
    }

    fn is_valid_email(email: &str) -> bool {
        let Some((local, domain)) = email.split_once('@') else {
            return false;
        };
        !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
    }
}
