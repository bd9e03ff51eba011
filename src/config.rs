// ABOUTME: Environment-driven server configuration
// ABOUTME: Loads port, database URL, and session token settings at startup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 EvolveCoach

use std::env;

use tracing::warn;

use crate::errors::{AppError, AppResult};

/// Default HTTP port when `EVOLVECOACH_HTTP_PORT` is unset
pub const DEFAULT_HTTP_PORT: u16 = 8081;

/// Default session token lifetime in hours
pub const DEFAULT_SESSION_HOURS: i64 = 24;

/// Runtime configuration for the server, loaded from the environment
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port the HTTP listener binds to
    pub http_port: u16,
    /// Database connection URL (`sqlite:...`)
    pub database_url: String,
    /// Secret used to sign session tokens
    pub jwt_secret: String,
    /// Session token lifetime in hours
    pub token_expiry_hours: i64,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Recognized variables: `EVOLVECOACH_HTTP_PORT`, `DATABASE_URL`,
    /// `EVOLVECOACH_JWT_SECRET`, `EVOLVECOACH_SESSION_HOURS`.
    ///
    /// # Errors
    ///
    /// Returns an error if a set variable fails to parse.
    pub fn from_env() -> AppResult<Self> {
        let http_port = match env::var("EVOLVECOACH_HTTP_PORT") {
            Ok(raw) => raw.parse::<u16>().map_err(|e| {
                AppError::invalid_input(format!("Invalid EVOLVECOACH_HTTP_PORT '{raw}': {e}"))
            })?,
            Err(_) => DEFAULT_HTTP_PORT,
        };

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite:data/evolvecoach.db".to_owned());

        let jwt_secret = match env::var("EVOLVECOACH_JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ => {
                warn!("EVOLVECOACH_JWT_SECRET not set, using development secret");
                "evolvecoach-development-secret".to_owned()
            }
        };

        let token_expiry_hours = match env::var("EVOLVECOACH_SESSION_HOURS") {
            Ok(raw) => raw.parse::<i64>().map_err(|e| {
                AppError::invalid_input(format!("Invalid EVOLVECOACH_SESSION_HOURS '{raw}': {e}"))
            })?,
            Err(_) => DEFAULT_SESSION_HOURS,
        };

        Ok(Self {
            http_port,
            database_url,
            jwt_secret,
            token_expiry_hours,
        })
    }
}
