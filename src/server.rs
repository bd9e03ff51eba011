// ABOUTME: Server assembly and startup
// ABOUTME: Builds shared resources, binds the listener, and serves until shutdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 EvolveCoach

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use crate::auth::AuthManager;
use crate::config::ServerConfig;
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::routes::{self, ServerResources};

/// Connect to the database and bundle the shared server state
///
/// # Errors
///
/// Returns an error if the database connection or migration fails
pub async fn build_resources(config: &ServerConfig) -> AppResult<Arc<ServerResources>> {
    let database = Database::new(&config.database_url).await?;
    let auth = AuthManager::new(config.jwt_secret.as_bytes(), config.token_expiry_hours);
    Ok(Arc::new(ServerResources::new(database, auth)))
}

/// Run the HTTP server until interrupted
///
/// # Errors
///
/// Returns an error if startup fails or the listener dies
pub async fn run(config: ServerConfig) -> AppResult<()> {
    let resources = build_resources(&config).await?;
    let app = routes::router(&resources);

    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    info!(%addr, "EvolveCoach server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");
}
