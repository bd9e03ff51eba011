// ABOUTME: Direct messaging route handlers
// ABOUTME: Send, fetch a two-sided conversation, and stamp read receipts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 EvolveCoach

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use uuid::Uuid;

use super::{authenticate, ServerResources};
use crate::errors::AppError;

/// Message send payload
#[derive(Debug, Deserialize)]
pub struct SendMessagePayload {
    /// Addressee
    pub recipient_id: Uuid,
    /// Message body
    pub content: String,
}

/// Conversation selector: the other party's profile id
#[derive(Debug, Deserialize)]
pub struct ConversationQuery {
    /// The other participant
    pub with: Uuid,
}

/// Read receipt payload
#[derive(Debug, Deserialize)]
pub struct MarkReadPayload {
    /// The counterpart whose messages are being acknowledged
    pub with: Uuid,
}

/// Messaging routes
pub struct MessageRoutes;

impl MessageRoutes {
    /// Create all messaging routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/messages",
                post(Self::handle_send).get(Self::handle_conversation),
            )
            .route("/api/messages/read", post(Self::handle_mark_read))
            .with_state(resources)
    }

    async fn handle_send(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(payload): Json<SendMessagePayload>,
    ) -> Result<Response, AppError> {
        let viewer = authenticate(&headers, &resources).await?;
        let message = resources
            .database
            .send_message(viewer.id, payload.recipient_id, &payload.content)
            .await?;
        Ok((StatusCode::CREATED, Json(message)).into_response())
    }

    async fn handle_conversation(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<ConversationQuery>,
    ) -> Result<Response, AppError> {
        let viewer = authenticate(&headers, &resources).await?;
        let messages = resources
            .database
            .get_conversation(viewer.id, query.with)
            .await?;
        Ok((StatusCode::OK, Json(messages)).into_response())
    }

    async fn handle_mark_read(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(payload): Json<MarkReadPayload>,
    ) -> Result<Response, AppError> {
        let viewer = authenticate(&headers, &resources).await?;
        let marked = resources
            .database
            .mark_conversation_read(viewer.id, payload.with)
            .await?;
        Ok((
            StatusCode::OK,
            Json(serde_json::json!({ "marked_read": marked })),
        )
            .into_response())
    }
}
