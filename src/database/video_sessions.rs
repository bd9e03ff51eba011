// ABOUTME: Video session scheduling between connected trainers and clients
// ABOUTME: scheduled -> completed/cancelled; settled sessions keep their summary fields
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 EvolveCoach

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use super::{parse_uuid, Database};
use crate::errors::{AppError, AppResult};
use crate::models::{SessionStatus, VideoSession};

impl Database {
    /// Schedule a session with a connected client
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The client profile does not exist
    /// - The client is not connected to the caller
    /// - Database operation fails
    pub async fn schedule_session(
        &self,
        trainer_id: Uuid,
        client_id: Uuid,
        session_date: DateTime<Utc>,
        duration_minutes: Option<i64>,
        meeting_url: Option<&str>,
    ) -> AppResult<VideoSession> {
        let client = self
            .get_client_profile(client_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Client profile {client_id}")))?;
        if client.trainer_id != Some(trainer_id) {
            return Err(AppError::invalid_input(
                "Client is not connected to this trainer",
            ));
        }

        let session = VideoSession {
            id: Uuid::new_v4(),
            trainer_id,
            client_id,
            session_date,
            duration_minutes,
            meeting_url: meeting_url.map(ToOwned::to_owned),
            status: SessionStatus::Scheduled,
            ai_summary: None,
            action_items: None,
            transcript: None,
            created_at: Utc::now(),
        };

        sqlx::query(
            r"
            INSERT INTO video_sessions (
                id, trainer_id, client_id, session_date, duration_minutes,
                meeting_url, status, ai_summary, action_items, transcript, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, NULL, NULL, NULL, $8)
            ",
        )
        .bind(session.id.to_string())
        .bind(session.trainer_id.to_string())
        .bind(session.client_id.to_string())
        .bind(session.session_date)
        .bind(session.duration_minutes)
        .bind(&session.meeting_url)
        .bind(session.status.as_str())
        .bind(session.created_at)
        .execute(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to schedule session: {e}")))?;

        Ok(session)
    }

    /// Get a session by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_session(&self, session_id: Uuid) -> AppResult<Option<VideoSession>> {
        let row = sqlx::query(
            r"
            SELECT id, trainer_id, client_id, session_date, duration_minutes,
                   meeting_url, status, ai_summary, action_items, transcript, created_at
            FROM video_sessions WHERE id = $1
            ",
        )
        .bind(session_id.to_string())
        .fetch_optional(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to get session: {e}")))?;

        row.map(|r| Self::row_to_session(&r)).transpose()
    }

    /// Settle a scheduled session as completed or cancelled
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The session does not exist
    /// - The caller is not the hosting trainer
    /// - The session is already settled, or the new status is `scheduled`
    /// - Database operation fails
    pub async fn update_session_status(
        &self,
        session_id: Uuid,
        trainer_id: Uuid,
        status: SessionStatus,
    ) -> AppResult<VideoSession> {
        if status == SessionStatus::Scheduled {
            return Err(AppError::invalid_input(
                "A session cannot transition back to scheduled",
            ));
        }

        let session = self
            .get_session(session_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Session {session_id}")))?;

        if session.trainer_id != trainer_id {
            return Err(AppError::forbidden(
                "Only the hosting trainer can update this session",
            ));
        }
        if session.status.is_terminal() {
            return Err(AppError::conflict(format!(
                "Session is already {}",
                session.status.as_str()
            )));
        }

        sqlx::query("UPDATE video_sessions SET status = $2 WHERE id = $1")
            .bind(session_id.to_string())
            .bind(status.as_str())
            .execute(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to update session status: {e}")))?;

        self.get_session(session_id)
            .await?
            .ok_or_else(|| AppError::not_found("Session after status update"))
    }

    /// Sessions visible to the viewer, soonest first
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_sessions(&self, viewer_id: Uuid) -> AppResult<Vec<VideoSession>> {
        let rows = sqlx::query(
            r"
            SELECT id, trainer_id, client_id, session_date, duration_minutes,
                   meeting_url, status, ai_summary, action_items, transcript, created_at
            FROM video_sessions
            WHERE trainer_id = $1 OR client_id = $1
            ORDER BY session_date ASC
            ",
        )
        .bind(viewer_id.to_string())
        .fetch_all(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to list sessions: {e}")))?;

        rows.iter().map(Self::row_to_session).collect()
    }

    fn row_to_session(row: &SqliteRow) -> AppResult<VideoSession> {
        let id: String = row.get("id");
        let trainer_id: String = row.get("trainer_id");
        let client_id: String = row.get("client_id");
        let status: String = row.get("status");
        let action_items_raw: Option<String> = row.get("action_items");

        let action_items = action_items_raw
            .map(|raw| {
                serde_json::from_str(&raw)
                    .map_err(|e| AppError::internal(format!("Invalid action items payload: {e}")))
            })
            .transpose()?;

        Ok(VideoSession {
            id: parse_uuid(&id, "video_sessions.id")?,
            trainer_id: parse_uuid(&trainer_id, "video_sessions.trainer_id")?,
            client_id: parse_uuid(&client_id, "video_sessions.client_id")?,
            session_date: row.get("session_date"),
            duration_minutes: row.get("duration_minutes"),
            meeting_url: row.get("meeting_url"),
            status: status
                .parse()
                .map_err(|e| AppError::internal(format!("Failed to parse status: {e}")))?,
            ai_summary: row.get("ai_summary"),
            action_items,
            transcript: row.get("transcript"),
            created_at: row.get("created_at"),
        })
    }
}
