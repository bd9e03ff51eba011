// ABOUTME: Trainer connection request workflow with transactional approval
// ABOUTME: pending -> approved grants the connection atomically; settled states are terminal
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 EvolveCoach

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};
use uuid::Uuid;

use super::{parse_uuid, Database};
use crate::errors::{AppError, AppResult};
use crate::models::{ProfileSummary, RequestStatus, TrainerRequest, TrainerRequestDetail, UserType};

impl Database {
    /// Submit a connection request from a client to a trainer.
    ///
    /// At most one pending request may exist per (client, trainer) pair; the
    /// partial unique index backs this up against concurrent submissions.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The addressed profile does not exist or is not a trainer
    /// - A pending request to this trainer already exists
    /// - Database operation fails
    pub async fn submit_trainer_request(
        &self,
        client_id: Uuid,
        trainer_id: Uuid,
        message: Option<&str>,
    ) -> AppResult<TrainerRequest> {
        let trainer = self
            .get_profile(trainer_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Trainer {trainer_id}")))?;
        if trainer.user_type != UserType::Trainer {
            return Err(AppError::invalid_input(
                "Connection requests can only be sent to trainers",
            ));
        }

        let request = TrainerRequest {
            id: Uuid::new_v4(),
            client_id,
            trainer_id,
            status: RequestStatus::Pending,
            message: message.map(ToOwned::to_owned),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let insert = sqlx::query(
            r"
            INSERT INTO trainer_requests (id, client_id, trainer_id, status, message, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(request.id.to_string())
        .bind(request.client_id.to_string())
        .bind(request.trainer_id.to_string())
        .bind(request.status.as_str())
        .bind(&request.message)
        .bind(request.created_at)
        .bind(request.updated_at)
        .execute(self.pool())
        .await;

        match insert {
            Ok(_) => Ok(request),
            Err(e) if Self::is_unique_violation(&e) => Err(AppError::conflict(
                "A pending request to this trainer already exists",
            )),
            Err(e) => Err(AppError::database(format!(
                "Failed to submit trainer request: {e}"
            ))),
        }
    }

    /// Get a request by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_trainer_request(&self, request_id: Uuid) -> AppResult<Option<TrainerRequest>> {
        let row = sqlx::query(
            r"
            SELECT id, client_id, trainer_id, status, message, created_at, updated_at
            FROM trainer_requests WHERE id = $1
            ",
        )
        .bind(request_id.to_string())
        .fetch_optional(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to get trainer request: {e}")))?;

        row.map(|r| Self::row_to_request(&r)).transpose()
    }

    /// Approve a pending request.
    ///
    /// The status change and the client's `trainer_id` grant happen in one
    /// transaction, so a failure between the two writes cannot leave an
    /// approved request without the connection.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The request does not exist
    /// - The caller is not the addressed trainer
    /// - The request has already been settled
    /// - Database operation fails
    pub async fn approve_trainer_request(
        &self,
        request_id: Uuid,
        trainer_id: Uuid,
    ) -> AppResult<TrainerRequest> {
        let mut tx = self
            .pool()
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        let mut request = Self::fetch_pending_for(&mut tx, request_id, trainer_id).await?;
        let now = Utc::now();

        sqlx::query(
            r"
            UPDATE trainer_requests SET status = 'approved', updated_at = $2
            WHERE id = $1
            ",
        )
        .bind(request_id.to_string())
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to approve request: {e}")))?;

        let granted = sqlx::query(
            r"
            UPDATE client_profiles SET trainer_id = $2
            WHERE id = $1
            ",
        )
        .bind(request.client_id.to_string())
        .bind(trainer_id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to grant connection: {e}")))?;

        if granted.rows_affected() == 0 {
            // No client extension row to carry the connection; the dropped
            // transaction rolls the approval back with it.
            return Err(AppError::not_found(format!(
                "Client profile {}",
                request.client_id
            )));
        }

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit approval: {e}")))?;

        request.status = RequestStatus::Approved;
        request.updated_at = now;
        Ok(request)
    }

    /// Reject a pending request
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The request does not exist
    /// - The caller is not the addressed trainer
    /// - The request has already been settled
    /// - Database operation fails
    pub async fn reject_trainer_request(
        &self,
        request_id: Uuid,
        trainer_id: Uuid,
    ) -> AppResult<TrainerRequest> {
        let mut tx = self
            .pool()
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        let mut request = Self::fetch_pending_for(&mut tx, request_id, trainer_id).await?;
        let now = Utc::now();

        sqlx::query(
            r"
            UPDATE trainer_requests SET status = 'rejected', updated_at = $2
            WHERE id = $1
            ",
        )
        .bind(request_id.to_string())
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to reject request: {e}")))?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit rejection: {e}")))?;

        request.status = RequestStatus::Rejected;
        request.updated_at = now;
        Ok(request)
    }

    /// Requests visible to the viewer: rows where they are the trainer or the
    /// client, newest first, each joined with both parties' profile snapshots
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_trainer_requests(
        &self,
        viewer_id: Uuid,
    ) -> AppResult<Vec<TrainerRequestDetail>> {
        let rows = sqlx::query(
            r"
            SELECT r.id, r.client_id, r.trainer_id, r.status, r.message, r.created_at, r.updated_at,
                   t.full_name AS trainer_full_name, t.email AS trainer_email,
                   t.user_type AS trainer_user_type, t.avatar_url AS trainer_avatar_url,
                   c.full_name AS client_full_name, c.email AS client_email,
                   c.user_type AS client_user_type, c.avatar_url AS client_avatar_url
            FROM trainer_requests r
            JOIN profiles t ON t.id = r.trainer_id
            JOIN profiles c ON c.id = r.client_id
            WHERE r.trainer_id = $1 OR r.client_id = $1
            ORDER BY r.created_at DESC
            ",
        )
        .bind(viewer_id.to_string())
        .fetch_all(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to list trainer requests: {e}")))?;

        let mut details = Vec::with_capacity(rows.len());
        for row in rows {
            let request = Self::row_to_request(&row)?;
            let trainer = Self::party_from_row(&row, request.trainer_id, "trainer")?;
            let client = Self::party_from_row(&row, request.client_id, "client")?;
            details.push(TrainerRequestDetail {
                request,
                trainer,
                client,
            });
        }
        Ok(details)
    }

    /// Load a request inside a settlement transaction, enforcing that the
    /// caller is the addressed trainer and the request is still pending
    async fn fetch_pending_for(
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        request_id: Uuid,
        trainer_id: Uuid,
    ) -> AppResult<TrainerRequest> {
        let conn: &mut SqliteConnection = &mut *tx;
        let row = sqlx::query(
            r"
            SELECT id, client_id, trainer_id, status, message, created_at, updated_at
            FROM trainer_requests WHERE id = $1
            ",
        )
        .bind(request_id.to_string())
        .fetch_optional(conn)
        .await
        .map_err(|e| AppError::database(format!("Failed to load request: {e}")))?;

        let request = row
            .map(|r| Self::row_to_request(&r))
            .transpose()?
            .ok_or_else(|| AppError::not_found(format!("Request {request_id}")))?;

        if request.trainer_id != trainer_id {
            return Err(AppError::forbidden(
                "Only the addressed trainer can settle this request",
            ));
        }
        if request.status.is_terminal() {
            return Err(AppError::conflict(format!(
                "Request is already {}",
                request.status.as_str()
            )));
        }

        Ok(request)
    }

    fn row_to_request(row: &SqliteRow) -> AppResult<TrainerRequest> {
        let id: String = row.get("id");
        let client_id: String = row.get("client_id");
        let trainer_id: String = row.get("trainer_id");
        let status: String = row.get("status");
        Ok(TrainerRequest {
            id: parse_uuid(&id, "trainer_requests.id")?,
            client_id: parse_uuid(&client_id, "trainer_requests.client_id")?,
            trainer_id: parse_uuid(&trainer_id, "trainer_requests.trainer_id")?,
            status: status
                .parse()
                .map_err(|e| AppError::internal(format!("Failed to parse status: {e}")))?,
            message: row.get("message"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }

    fn party_from_row(row: &SqliteRow, id: Uuid, prefix: &str) -> AppResult<ProfileSummary> {
        let user_type: String = row.get(format!("{prefix}_user_type").as_str());
        Ok(ProfileSummary {
            id,
            full_name: row.get(format!("{prefix}_full_name").as_str()),
            email: row.get(format!("{prefix}_email").as_str()),
            user_type: user_type
                .parse()
                .map_err(|e| AppError::internal(format!("Failed to parse user type: {e}")))?,
            avatar_url: row.get(format!("{prefix}_avatar_url").as_str()),
        })
    }
}
