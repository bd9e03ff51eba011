// ABOUTME: Weekly check-in storage: client submission and trainer review
// ABOUTME: Submission requires an approved trainer connection; rows are never deleted
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 EvolveCoach

use chrono::{DateTime, Datelike, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use super::{decode_string_list, parse_uuid, Database};
use crate::errors::{AppError, AppResult};
use crate::models::{CheckIn, CheckInResponses};

/// Week bucket used at submission time: day-of-month / 7, rounded up.
/// Matches the original product's bucketing rather than any calendar week.
fn week_of_month(at: DateTime<Utc>) -> i64 {
    i64::from(at.day().div_ceil(7))
}

impl Database {
    /// Submit a weekly check-in for the client's connected trainer
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The client has no approved trainer connection
    /// - Database operation fails
    pub async fn submit_check_in(
        &self,
        client_id: Uuid,
        responses: &CheckInResponses,
        progress_photos: &[String],
    ) -> AppResult<CheckIn> {
        let client = self
            .get_client_profile(client_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Client profile {client_id}")))?;

        let trainer_id = client.trainer_id.ok_or_else(|| {
            AppError::invalid_input("A check-in requires an approved trainer connection")
        })?;

        let now = Utc::now();
        let check_in = CheckIn {
            id: Uuid::new_v4(),
            client_id,
            trainer_id,
            week_number: week_of_month(now),
            responses: responses.clone(),
            progress_photos: progress_photos.to_vec(),
            ai_summary: None,
            trainer_feedback: None,
            reviewed_at: None,
            submitted_at: now,
        };

        sqlx::query(
            r"
            INSERT INTO check_ins (
                id, client_id, trainer_id, week_number, responses, progress_photos,
                ai_summary, trainer_feedback, reviewed_at, submitted_at
            ) VALUES ($1, $2, $3, $4, $5, $6, NULL, NULL, NULL, $7)
            ",
        )
        .bind(check_in.id.to_string())
        .bind(check_in.client_id.to_string())
        .bind(check_in.trainer_id.to_string())
        .bind(check_in.week_number)
        .bind(serde_json::to_string(&check_in.responses)?)
        .bind(serde_json::to_string(&check_in.progress_photos)?)
        .bind(check_in.submitted_at)
        .execute(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to submit check-in: {e}")))?;

        Ok(check_in)
    }

    /// Get a check-in by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_check_in(&self, check_in_id: Uuid) -> AppResult<Option<CheckIn>> {
        let row = sqlx::query(
            r"
            SELECT id, client_id, trainer_id, week_number, responses, progress_photos,
                   ai_summary, trainer_feedback, reviewed_at, submitted_at
            FROM check_ins WHERE id = $1
            ",
        )
        .bind(check_in_id.to_string())
        .fetch_optional(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to get check-in: {e}")))?;

        row.map(|r| Self::row_to_check_in(&r)).transpose()
    }

    /// Record the trainer's written feedback on a check-in
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The check-in does not exist
    /// - The caller is not the named trainer
    /// - Database operation fails
    pub async fn review_check_in(
        &self,
        check_in_id: Uuid,
        trainer_id: Uuid,
        feedback: &str,
    ) -> AppResult<CheckIn> {
        let check_in = self
            .get_check_in(check_in_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Check-in {check_in_id}")))?;

        if check_in.trainer_id != trainer_id {
            return Err(AppError::forbidden(
                "Only the named trainer can review this check-in",
            ));
        }

        sqlx::query(
            r"
            UPDATE check_ins SET trainer_feedback = $2, reviewed_at = $3
            WHERE id = $1
            ",
        )
        .bind(check_in_id.to_string())
        .bind(feedback)
        .bind(Utc::now())
        .execute(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to review check-in: {e}")))?;

        self.get_check_in(check_in_id)
            .await?
            .ok_or_else(|| AppError::not_found("Check-in after review"))
    }

    /// Check-ins visible to the viewer: rows where they are the client or the
    /// trainer, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_check_ins(&self, viewer_id: Uuid) -> AppResult<Vec<CheckIn>> {
        let rows = sqlx::query(
            r"
            SELECT id, client_id, trainer_id, week_number, responses, progress_photos,
                   ai_summary, trainer_feedback, reviewed_at, submitted_at
            FROM check_ins
            WHERE client_id = $1 OR trainer_id = $1
            ORDER BY submitted_at DESC
            ",
        )
        .bind(viewer_id.to_string())
        .fetch_all(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to list check-ins: {e}")))?;

        rows.iter().map(Self::row_to_check_in).collect()
    }

    fn row_to_check_in(row: &SqliteRow) -> AppResult<CheckIn> {
        let id: String = row.get("id");
        let client_id: String = row.get("client_id");
        let trainer_id: String = row.get("trainer_id");
        let responses_raw: String = row.get("responses");
        let photos_raw: String = row.get("progress_photos");

        let responses: CheckInResponses = serde_json::from_str(&responses_raw)
            .map_err(|e| AppError::internal(format!("Invalid check-in responses: {e}")))?;

        Ok(CheckIn {
            id: parse_uuid(&id, "check_ins.id")?,
            client_id: parse_uuid(&client_id, "check_ins.client_id")?,
            trainer_id: parse_uuid(&trainer_id, "check_ins.trainer_id")?,
            week_number: row.get("week_number"),
            responses,
            progress_photos: decode_string_list(&photos_raw, "progress_photos")?,
            ai_summary: row.get("ai_summary"),
            trainer_feedback: row.get("trainer_feedback"),
            reviewed_at: row.get("reviewed_at"),
            submitted_at: row.get("submitted_at"),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn week_of_month_buckets_by_seven_days() {
        let d = |day: u32| Utc.with_ymd_and_hms(2025, 3, day, 12, 0, 0).unwrap();
        assert_eq!(week_of_month(d(1)), 1);
        assert_eq!(week_of_month(d(7)), 1);
        assert_eq!(week_of_month(d(8)), 2);
        assert_eq!(week_of_month(d(28)), 4);
        assert_eq!(week_of_month(d(29)), 5);
    }
}
