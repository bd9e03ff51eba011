// ABOUTME: Direct message storage between two users
// ABOUTME: Conversations are the two-sided union of directed rows, ordered by send time
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 EvolveCoach

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use super::{parse_uuid, Database};
use crate::errors::{AppError, AppResult};
use crate::models::Message;

impl Database {
    /// Send a message. Content must be non-empty after trimming; messages are
    /// immutable once stored.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The content is empty or whitespace-only
    /// - The recipient does not exist
    /// - Database operation fails
    pub async fn send_message(
        &self,
        sender_id: Uuid,
        recipient_id: Uuid,
        content: &str,
    ) -> AppResult<Message> {
        if content.trim().is_empty() {
            return Err(AppError::invalid_input("Message content cannot be empty"));
        }

        if self.get_profile(recipient_id).await?.is_none() {
            return Err(AppError::not_found(format!("Recipient {recipient_id}")));
        }

        let message = Message {
            id: Uuid::new_v4(),
            sender_id,
            recipient_id,
            content: content.to_owned(),
            message_type: "text".to_owned(),
            read_at: None,
            created_at: Utc::now(),
        };

        sqlx::query(
            r"
            INSERT INTO messages (id, sender_id, recipient_id, content, message_type, read_at, created_at)
            VALUES ($1, $2, $3, $4, $5, NULL, $6)
            ",
        )
        .bind(message.id.to_string())
        .bind(message.sender_id.to_string())
        .bind(message.recipient_id.to_string())
        .bind(&message.content)
        .bind(&message.message_type)
        .bind(message.created_at)
        .execute(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to send message: {e}")))?;

        Ok(message)
    }

    /// Full conversation between two users: rows sent in either direction,
    /// oldest first
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_conversation(&self, a: Uuid, b: Uuid) -> AppResult<Vec<Message>> {
        let rows = sqlx::query(
            r"
            SELECT id, sender_id, recipient_id, content, message_type, read_at, created_at
            FROM messages
            WHERE (sender_id = $1 AND recipient_id = $2)
               OR (sender_id = $2 AND recipient_id = $1)
            ORDER BY created_at ASC
            ",
        )
        .bind(a.to_string())
        .bind(b.to_string())
        .fetch_all(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to get conversation: {e}")))?;

        rows.iter().map(Self::row_to_message).collect()
    }

    /// Mark every unread message from `counterpart_id` to `recipient_id` as
    /// read now. Returns the number of rows stamped.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn mark_conversation_read(
        &self,
        recipient_id: Uuid,
        counterpart_id: Uuid,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            r"
            UPDATE messages SET read_at = $3
            WHERE recipient_id = $1 AND sender_id = $2 AND read_at IS NULL
            ",
        )
        .bind(recipient_id.to_string())
        .bind(counterpart_id.to_string())
        .bind(Utc::now())
        .execute(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to mark conversation read: {e}")))?;

        Ok(result.rows_affected())
    }

    fn row_to_message(row: &SqliteRow) -> AppResult<Message> {
        let id: String = row.get("id");
        let sender_id: String = row.get("sender_id");
        let recipient_id: String = row.get("recipient_id");
        Ok(Message {
            id: parse_uuid(&id, "messages.id")?,
            sender_id: parse_uuid(&sender_id, "messages.sender_id")?,
            recipient_id: parse_uuid(&recipient_id, "messages.recipient_id")?,
            content: row.get("content"),
            message_type: row.get("message_type"),
            read_at: row.get("read_at"),
            created_at: row.get("created_at"),
        })
    }
}
