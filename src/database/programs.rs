// ABOUTME: Workout program storage, template management, and client assignment
// ABOUTME: Assignment copies a template's fields into a new row; later template edits do not propagate
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 EvolveCoach

use chrono::Utc;
use serde::Deserialize;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use super::{parse_uuid, Database};
use crate::errors::{AppError, AppResult};
use crate::models::{Exercise, NewWorkoutProgram, WorkoutProgram};

/// Trainer-editable program fields; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkoutProgramUpdate {
    /// Program name
    pub name: Option<String>,
    /// Free-form description
    pub description: Option<String>,
    /// Difficulty label
    pub difficulty_level: Option<String>,
    /// Intended length in weeks
    pub duration_weeks: Option<i64>,
    /// Ordered exercise list
    pub exercises: Option<Vec<Exercise>>,
}

impl Database {
    /// Create a program owned by the trainer, either a reusable template or a
    /// row bound directly to a client
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A template carries a `client_id`
    /// - Database operation fails
    pub async fn create_program(
        &self,
        trainer_id: Uuid,
        spec: &NewWorkoutProgram,
    ) -> AppResult<WorkoutProgram> {
        if spec.is_template && spec.client_id.is_some() {
            return Err(AppError::invalid_input(
                "A template cannot be bound to a client",
            ));
        }

        let now = Utc::now();
        let program = WorkoutProgram {
            id: Uuid::new_v4(),
            trainer_id,
            client_id: spec.client_id,
            name: spec.name.clone(),
            description: spec.description.clone(),
            difficulty_level: spec.difficulty_level.clone(),
            duration_weeks: spec.duration_weeks,
            exercises: spec.exercises.clone(),
            is_template: spec.is_template,
            created_at: now,
            updated_at: now,
        };

        self.insert_program(&program).await?;
        Ok(program)
    }

    /// Get a program by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_program(&self, program_id: Uuid) -> AppResult<Option<WorkoutProgram>> {
        let row = sqlx::query(
            r"
            SELECT id, trainer_id, client_id, name, description, difficulty_level,
                   duration_weeks, exercises, is_template, created_at, updated_at
            FROM workout_programs WHERE id = $1
            ",
        )
        .bind(program_id.to_string())
        .fetch_optional(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to get program: {e}")))?;

        row.map(|r| Self::row_to_program(&r)).transpose()
    }

    /// Assign a template to a client by value copy.
    ///
    /// The new row snapshots the template's name, description, difficulty,
    /// duration, and exercises at assignment time; subsequent template edits
    /// leave the copy untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The template does not exist or is not owned by the caller
    /// - The source row is not a template
    /// - The client is not connected to the caller
    /// - Database operation fails
    pub async fn assign_program(
        &self,
        template_id: Uuid,
        client_id: Uuid,
        trainer_id: Uuid,
    ) -> AppResult<WorkoutProgram> {
        let template = self
            .get_program(template_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Program {template_id}")))?;

        if template.trainer_id != trainer_id {
            return Err(AppError::forbidden(
                "Only the owning trainer can assign this program",
            ));
        }
        if !template.is_template {
            return Err(AppError::invalid_input("Program is not a template"));
        }

        let client = self
            .get_client_profile(client_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Client profile {client_id}")))?;
        if client.trainer_id != Some(trainer_id) {
            return Err(AppError::invalid_input(
                "Client is not connected to this trainer",
            ));
        }

        let now = Utc::now();
        let assignment = WorkoutProgram {
            id: Uuid::new_v4(),
            trainer_id,
            client_id: Some(client_id),
            name: template.name,
            description: template.description,
            difficulty_level: template.difficulty_level,
            duration_weeks: template.duration_weeks,
            exercises: template.exercises,
            is_template: false,
            created_at: now,
            updated_at: now,
        };

        self.insert_program(&assignment).await?;
        Ok(assignment)
    }

    /// Update a program's fields, owner-checked
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The program does not exist or is not owned by the caller
    /// - Database operation fails
    pub async fn update_program(
        &self,
        program_id: Uuid,
        trainer_id: Uuid,
        updates: &WorkoutProgramUpdate,
    ) -> AppResult<WorkoutProgram> {
        let current = self
            .get_program(program_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Program {program_id}")))?;

        if current.trainer_id != trainer_id {
            return Err(AppError::forbidden(
                "Only the owning trainer can edit this program",
            ));
        }

        let name = updates.name.clone().unwrap_or(current.name);
        let description = updates.description.clone().or(current.description);
        let difficulty_level = updates
            .difficulty_level
            .clone()
            .or(current.difficulty_level);
        let duration_weeks = updates.duration_weeks.or(current.duration_weeks);
        let exercises = updates.exercises.clone().unwrap_or(current.exercises);

        sqlx::query(
            r"
            UPDATE workout_programs SET
                name = $2,
                description = $3,
                difficulty_level = $4,
                duration_weeks = $5,
                exercises = $6,
                updated_at = $7
            WHERE id = $1
            ",
        )
        .bind(program_id.to_string())
        .bind(&name)
        .bind(&description)
        .bind(&difficulty_level)
        .bind(duration_weeks)
        .bind(serde_json::to_string(&exercises)?)
        .bind(Utc::now())
        .execute(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to update program: {e}")))?;

        self.get_program(program_id)
            .await?
            .ok_or_else(|| AppError::not_found("Program after update"))
    }

    /// Programs assigned to a client, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_programs_for_client(
        &self,
        client_id: Uuid,
    ) -> AppResult<Vec<WorkoutProgram>> {
        let rows = sqlx::query(
            r"
            SELECT id, trainer_id, client_id, name, description, difficulty_level,
                   duration_weeks, exercises, is_template, created_at, updated_at
            FROM workout_programs
            WHERE client_id = $1
            ORDER BY created_at DESC
            ",
        )
        .bind(client_id.to_string())
        .fetch_all(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to list client programs: {e}")))?;

        rows.iter().map(Self::row_to_program).collect()
    }

    /// All programs owned by a trainer, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_programs_for_trainer(
        &self,
        trainer_id: Uuid,
    ) -> AppResult<Vec<WorkoutProgram>> {
        let rows = sqlx::query(
            r"
            SELECT id, trainer_id, client_id, name, description, difficulty_level,
                   duration_weeks, exercises, is_template, created_at, updated_at
            FROM workout_programs
            WHERE trainer_id = $1
            ORDER BY created_at DESC
            ",
        )
        .bind(trainer_id.to_string())
        .fetch_all(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to list trainer programs: {e}")))?;

        rows.iter().map(Self::row_to_program).collect()
    }

    /// A trainer's reusable templates, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_templates(&self, trainer_id: Uuid) -> AppResult<Vec<WorkoutProgram>> {
        let rows = sqlx::query(
            r"
            SELECT id, trainer_id, client_id, name, description, difficulty_level,
                   duration_weeks, exercises, is_template, created_at, updated_at
            FROM workout_programs
            WHERE trainer_id = $1 AND is_template = 1
            ORDER BY created_at DESC
            ",
        )
        .bind(trainer_id.to_string())
        .fetch_all(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to list templates: {e}")))?;

        rows.iter().map(Self::row_to_program).collect()
    }

    async fn insert_program(&self, program: &WorkoutProgram) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO workout_programs (
                id, trainer_id, client_id, name, description, difficulty_level,
                duration_weeks, exercises, is_template, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ",
        )
        .bind(program.id.to_string())
        .bind(program.trainer_id.to_string())
        .bind(program.client_id.map(|id| id.to_string()))
        .bind(&program.name)
        .bind(&program.description)
        .bind(&program.difficulty_level)
        .bind(program.duration_weeks)
        .bind(serde_json::to_string(&program.exercises)?)
        .bind(program.is_template)
        .bind(program.created_at)
        .bind(program.updated_at)
        .execute(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to insert program: {e}")))?;
        Ok(())
    }

    fn row_to_program(row: &SqliteRow) -> AppResult<WorkoutProgram> {
        let id: String = row.get("id");
        let trainer_id: String = row.get("trainer_id");
        let client_id: Option<String> = row.get("client_id");
        let exercises_raw: String = row.get("exercises");

        // The exercise column is validated against the closed schema on every
        // read; a stored payload that no longer parses is surfaced, not passed
        // through as an opaque blob.
        let exercises: Vec<Exercise> = serde_json::from_str(&exercises_raw)
            .map_err(|e| AppError::internal(format!("Invalid exercise payload: {e}")))?;

        Ok(WorkoutProgram {
            id: parse_uuid(&id, "workout_programs.id")?,
            trainer_id: parse_uuid(&trainer_id, "workout_programs.trainer_id")?,
            client_id: client_id
                .map(|c| parse_uuid(&c, "workout_programs.client_id"))
                .transpose()?,
            name: row.get("name"),
            description: row.get("description"),
            difficulty_level: row.get("difficulty_level"),
            duration_weeks: row.get("duration_weeks"),
            exercises,
            is_template: row.get("is_template"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }
}
