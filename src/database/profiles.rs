// ABOUTME: Profile database operations for signup, owner updates, and directories
// ABOUTME: Manages the base profiles table plus trainer/client extension records
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 EvolveCoach

use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use super::{decode_string_list, parse_uuid, Database};
use crate::errors::{AppError, AppResult};
use crate::models::{
    ClientListing, ClientProfile, Profile, ProfileSummary, TrainerListing, TrainerProfile,
    UserType,
};

/// Owner-editable base profile fields; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    /// Display name
    pub full_name: Option<String>,
    /// Avatar image URL
    pub avatar_url: Option<String>,
}

/// Owner-editable trainer extension fields; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrainerProfileUpdate {
    /// Free-form biography
    pub bio: Option<String>,
    /// Public business name
    pub business_name: Option<String>,
    /// Hourly rate
    pub hourly_rate: Option<f64>,
    /// Years of coaching experience
    pub experience_years: Option<i64>,
    /// Held certifications
    pub certifications: Option<Vec<String>>,
    /// Coaching specializations
    pub specializations: Option<Vec<String>>,
    /// IANA timezone name
    pub timezone: Option<String>,
}

/// Owner-editable client extension fields; `None` leaves a field unchanged.
/// The connected trainer is deliberately absent: `trainer_id` changes only
/// through an approved connection request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientProfileUpdate {
    /// Self-assessed fitness level
    pub fitness_level: Option<String>,
    /// Training goals
    pub goals: Option<Vec<String>>,
    /// Height in centimeters
    pub height_cm: Option<f64>,
    /// Weight in kilograms
    pub weight_kg: Option<f64>,
    /// Birth date
    pub date_of_birth: Option<NaiveDate>,
    /// Conditions the trainer should know about
    pub medical_conditions: Option<Vec<String>>,
}

impl Database {
    /// Create a profile together with its type-specific extension record.
    ///
    /// Both inserts run in one transaction so a signup never leaves a base
    /// profile without its extension row.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The email is already in use by another user
    /// - Database operation fails
    pub async fn create_profile(&self, profile: &Profile, password_hash: &str) -> AppResult<Uuid> {
        let mut tx = self
            .pool()
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        let insert = sqlx::query(
            r"
            INSERT INTO profiles (id, email, password_hash, full_name, user_type, avatar_url, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(profile.id.to_string())
        .bind(&profile.email)
        .bind(password_hash)
        .bind(&profile.full_name)
        .bind(profile.user_type.as_str())
        .bind(&profile.avatar_url)
        .bind(profile.created_at)
        .bind(profile.updated_at)
        .execute(&mut *tx)
        .await;

        if let Err(e) = insert {
            if Self::is_unique_violation(&e) {
                return Err(AppError::invalid_input(
                    "Email already in use by another user",
                ));
            }
            return Err(AppError::database(format!("Failed to create profile: {e}")));
        }

        match profile.user_type {
            UserType::Trainer => {
                sqlx::query(
                    r"
                    INSERT INTO trainer_profiles (id, certifications, specializations)
                    VALUES ($1, '[]', '[]')
                    ",
                )
                .bind(profile.id.to_string())
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    AppError::database(format!("Failed to create trainer profile: {e}"))
                })?;
            }
            UserType::Client => {
                sqlx::query(
                    r"
                    INSERT INTO client_profiles (id, goals, medical_conditions)
                    VALUES ($1, '[]', '[]')
                    ",
                )
                .bind(profile.id.to_string())
                .execute(&mut *tx)
                .await
                .map_err(|e| AppError::database(format!("Failed to create client profile: {e}")))?;
            }
        }

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit signup: {e}")))?;

        Ok(profile.id)
    }

    /// Get a profile by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_profile(&self, profile_id: Uuid) -> AppResult<Option<Profile>> {
        let row = sqlx::query(
            r"
            SELECT id, email, full_name, user_type, avatar_url, created_at, updated_at
            FROM profiles WHERE id = $1
            ",
        )
        .bind(profile_id.to_string())
        .fetch_optional(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to get profile: {e}")))?;

        row.map(|r| Self::row_to_profile(&r)).transpose()
    }

    /// Get a profile by email
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_profile_by_email(&self, email: &str) -> AppResult<Option<Profile>> {
        let row = sqlx::query(
            r"
            SELECT id, email, full_name, user_type, avatar_url, created_at, updated_at
            FROM profiles WHERE email = $1
            ",
        )
        .bind(email)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to get profile by email: {e}")))?;

        row.map(|r| Self::row_to_profile(&r)).transpose()
    }

    /// Get a profile and its stored password hash by email, for login
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_profile_with_hash_by_email(
        &self,
        email: &str,
    ) -> AppResult<Option<(Profile, String)>> {
        let row = sqlx::query(
            r"
            SELECT id, email, password_hash, full_name, user_type, avatar_url, created_at, updated_at
            FROM profiles WHERE email = $1
            ",
        )
        .bind(email)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to get credentials: {e}")))?;

        row.map(|r| {
            let hash: String = r.get("password_hash");
            Ok((Self::row_to_profile(&r)?, hash))
        })
        .transpose()
    }

    /// Update the caller's base profile
    ///
    /// # Errors
    ///
    /// Returns an error if the profile is not found or the update fails
    pub async fn update_profile(
        &self,
        profile_id: Uuid,
        updates: &ProfileUpdate,
    ) -> AppResult<Profile> {
        let current = self
            .get_profile(profile_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Profile {profile_id}")))?;

        let full_name = updates.full_name.clone().or(current.full_name);
        let avatar_url = updates.avatar_url.clone().or(current.avatar_url);

        sqlx::query(
            r"
            UPDATE profiles SET full_name = $2, avatar_url = $3, updated_at = $4
            WHERE id = $1
            ",
        )
        .bind(profile_id.to_string())
        .bind(&full_name)
        .bind(&avatar_url)
        .bind(Utc::now())
        .execute(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to update profile: {e}")))?;

        self.get_profile(profile_id)
            .await?
            .ok_or_else(|| AppError::not_found("Profile after update"))
    }

    /// Get a trainer extension record
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_trainer_profile(&self, profile_id: Uuid) -> AppResult<Option<TrainerProfile>> {
        let row = sqlx::query(
            r"
            SELECT id, bio, business_name, hourly_rate, experience_years,
                   certifications, specializations, timezone
            FROM trainer_profiles WHERE id = $1
            ",
        )
        .bind(profile_id.to_string())
        .fetch_optional(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to get trainer profile: {e}")))?;

        row.map(|r| Self::row_to_trainer_profile(&r)).transpose()
    }

    /// Get a client extension record
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_client_profile(&self, profile_id: Uuid) -> AppResult<Option<ClientProfile>> {
        let row = sqlx::query(
            r"
            SELECT id, trainer_id, fitness_level, goals, height_cm, weight_kg,
                   date_of_birth, medical_conditions
            FROM client_profiles WHERE id = $1
            ",
        )
        .bind(profile_id.to_string())
        .fetch_optional(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to get client profile: {e}")))?;

        row.map(|r| Self::row_to_client_profile(&r)).transpose()
    }

    /// Update the caller's trainer extension record
    ///
    /// # Errors
    ///
    /// Returns an error if the record is not found or the update fails
    pub async fn update_trainer_profile(
        &self,
        profile_id: Uuid,
        updates: &TrainerProfileUpdate,
    ) -> AppResult<TrainerProfile> {
        let current = self
            .get_trainer_profile(profile_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Trainer profile {profile_id}")))?;

        let bio = updates.bio.clone().or(current.bio);
        let business_name = updates.business_name.clone().or(current.business_name);
        let hourly_rate = updates.hourly_rate.or(current.hourly_rate);
        let experience_years = updates.experience_years.or(current.experience_years);
        let certifications = updates
            .certifications
            .clone()
            .unwrap_or(current.certifications);
        let specializations = updates
            .specializations
            .clone()
            .unwrap_or(current.specializations);
        let timezone = updates.timezone.clone().or(current.timezone);

        sqlx::query(
            r"
            UPDATE trainer_profiles SET
                bio = $2,
                business_name = $3,
                hourly_rate = $4,
                experience_years = $5,
                certifications = $6,
                specializations = $7,
                timezone = $8
            WHERE id = $1
            ",
        )
        .bind(profile_id.to_string())
        .bind(&bio)
        .bind(&business_name)
        .bind(hourly_rate)
        .bind(experience_years)
        .bind(serde_json::to_string(&certifications)?)
        .bind(serde_json::to_string(&specializations)?)
        .bind(&timezone)
        .execute(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to update trainer profile: {e}")))?;

        self.get_trainer_profile(profile_id)
            .await?
            .ok_or_else(|| AppError::not_found("Trainer profile after update"))
    }

    /// Update the caller's client extension record.
    ///
    /// `trainer_id` is not part of the update surface; the connection
    /// workflow owns that column.
    ///
    /// # Errors
    ///
    /// Returns an error if the record is not found or the update fails
    pub async fn update_client_profile(
        &self,
        profile_id: Uuid,
        updates: &ClientProfileUpdate,
    ) -> AppResult<ClientProfile> {
        let current = self
            .get_client_profile(profile_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Client profile {profile_id}")))?;

        let fitness_level = updates.fitness_level.clone().or(current.fitness_level);
        let goals = updates.goals.clone().unwrap_or(current.goals);
        let height_cm = updates.height_cm.or(current.height_cm);
        let weight_kg = updates.weight_kg.or(current.weight_kg);
        let date_of_birth = updates.date_of_birth.or(current.date_of_birth);
        let medical_conditions = updates
            .medical_conditions
            .clone()
            .unwrap_or(current.medical_conditions);

        sqlx::query(
            r"
            UPDATE client_profiles SET
                fitness_level = $2,
                goals = $3,
                height_cm = $4,
                weight_kg = $5,
                date_of_birth = $6,
                medical_conditions = $7
            WHERE id = $1
            ",
        )
        .bind(profile_id.to_string())
        .bind(&fitness_level)
        .bind(serde_json::to_string(&goals)?)
        .bind(height_cm)
        .bind(weight_kg)
        .bind(date_of_birth)
        .bind(serde_json::to_string(&medical_conditions)?)
        .execute(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to update client profile: {e}")))?;

        self.get_client_profile(profile_id)
            .await?
            .ok_or_else(|| AppError::not_found("Client profile after update"))
    }

    /// Trainer directory: every trainer profile joined with its extension row
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_trainers(&self) -> AppResult<Vec<TrainerListing>> {
        let rows = sqlx::query(
            r"
            SELECT p.id, p.full_name, p.email, p.user_type, p.avatar_url,
                   t.bio, t.business_name, t.hourly_rate, t.experience_years,
                   t.certifications, t.specializations, t.timezone
            FROM profiles p
            JOIN trainer_profiles t ON t.id = p.id
            WHERE p.user_type = 'trainer'
            ORDER BY p.created_at ASC
            ",
        )
        .fetch_all(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to list trainers: {e}")))?;

        let mut listings = Vec::with_capacity(rows.len());
        for row in rows {
            listings.push(TrainerListing {
                profile: Self::row_to_profile_summary(&row)?,
                details: Self::row_to_trainer_profile(&row)?,
            });
        }
        Ok(listings)
    }

    /// Clients connected to the given trainer
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_clients_for_trainer(
        &self,
        trainer_id: Uuid,
    ) -> AppResult<Vec<ClientListing>> {
        let rows = sqlx::query(
            r"
            SELECT p.id, p.full_name, p.email, p.user_type, p.avatar_url,
                   c.trainer_id, c.fitness_level, c.goals, c.height_cm, c.weight_kg,
                   c.date_of_birth, c.medical_conditions
            FROM profiles p
            JOIN client_profiles c ON c.id = p.id
            WHERE c.trainer_id = $1
            ORDER BY p.full_name ASC
            ",
        )
        .bind(trainer_id.to_string())
        .fetch_all(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to list clients: {e}")))?;

        let mut listings = Vec::with_capacity(rows.len());
        for row in rows {
            listings.push(ClientListing {
                profile: Self::row_to_profile_summary(&row)?,
                details: Self::row_to_client_profile(&row)?,
            });
        }
        Ok(listings)
    }

    fn row_to_profile(row: &SqliteRow) -> AppResult<Profile> {
        let id: String = row.get("id");
        let user_type: String = row.get("user_type");
        Ok(Profile {
            id: parse_uuid(&id, "profiles.id")?,
            email: row.get("email"),
            full_name: row.get("full_name"),
            user_type: user_type
                .parse()
                .map_err(|e| AppError::internal(format!("Failed to parse user type: {e}")))?,
            avatar_url: row.get("avatar_url"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }

    pub(crate) fn row_to_profile_summary(row: &SqliteRow) -> AppResult<ProfileSummary> {
        let id: String = row.get("id");
        let user_type: String = row.get("user_type");
        Ok(ProfileSummary {
            id: parse_uuid(&id, "profiles.id")?,
            full_name: row.get("full_name"),
            email: row.get("email"),
            user_type: user_type
                .parse()
                .map_err(|e| AppError::internal(format!("Failed to parse user type: {e}")))?,
            avatar_url: row.get("avatar_url"),
        })
    }

    fn row_to_trainer_profile(row: &SqliteRow) -> AppResult<TrainerProfile> {
        let id: String = row.get("id");
        let certifications: String = row.get("certifications");
        let specializations: String = row.get("specializations");
        Ok(TrainerProfile {
            id: parse_uuid(&id, "trainer_profiles.id")?,
            bio: row.get("bio"),
            business_name: row.get("business_name"),
            hourly_rate: row.get("hourly_rate"),
            experience_years: row.get("experience_years"),
            certifications: decode_string_list(&certifications, "certifications")?,
            specializations: decode_string_list(&specializations, "specializations")?,
            timezone: row.get("timezone"),
        })
    }

    pub(crate) fn row_to_client_profile(row: &SqliteRow) -> AppResult<ClientProfile> {
        let id: String = row.get("id");
        let trainer_id: Option<String> = row.get("trainer_id");
        let goals: String = row.get("goals");
        let medical_conditions: String = row.get("medical_conditions");
        Ok(ClientProfile {
            id: parse_uuid(&id, "client_profiles.id")?,
            trainer_id: trainer_id
                .map(|t| parse_uuid(&t, "client_profiles.trainer_id"))
                .transpose()?,
            fitness_level: row.get("fitness_level"),
            goals: decode_string_list(&goals, "goals")?,
            height_cm: row.get("height_cm"),
            weight_kg: row.get("weight_kg"),
            date_of_birth: row.get("date_of_birth"),
            medical_conditions: decode_string_list(&medical_conditions, "medical_conditions")?,
        })
    }
}
