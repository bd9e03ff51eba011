// ABOUTME: Session token management and password hashing
// ABOUTME: Issues and validates HS256 JWTs and wraps bcrypt for credential checks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 EvolveCoach

use axum::http::HeaderMap;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tokio::task;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::Profile;

/// Claims carried by a session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    /// Login email at issue time
    pub email: String,
    /// Issued-at, seconds since epoch
    pub iat: i64,
    /// Expiry, seconds since epoch
    pub exp: i64,
}

/// Issues and validates session tokens
#[derive(Clone)]
pub struct AuthManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry_hours: i64,
}

impl AuthManager {
    /// Create a manager signing with the given secret
    #[must_use]
    pub fn new(secret: &[u8], expiry_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            expiry_hours,
        }
    }

    /// Generate a session token for a profile
    ///
    /// # Errors
    ///
    /// Returns an error if token signing fails
    pub fn generate_token(&self, profile: &Profile) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: profile.id.to_string(),
            email: profile.email.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(self.expiry_hours)).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))
    }

    /// Validate a session token and return the caller's user id
    ///
    /// # Errors
    ///
    /// Returns an error if the token is malformed, expired, or carries an
    /// invalid subject
    pub fn validate_token(&self, token: &str) -> AppResult<Uuid> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(|e| AppError::auth_invalid(format!("Invalid session token: {e}")))?;

        Uuid::parse_str(&data.claims.sub)
            .map_err(|_| AppError::auth_invalid("Session token carries an invalid subject"))
    }

    /// Session token lifetime in hours
    #[must_use]
    pub const fn expiry_hours(&self) -> i64 {
        self.expiry_hours
    }
}

/// Hash a password for storage
///
/// # Errors
///
/// Returns an error if hashing fails
pub fn hash_password(password: &str) -> AppResult<String> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))
}

/// Verify a password against a stored hash.
///
/// bcrypt verification is CPU-bound, so it runs on the blocking pool.
///
/// # Errors
///
/// Returns an error if the verification task fails to run
pub async fn verify_password(password: String, password_hash: String) -> AppResult<bool> {
    let is_valid = task::spawn_blocking(move || bcrypt::verify(&password, &password_hash))
        .await
        .map_err(|e| AppError::internal(format!("Password verification task failed: {e}")))?
        .unwrap_or(false);
    Ok(is_valid)
}

/// Extract the bearer token from an `Authorization` header
///
/// # Errors
///
/// Returns an error if the header is missing or not a bearer credential
pub fn extract_bearer_token(headers: &HeaderMap) -> AppResult<&str> {
    let value = headers
        .get("authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::auth_required("Missing authorization header"))?;

    value
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::auth_invalid("Authorization header is not a bearer token"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::UserType;

    fn test_profile() -> Profile {
        Profile::new(
            "coach@example.com".to_owned(),
            Some("Coach".to_owned()),
            UserType::Trainer,
        )
    }

    #[test]
    fn token_round_trips() {
        let manager = AuthManager::new(b"test-secret", 24);
        let profile = test_profile();
        let token = manager.generate_token(&profile).unwrap();
        let user_id = manager.validate_token(&token).unwrap();
        assert_eq!(user_id, profile.id);
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let manager = AuthManager::new(b"secret-a", 24);
        let other = AuthManager::new(b"secret-b", 24);
        let token = manager.generate_token(&test_profile()).unwrap();
        assert!(other.validate_token(&token).is_err());
    }

    #[test]
    fn bearer_extraction_requires_prefix() {
        let mut headers = HeaderMap::new();
        assert!(extract_bearer_token(&headers).is_err());

        headers.insert("authorization", "Token abc".parse().unwrap());
        assert!(extract_bearer_token(&headers).is_err());

        headers.insert("authorization", "Bearer abc".parse().unwrap());
        assert_eq!(extract_bearer_token(&headers).unwrap(), "abc");
    }
}
