// ABOUTME: Domain models for profiles, connection requests, programs, check-ins, and messaging
// ABOUTME: Row-shaped types plus the typed exercise and check-in payloads stored as JSON columns
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 EvolveCoach

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Profiles
// ============================================================================

/// Account discriminator, immutable after signup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    /// Offers coaching, owns programs, reviews check-ins
    Trainer,
    /// Receives coaching, submits check-ins
    Client,
}

impl UserType {
    /// Database/string representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trainer => "trainer",
            Self::Client => "client",
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trainer" => Ok(Self::Trainer),
            "client" => Ok(Self::Client),
            other => Err(format!("unknown user type: {other}")),
        }
    }
}

/// Base identity record common to all users
#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    /// Stable user id
    pub id: Uuid,
    /// Login email, unique
    pub email: String,
    /// Display name
    pub full_name: Option<String>,
    /// Account discriminator
    pub user_type: UserType,
    /// Optional avatar image URL
    pub avatar_url: Option<String>,
    /// Row creation time
    pub created_at: DateTime<Utc>,
    /// Last owner update
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Build a fresh profile for signup
    #[must_use]
    pub fn new(email: String, full_name: Option<String>, user_type: UserType) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            full_name,
            user_type,
            avatar_url: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Trimmed profile embedded in listings and joined rows
#[derive(Debug, Clone, Serialize)]
pub struct ProfileSummary {
    /// User id
    pub id: Uuid,
    /// Display name
    pub full_name: Option<String>,
    /// Login email
    pub email: String,
    /// Account discriminator
    pub user_type: UserType,
    /// Optional avatar image URL
    pub avatar_url: Option<String>,
}

/// Trainer extension record, 1:1 with a trainer profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainerProfile {
    /// Same id as the base profile
    pub id: Uuid,
    /// Free-form biography
    pub bio: Option<String>,
    /// Public business name
    pub business_name: Option<String>,
    /// Hourly rate in the trainer's currency
    pub hourly_rate: Option<f64>,
    /// Years of coaching experience
    pub experience_years: Option<i64>,
    /// Held certifications
    pub certifications: Vec<String>,
    /// Coaching specializations
    pub specializations: Vec<String>,
    /// IANA timezone name
    pub timezone: Option<String>,
}

/// Client extension record, 1:1 with a client profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientProfile {
    /// Same id as the base profile
    pub id: Uuid,
    /// Connected trainer; set only through an approved request
    pub trainer_id: Option<Uuid>,
    /// Self-assessed fitness level
    pub fitness_level: Option<String>,
    /// Training goals
    pub goals: Vec<String>,
    /// Height in centimeters
    pub height_cm: Option<f64>,
    /// Weight in kilograms
    pub weight_kg: Option<f64>,
    /// Birth date
    pub date_of_birth: Option<NaiveDate>,
    /// Conditions the trainer should know about
    pub medical_conditions: Vec<String>,
}

/// Trainer directory entry: base profile joined with the trainer extension
#[derive(Debug, Clone, Serialize)]
pub struct TrainerListing {
    /// Base profile fields
    pub profile: ProfileSummary,
    /// Trainer extension fields
    pub details: TrainerProfile,
}

/// A trainer's view of one connected client
#[derive(Debug, Clone, Serialize)]
pub struct ClientListing {
    /// Base profile fields
    pub profile: ProfileSummary,
    /// Client extension fields
    pub details: ClientProfile,
}

// ============================================================================
// Connection workflow
// ============================================================================

/// Trainer request lifecycle; both settled states are terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Awaiting the trainer's decision
    Pending,
    /// Accepted; the connection was granted
    Approved,
    /// Declined
    Rejected,
}

impl RequestStatus {
    /// Database/string representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Whether the status admits no further transition
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

impl FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(format!("unknown request status: {other}")),
        }
    }
}

/// A client's request to connect with a trainer
#[derive(Debug, Clone, Serialize)]
pub struct TrainerRequest {
    /// Request id
    pub id: Uuid,
    /// Requesting client
    pub client_id: Uuid,
    /// Addressed trainer
    pub trainer_id: Uuid,
    /// Lifecycle state
    pub status: RequestStatus,
    /// Optional introduction from the client
    pub message: Option<String>,
    /// Submission time
    pub created_at: DateTime<Utc>,
    /// Last status change
    pub updated_at: DateTime<Utc>,
}

/// Request row joined with both parties' profile snapshots
#[derive(Debug, Clone, Serialize)]
pub struct TrainerRequestDetail {
    /// The request row itself
    #[serde(flatten)]
    pub request: TrainerRequest,
    /// Addressed trainer
    pub trainer: ProfileSummary,
    /// Requesting client
    pub client: ProfileSummary,
}

// ============================================================================
// Workout programs
// ============================================================================

/// One exercise inside a program. Closed tagged schema: payloads that do not
/// match a known kind are rejected when the stored JSON is read back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Exercise {
    /// Set/rep work (lifts, calisthenics)
    Strength {
        /// Exercise name
        name: String,
        /// Number of sets
        sets: u32,
        /// Repetitions per set
        reps: u32,
    },
    /// Time-boxed work (planks, intervals)
    Timed {
        /// Exercise name
        name: String,
        /// Working duration in seconds
        duration_seconds: u32,
    },
    /// Distance work (runs, rows)
    Distance {
        /// Exercise name
        name: String,
        /// Target distance in meters
        meters: u32,
    },
}

/// A named, owned exercise list; either a reusable template or a copy
/// assigned to one client
#[derive(Debug, Clone, Serialize)]
pub struct WorkoutProgram {
    /// Program id
    pub id: Uuid,
    /// Owning trainer
    pub trainer_id: Uuid,
    /// Assigned client; `None` for templates
    pub client_id: Option<Uuid>,
    /// Program name
    pub name: String,
    /// Free-form description
    pub description: Option<String>,
    /// Difficulty label (beginner/intermediate/advanced)
    pub difficulty_level: Option<String>,
    /// Intended length in weeks
    pub duration_weeks: Option<i64>,
    /// Ordered exercise list
    pub exercises: Vec<Exercise>,
    /// Whether this row is a reusable template
    pub is_template: bool,
    /// Row creation time
    pub created_at: DateTime<Utc>,
    /// Last trainer edit
    pub updated_at: DateTime<Utc>,
}

/// Fields a trainer supplies when creating a program
#[derive(Debug, Clone, Deserialize)]
pub struct NewWorkoutProgram {
    /// Program name
    pub name: String,
    /// Free-form description
    #[serde(default)]
    pub description: Option<String>,
    /// Difficulty label
    #[serde(default)]
    pub difficulty_level: Option<String>,
    /// Intended length in weeks
    #[serde(default)]
    pub duration_weeks: Option<i64>,
    /// Ordered exercise list
    pub exercises: Vec<Exercise>,
    /// Assign directly to a client instead of creating a template
    #[serde(default)]
    pub client_id: Option<Uuid>,
    /// Create as a reusable template
    #[serde(default)]
    pub is_template: bool,
}

// ============================================================================
// Check-ins
// ============================================================================

/// How the client's workouts felt over the week, the five-point scale from
/// the check-in form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutFeeling {
    /// Completely drained
    Exhausted,
    /// Struggled through
    Strained,
    /// Solid week
    Good,
    /// Felt strong
    Strong,
    /// Best week yet
    Energized,
}

/// Energy compared to the previous week
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnergyLevel {
    /// Far less energy
    MuchLower,
    /// Somewhat less
    Lower,
    /// About the same
    Same,
    /// Somewhat more
    Higher,
    /// Far more energy
    MuchHigher,
}

/// The structured self-report inside a check-in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckInResponses {
    /// Workout feeling selection
    pub feeling: WorkoutFeeling,
    /// Energy-delta selection
    pub energy: EnergyLevel,
    /// Optional free-form notes
    #[serde(default)]
    pub notes: Option<String>,
}

/// A client's periodic self-report, optionally annotated by the trainer or a
/// summarization process
#[derive(Debug, Clone, Serialize)]
pub struct CheckIn {
    /// Check-in id
    pub id: Uuid,
    /// Submitting client
    pub client_id: Uuid,
    /// Connected trainer at submission time
    pub trainer_id: Uuid,
    /// Week bucket computed at submission
    pub week_number: i64,
    /// Structured self-report
    pub responses: CheckInResponses,
    /// Progress photo URLs
    pub progress_photos: Vec<String>,
    /// Generated summary, if any
    pub ai_summary: Option<String>,
    /// Trainer's written feedback, if reviewed
    pub trainer_feedback: Option<String>,
    /// When the trainer reviewed it
    pub reviewed_at: Option<DateTime<Utc>>,
    /// Submission time
    pub submitted_at: DateTime<Utc>,
}

// ============================================================================
// Messaging
// ============================================================================

/// A directed text message between two users, immutable once sent
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    /// Message id
    pub id: Uuid,
    /// Author
    pub sender_id: Uuid,
    /// Addressee
    pub recipient_id: Uuid,
    /// Message body
    pub content: String,
    /// Message kind, `text` unless a system notice
    pub message_type: String,
    /// When the recipient read it
    pub read_at: Option<DateTime<Utc>>,
    /// Send time
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Video sessions
// ============================================================================

/// Video session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Booked, not yet held
    Scheduled,
    /// Held
    Completed,
    /// Called off
    Cancelled,
}

impl SessionStatus {
    /// Database/string representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether the status admits no further transition
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl FromStr for SessionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(Self::Scheduled),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(format!("unknown session status: {other}")),
        }
    }
}

/// A scheduled trainer/client video call
#[derive(Debug, Clone, Serialize)]
pub struct VideoSession {
    /// Session id
    pub id: Uuid,
    /// Hosting trainer
    pub trainer_id: Uuid,
    /// Attending client
    pub client_id: Uuid,
    /// Scheduled start
    pub session_date: DateTime<Utc>,
    /// Planned length in minutes
    pub duration_minutes: Option<i64>,
    /// Join link
    pub meeting_url: Option<String>,
    /// Lifecycle state
    pub status: SessionStatus,
    /// Generated summary, if any
    pub ai_summary: Option<String>,
    /// Structured follow-ups, if any
    pub action_items: Option<serde_json::Value>,
    /// Call transcript, if any
    pub transcript: Option<String>,
    /// Row creation time
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn user_type_round_trips() {
        assert_eq!("trainer".parse::<UserType>(), Ok(UserType::Trainer));
        assert_eq!(UserType::Client.as_str(), "client");
        assert!("admin".parse::<UserType>().is_err());
    }

    #[test]
    fn settled_request_statuses_are_terminal() {
        assert!(!RequestStatus::Pending.is_terminal());
        assert!(RequestStatus::Approved.is_terminal());
        assert!(RequestStatus::Rejected.is_terminal());
    }

    #[test]
    fn exercise_schema_is_closed() {
        let raw = r#"{"kind":"strength","name":"Squat","sets":5,"reps":5}"#;
        let parsed: Exercise = serde_json::from_str(raw).unwrap();
        assert_eq!(
            parsed,
            Exercise::Strength {
                name: "Squat".to_owned(),
                sets: 5,
                reps: 5
            }
        );

        // Unknown kinds are rejected rather than passed through as blobs
        let unknown = r#"{"kind":"swim","name":"Laps","laps":10}"#;
        assert!(serde_json::from_str::<Exercise>(unknown).is_err());
    }

    #[test]
    fn check_in_responses_require_both_selections() {
        let missing_energy = r#"{"feeling":"good"}"#;
        assert!(serde_json::from_str::<CheckInResponses>(missing_energy).is_err());

        let complete = r#"{"feeling":"good","energy":"higher"}"#;
        let parsed: CheckInResponses = serde_json::from_str(complete).unwrap();
        assert_eq!(parsed.feeling, WorkoutFeeling::Good);
        assert_eq!(parsed.energy, EnergyLevel::Higher);
    }
}
