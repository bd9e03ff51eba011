// ABOUTME: Main library entry point for the EvolveCoach coaching platform
// ABOUTME: REST API connecting personal trainers and clients over a relational store
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 EvolveCoach

#![deny(unsafe_code)]

//! # EvolveCoach
//!
//! Backend for a personal-training coaching platform. Trainers and clients
//! register, connect through an approval workflow, and exchange workout
//! programs, weekly check-ins, messages, and video sessions.
//!
//! ## Architecture
//!
//! - **Models**: row-shaped domain types plus the typed exercise and
//!   check-in payloads stored as JSON columns
//! - **Database**: SQLite via sqlx, one operations module per table
//! - **Routes**: axum routers per domain with thin handlers
//! - **Auth**: bcrypt credentials and HS256 session tokens
//!
//! ## Example
//!
//! ```rust,no_run
//! use evolvecoach::config::ServerConfig;
//! use evolvecoach::errors::AppResult;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     evolvecoach::server::run(config).await
//! }
//! ```

/// Session token management and password hashing
pub mod auth;

/// Environment-driven server configuration
pub mod config;

/// Database pool and per-table operations
pub mod database;

/// Unified error handling with stable error codes
pub mod errors;

/// Domain models
pub mod models;

/// HTTP routes organized by domain
pub mod routes;

/// Server assembly and startup
pub mod server;
