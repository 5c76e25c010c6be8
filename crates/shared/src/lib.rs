//! Shared types, errors, and configuration for Rounds.
//!
//! This crate provides common types used across all other crates:
//! - `Points`, the integer score unit
//! - Typed IDs that normalise numeric and string identifiers on ingest
//! - Page envelope returned by list endpoints
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
