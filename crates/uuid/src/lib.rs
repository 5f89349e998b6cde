//! Record identifiers and sharded-path utilities.
//!
//! Intake stores every record (patient, doctor, appointment) under a sharded directory derived
//! from its identifier. Identifiers use a *canonical* form: **32 lowercase hexadecimal
//! characters** (no hyphens), the same value `Uuid::new_v4().simple().to_string()` produces.
//!
//! ## Sharded directory layout
//! For a canonical UUID `u`, a record lives under:
//! `parent_dir/<u[0..2]>/<u[2..4]>/<u>/`
//!
//! Example:
//! `intake_data/patients/55/0e/550e8400e29b41d4a716446655440000/`
//!
//! Non-canonical input (uppercase, hyphenated, wrong length, non-hex) is rejected by
//! [`ShardableUuid::parse`], so a path can never be derived from an unvalidated string.

mod service;

pub use service::ShardableUuid;

/// Error type for identifier operations.
#[derive(Debug, thiserror::Error)]
pub enum UuidError {
    /// Invalid input provided
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for identifier operations.
pub type UuidResult<T> = Result<T, UuidError>;
