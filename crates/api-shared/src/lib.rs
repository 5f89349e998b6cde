//! # API Shared
//!
//! Shared definitions for the intake APIs.
//!
//! Contains:
//! - Wire types (`dto` module) with serde and OpenAPI schema derives
//! - Shared services like `HealthService`
//! - API-key authentication
//!
//! Used by `intake-core` (conversions into wire types) and `api-rest`.

pub mod auth;
pub mod dto;
pub mod health;

pub use dto::*;
pub use health::HealthService;
