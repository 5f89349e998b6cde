//! # Intake Core
//!
//! Core business logic for the clinical intake service.
//!
//! - [`knowledge`]: the immutable medical knowledge base
//! - [`analysis`]: the patient risk analyzer and its batch runner
//! - [`matcher`]: pluggable text matching used by the analyzer
//! - [`records`]: file-backed patient, doctor and appointment stores
//! - [`service`]: "analyse all stored patients" glue between the two
//!
//! **No API concerns**: HTTP servers, authentication and request parsing belong in `api-rest`
//! or `api-shared`.

pub mod analysis;
pub mod config;
pub mod constants;
pub mod error;
pub mod knowledge;
pub mod matcher;
pub mod records;
pub mod service;

pub use api_shared::dto;

pub use analysis::{AnalysisResult, RiskAnalyzer, RiskLevel};
pub use config::CoreConfig;
pub use constants::DEFAULT_DATA_DIR;
pub use error::{IntakeError, IntakeResult, KnowledgeError, KnowledgeResult};
pub use intake_types::{NonEmptyText, TextError};
pub use intake_uuid::ShardableUuid;
pub use knowledge::{Condition, KnowledgeBase, KnowledgeBaseBuilder, Medicine, SymptomMapping};
pub use matcher::{
    CaseInsensitiveMatcher, MatchMode, Matcher, SubstringMatcher, WordBoundaryMatcher,
};
pub use records::{
    Appointment, AppointmentStore, Doctor, DoctorStore, NewAppointment, NewDoctor, NewPatient,
    Patient, PatientStore,
};
pub use service::{AnalysisService, ConfiguredAnalyzer};
