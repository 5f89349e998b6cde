//! Constants used throughout the intake core crate.
//!
//! Storage layout names and the fixed risk-scoring weights live here so the store and the
//! analyzer never disagree about them.

/// Default directory for record storage when no explicit directory is configured.
pub const DEFAULT_DATA_DIR: &str = "intake_data";

/// Directory name for patient records.
pub const PATIENTS_DIR_NAME: &str = "patients";

/// Directory name for doctor records.
pub const DOCTORS_DIR_NAME: &str = "doctors";

/// Directory name for appointment records.
pub const APPOINTMENTS_DIR_NAME: &str = "appointments";

/// Filename for patient YAML files.
pub const PATIENT_FILENAME: &str = "patient.yaml";

/// Filename for doctor YAML files.
pub const DOCTOR_FILENAME: &str = "doctor.yaml";

/// Filename for appointment YAML files.
pub const APPOINTMENT_FILENAME: &str = "appointment.yaml";

/// Patients strictly older than this score [`AGE_POINTS`].
pub const AGE_THRESHOLD: u32 = 45;

/// Points for exceeding [`AGE_THRESHOLD`].
pub const AGE_POINTS: u32 = 2;

/// Points for a condition named directly in history or symptoms.
pub const DIRECT_MATCH_POINTS: u32 = 2;

/// Points for a condition inferred from a symptom phrase.
pub const SYMPTOM_MATCH_POINTS: u32 = 1;

/// Minimum score classified as medium risk.
pub const MEDIUM_RISK_THRESHOLD: u32 = 3;

/// Minimum score classified as high risk.
pub const HIGH_RISK_THRESHOLD: u32 = 5;
