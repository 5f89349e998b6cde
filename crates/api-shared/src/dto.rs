//! JSON wire types.
//!
//! Field names follow the intake front end: snake_case throughout except `doctorId` on
//! appointments.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Patient {
    pub id: String,
    pub name: String,
    pub age: Option<u32>,
    pub gender: String,
    pub symptoms: String,
    pub history: String,
    pub created_at: String,
}

/// Intake form for a new patient.
///
/// Text fields may be absent or `null`; both mean "nothing reported".
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CreatePatientReq {
    pub name: String,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub symptoms: Option<String>,
    #[serde(default)]
    pub history: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Doctor {
    pub id: String,
    pub name: String,
    pub specialization: String,
    pub address: String,
    pub available_time: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CreateDoctorReq {
    pub name: String,
    pub specialization: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub available_time: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Appointment {
    pub id: String,
    pub patient: String,
    #[serde(rename = "doctorId")]
    pub doctor_id: String,
    pub date: String,
    pub time: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CreateAppointmentReq {
    pub patient: String,
    #[serde(rename = "doctorId")]
    pub doctor_id: String,
    pub date: String,
    pub time: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Medicine {
    pub name: String,
    pub dosage: String,
}

/// Coarse risk classification on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One patient's risk analysis.
///
/// `meds` may repeat a medicine recommended by more than one condition; `docs` never repeats a
/// specialist.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AnalysisRes {
    pub patient: Patient,
    pub level: RiskLevel,
    pub conditions: Vec<String>,
    pub meds: Vec<Medicine>,
    pub docs: Vec<String>,
}
