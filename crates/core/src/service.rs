//! Batch analysis over the record store.
//!
//! [`AnalysisService`] is the glue behind "analyse all patients": it reads every stored patient
//! and hands the list to the [`RiskAnalyzer`]. If the store cannot be read the whole batch fails
//! before any patient is analysed, so callers never see a partial result list.

use crate::analysis::{AnalysisResult, RiskAnalyzer, RiskLevel};
use crate::config::CoreConfig;
use crate::error::IntakeResult;
use crate::knowledge::{KnowledgeBase, Medicine};
use crate::matcher::Matcher;
use crate::records::{Appointment, Doctor, Patient, PatientStore};
use api_shared::dto;
use std::sync::Arc;

/// Analyzer whose matching strategy is chosen at runtime from [`CoreConfig`].
pub type ConfiguredAnalyzer = RiskAnalyzer<Box<dyn Matcher>>;

/// Reads patients from the store and analyses them as one batch.
pub struct AnalysisService {
    patients: PatientStore,
    analyzer: ConfiguredAnalyzer,
}

impl AnalysisService {
    /// Builds the service using the match mode from `cfg`.
    pub fn new(cfg: Arc<CoreConfig>, knowledge: Arc<KnowledgeBase>) -> Self {
        let analyzer = RiskAnalyzer::with_matcher(knowledge, cfg.match_mode().matcher());
        Self {
            patients: PatientStore::new(cfg),
            analyzer,
        }
    }

    /// Analyses every stored patient, in store order.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::StoreUnavailable`](crate::IntakeError::StoreUnavailable) if the
    /// patient list cannot be read. No analysis runs in that case.
    pub fn analyse_stored(&self) -> IntakeResult<Vec<dto::AnalysisRes>> {
        let patients = self.patients.list()?;
        let results = self.analyzer.analyze_all(&patients);
        tracing::info!("analysed {} patients", results.len());
        Ok(results.iter().map(dto::AnalysisRes::from).collect())
    }
}

impl From<&Patient> for dto::Patient {
    fn from(patient: &Patient) -> Self {
        dto::Patient {
            id: patient.id.to_string(),
            name: patient.name.clone(),
            age: patient.age,
            gender: patient.gender.clone(),
            symptoms: patient.symptoms.clone(),
            history: patient.history.clone(),
            created_at: patient.created_at.to_rfc3339(),
        }
    }
}

impl From<&Doctor> for dto::Doctor {
    fn from(doctor: &Doctor) -> Self {
        dto::Doctor {
            id: doctor.id.to_string(),
            name: doctor.name.clone(),
            specialization: doctor.specialization.clone(),
            address: doctor.address.clone(),
            available_time: doctor.available_time.clone(),
        }
    }
}

impl From<&Appointment> for dto::Appointment {
    fn from(appointment: &Appointment) -> Self {
        dto::Appointment {
            id: appointment.id.to_string(),
            patient: appointment.patient.clone(),
            doctor_id: appointment.doctor_id.to_string(),
            date: appointment.date.clone(),
            time: appointment.time.clone(),
        }
    }
}

impl From<&Medicine> for dto::Medicine {
    fn from(medicine: &Medicine) -> Self {
        dto::Medicine {
            name: medicine.name.clone(),
            dosage: medicine.dosage.clone(),
        }
    }
}

impl From<RiskLevel> for dto::RiskLevel {
    fn from(level: RiskLevel) -> Self {
        match level {
            RiskLevel::Low => dto::RiskLevel::Low,
            RiskLevel::Medium => dto::RiskLevel::Medium,
            RiskLevel::High => dto::RiskLevel::High,
        }
    }
}

impl From<&AnalysisResult<'_>> for dto::AnalysisRes {
    fn from(result: &AnalysisResult<'_>) -> Self {
        dto::AnalysisRes {
            patient: result.patient.into(),
            level: result.level.into(),
            conditions: result.conditions.clone(),
            meds: result.meds.iter().map(dto::Medicine::from).collect(),
            docs: result.specialists.clone(),
        }
    }
}
