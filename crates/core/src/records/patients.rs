//! Patient intake records.
//!
//! Patients are stored as `patient.yaml` under `<data_dir>/patients/<s1>/<s2>/<uuid>/`.
//! The risk analyzer reads these records and never writes them.

use crate::config::CoreConfig;
use crate::constants::PATIENT_FILENAME;
use crate::error::IntakeResult;
use crate::records::shared::{create_record, list_records, read_record};
use chrono::{DateTime, Utc};
use intake_types::NonEmptyText;
use intake_uuid::ShardableUuid;
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;

/// A stored patient.
///
/// `symptoms` and `history` are free text; an absent or `null` field reads back as the empty
/// string. `age` is optional because intake may not record it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub id: ShardableUuid,
    pub name: String,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub gender: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub symptoms: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub history: String,
    pub created_at: DateTime<Utc>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Intake form for a new patient.
#[derive(Clone, Debug)]
pub struct NewPatient {
    pub name: NonEmptyText,
    pub age: Option<u32>,
    pub gender: String,
    pub symptoms: String,
    pub history: String,
}

/// File-backed patient store.
#[derive(Clone, Debug)]
pub struct PatientStore {
    cfg: Arc<CoreConfig>,
}

impl PatientStore {
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self { cfg }
    }

    /// Stores a new patient and returns the stored record.
    ///
    /// # Errors
    ///
    /// Returns `IntakeError` if the record directory cannot be allocated or the YAML file
    /// cannot be written.
    pub fn create(&self, new: NewPatient) -> IntakeResult<Patient> {
        let patient = create_record(&self.cfg.patients_dir(), PATIENT_FILENAME, |id| Patient {
            id,
            name: new.name.into_inner(),
            age: new.age,
            gender: new.gender,
            symptoms: new.symptoms,
            history: new.history,
            created_at: Utc::now(),
        })?;
        tracing::info!("created patient {}", patient.id);
        Ok(patient)
    }

    /// Reads one patient, `None` if there is no such record.
    pub fn get(&self, id: &ShardableUuid) -> IntakeResult<Option<Patient>> {
        read_record(&self.cfg.patients_dir(), PATIENT_FILENAME, id)
    }

    /// Lists all stored patients ordered by creation time (then id).
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::StoreUnavailable`](crate::IntakeError::StoreUnavailable) if the
    /// patient directory exists but cannot be read.
    pub fn list(&self) -> IntakeResult<Vec<Patient>> {
        let mut patients: Vec<Patient> =
            list_records(&self.cfg.patients_dir(), PATIENT_FILENAME)?;
        patients.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(patients)
    }
}
