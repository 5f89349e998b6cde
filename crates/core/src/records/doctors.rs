//! Doctor directory records.

use crate::config::CoreConfig;
use crate::constants::DOCTOR_FILENAME;
use crate::error::IntakeResult;
use crate::records::shared::{create_record, list_records, read_record};
use intake_types::NonEmptyText;
use intake_uuid::ShardableUuid;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A stored doctor and the time slots they offer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: ShardableUuid,
    pub name: String,
    pub specialization: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub available_time: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct NewDoctor {
    pub name: NonEmptyText,
    pub specialization: NonEmptyText,
    pub address: String,
    pub available_time: Vec<String>,
}

/// File-backed doctor store.
#[derive(Clone, Debug)]
pub struct DoctorStore {
    cfg: Arc<CoreConfig>,
}

impl DoctorStore {
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self { cfg }
    }

    /// Stores a new doctor. Blank time slots are dropped and the rest trimmed.
    pub fn create(&self, new: NewDoctor) -> IntakeResult<Doctor> {
        let available_time = new
            .available_time
            .iter()
            .map(|slot| slot.trim())
            .filter(|slot| !slot.is_empty())
            .map(str::to_string)
            .collect();

        let doctor = create_record(&self.cfg.doctors_dir(), DOCTOR_FILENAME, |id| Doctor {
            id,
            name: new.name.into_inner(),
            specialization: new.specialization.into_inner(),
            address: new.address,
            available_time,
        })?;
        tracing::info!("created doctor {}", doctor.id);
        Ok(doctor)
    }

    pub fn get(&self, id: &ShardableUuid) -> IntakeResult<Option<Doctor>> {
        read_record(&self.cfg.doctors_dir(), DOCTOR_FILENAME, id)
    }

    /// Lists all doctors ordered by name.
    pub fn list(&self) -> IntakeResult<Vec<Doctor>> {
        let mut doctors: Vec<Doctor> = list_records(&self.cfg.doctors_dir(), DOCTOR_FILENAME)?;
        doctors.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(doctors)
    }
}
