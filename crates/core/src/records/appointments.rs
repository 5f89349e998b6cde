//! Appointment bookings.
//!
//! An appointment names a patient (free text, as entered at the front desk) and references an
//! existing doctor by id. The doctor must exist when the appointment is created.

use crate::config::CoreConfig;
use crate::constants::APPOINTMENT_FILENAME;
use crate::error::{IntakeError, IntakeResult};
use crate::records::doctors::DoctorStore;
use crate::records::shared::{create_record, list_records};
use intake_types::NonEmptyText;
use intake_uuid::ShardableUuid;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: ShardableUuid,
    pub patient: String,
    pub doctor_id: ShardableUuid,
    pub date: String,
    pub time: String,
}

#[derive(Clone, Debug)]
pub struct NewAppointment {
    pub patient: NonEmptyText,
    pub doctor_id: ShardableUuid,
    pub date: NonEmptyText,
    pub time: NonEmptyText,
}

/// File-backed appointment store.
#[derive(Clone, Debug)]
pub struct AppointmentStore {
    cfg: Arc<CoreConfig>,
}

impl AppointmentStore {
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self { cfg }
    }

    /// Books an appointment.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::DoctorNotFound`] if `doctor_id` names no stored doctor, or a
    /// storage error if the record cannot be written.
    pub fn create(&self, new: NewAppointment) -> IntakeResult<Appointment> {
        let doctors = DoctorStore::new(self.cfg.clone());
        if doctors.get(&new.doctor_id)?.is_none() {
            return Err(IntakeError::DoctorNotFound(new.doctor_id.to_string()));
        }

        let appointment = create_record(
            &self.cfg.appointments_dir(),
            APPOINTMENT_FILENAME,
            |id| Appointment {
                id,
                patient: new.patient.into_inner(),
                doctor_id: new.doctor_id,
                date: new.date.into_inner(),
                time: new.time.into_inner(),
            },
        )?;
        tracing::info!(
            "booked appointment {} with doctor {}",
            appointment.id,
            appointment.doctor_id
        );
        Ok(appointment)
    }

    /// Lists all appointments ordered by date, then time.
    pub fn list(&self) -> IntakeResult<Vec<Appointment>> {
        let mut appointments: Vec<Appointment> =
            list_records(&self.cfg.appointments_dir(), APPOINTMENT_FILENAME)?;
        appointments.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then_with(|| a.time.cmp(&b.time))
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(appointments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::MatchMode;
    use crate::records::doctors::NewDoctor;
    use std::path::Path;
    use tempfile::TempDir;

    fn test_cfg(data_dir: &Path) -> Arc<CoreConfig> {
        Arc::new(CoreConfig::new(data_dir.to_path_buf(), MatchMode::Substring).unwrap())
    }

    fn text(s: &str) -> NonEmptyText {
        NonEmptyText::new(s).unwrap()
    }

    fn booking(doctor_id: ShardableUuid, date: &str, time: &str) -> NewAppointment {
        NewAppointment {
            patient: text("Alice"),
            doctor_id,
            date: text(date),
            time: text(time),
        }
    }

    #[test]
    fn test_create_requires_existing_doctor() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let cfg = test_cfg(temp_dir.path());
        let store = AppointmentStore::new(cfg.clone());

        let err = store
            .create(booking(ShardableUuid::new(), "2026-03-01", "09:00"))
            .expect_err("unknown doctor should be rejected");
        assert!(matches!(err, IntakeError::DoctorNotFound(_)));
        assert!(!cfg.appointments_dir().exists(), "no record should be written");
    }

    #[test]
    fn test_create_and_list_sorted_by_date_and_time() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let cfg = test_cfg(temp_dir.path());
        let doctor = DoctorStore::new(cfg.clone())
            .create(NewDoctor {
                name: text("Dr Grey"),
                specialization: text("Endocrinologist"),
                address: String::new(),
                available_time: vec!["09:00".into(), "11:00".into()],
            })
            .unwrap();
        let store = AppointmentStore::new(cfg);

        store
            .create(booking(doctor.id.clone(), "2026-03-02", "09:00"))
            .unwrap();
        store
            .create(booking(doctor.id.clone(), "2026-03-01", "11:00"))
            .unwrap();
        store
            .create(booking(doctor.id.clone(), "2026-03-01", "09:00"))
            .unwrap();

        let slots: Vec<(String, String)> = store
            .list()
            .unwrap()
            .into_iter()
            .map(|a| (a.date, a.time))
            .collect();
        assert_eq!(
            slots,
            vec![
                ("2026-03-01".to_string(), "09:00".to_string()),
                ("2026-03-01".to_string(), "11:00".to_string()),
                ("2026-03-02".to_string(), "09:00".to_string()),
            ]
        );
    }
}
