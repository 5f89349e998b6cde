//! Record stores for patients, doctors and appointments.
//!
//! ## Storage layout
//!
//! ```text
//! <data_dir>/
//!   patients/<s1>/<s2>/<uuid>/patient.yaml
//!   doctors/<s1>/<s2>/<uuid>/doctor.yaml
//!   appointments/<s1>/<s2>/<uuid>/appointment.yaml
//! ```
//!
//! These are pure data operations. No HTTP, authentication or analysis concerns live here.

pub mod appointments;
pub mod doctors;
pub mod patients;
pub(crate) mod shared;

pub use appointments::{Appointment, AppointmentStore, NewAppointment};
pub use doctors::{Doctor, DoctorStore, NewDoctor};
pub use patients::{NewPatient, Patient, PatientStore};
