use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use intake_core::{
    config::{data_dir_from_env_value, match_mode_from_env_value},
    AnalysisService, AppointmentStore, CoreConfig, DoctorStore, KnowledgeBase, NewAppointment,
    NewDoctor, NewPatient, NonEmptyText, PatientStore, ShardableUuid,
};

#[derive(Parser)]
#[command(name = "intake")]
#[command(about = "Clinical intake and patient risk analysis CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List all patients
    ListPatients,
    /// Admit a new patient
    AddPatient {
        /// Patient name
        name: String,
        /// Age in years
        #[arg(long)]
        age: Option<u32>,
        #[arg(long, default_value = "")]
        gender: String,
        /// Free-text presenting symptoms
        #[arg(long, default_value = "")]
        symptoms: String,
        /// Free-text medical history
        #[arg(long, default_value = "")]
        history: String,
    },
    /// List all doctors
    ListDoctors,
    /// Register a doctor
    AddDoctor {
        name: String,
        specialization: String,
        #[arg(long, default_value = "")]
        address: String,
        /// Available slot (repeatable), e.g. --slot 09:00 --slot 10:00
        #[arg(long = "slot")]
        slots: Vec<String>,
    },
    /// List all appointments
    ListAppointments,
    /// Book an appointment with an existing doctor
    AddAppointment {
        /// Patient name
        patient: String,
        /// Doctor UUID
        doctor_id: String,
        /// Date (YYYY-MM-DD)
        date: String,
        /// Time (HH:MM)
        time: String,
    },
    /// Run risk analysis over every stored patient
    Analyse {
        /// Print the results as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("intake=warn".parse()?))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let data_dir = data_dir_from_env_value(std::env::var("INTAKE_DATA_DIR").ok());
    let match_mode = match_mode_from_env_value(std::env::var("INTAKE_MATCH_MODE").ok())?;
    let cfg = Arc::new(CoreConfig::new(data_dir, match_mode)?);

    match cli.command {
        Some(Commands::ListPatients) => {
            let patients = PatientStore::new(cfg).list()?;
            if patients.is_empty() {
                println!("No patients found.");
            } else {
                for patient in patients {
                    let age = patient
                        .age
                        .map(|a| a.to_string())
                        .unwrap_or_else(|| "-".into());
                    println!(
                        "ID: {}, Name: {}, Age: {}, Created: {}",
                        patient.id, patient.name, age, patient.created_at
                    );
                }
            }
        }
        Some(Commands::AddPatient {
            name,
            age,
            gender,
            symptoms,
            history,
        }) => {
            let patient = PatientStore::new(cfg).create(NewPatient {
                name: NonEmptyText::new(&name)?,
                age,
                gender,
                symptoms,
                history,
            })?;
            println!("Admitted patient with UUID: {}", patient.id);
        }
        Some(Commands::ListDoctors) => {
            let doctors = DoctorStore::new(cfg).list()?;
            if doctors.is_empty() {
                println!("No doctors found.");
            } else {
                for doctor in doctors {
                    println!(
                        "ID: {}, Name: {}, Specialization: {}, Slots: {}",
                        doctor.id,
                        doctor.name,
                        doctor.specialization,
                        doctor.available_time.join(", ")
                    );
                }
            }
        }
        Some(Commands::AddDoctor {
            name,
            specialization,
            address,
            slots,
        }) => {
            let doctor = DoctorStore::new(cfg).create(NewDoctor {
                name: NonEmptyText::new(&name)?,
                specialization: NonEmptyText::new(&specialization)?,
                address,
                available_time: slots,
            })?;
            println!("Registered doctor with UUID: {}", doctor.id);
        }
        Some(Commands::ListAppointments) => {
            let appointments = AppointmentStore::new(cfg).list()?;
            if appointments.is_empty() {
                println!("No appointments found.");
            } else {
                for appointment in appointments {
                    println!(
                        "{} {} - {} with doctor {}",
                        appointment.date, appointment.time, appointment.patient, appointment.doctor_id
                    );
                }
            }
        }
        Some(Commands::AddAppointment {
            patient,
            doctor_id,
            date,
            time,
        }) => {
            let appointment = AppointmentStore::new(cfg).create(NewAppointment {
                patient: NonEmptyText::new(&patient)?,
                doctor_id: ShardableUuid::parse(&doctor_id)?,
                date: NonEmptyText::new(&date)?,
                time: NonEmptyText::new(&time)?,
            })?;
            println!("Booked appointment with UUID: {}", appointment.id);
        }
        Some(Commands::Analyse { json }) => {
            let service = AnalysisService::new(cfg, Arc::new(KnowledgeBase::builtin()));
            let results = service.analyse_stored()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else if results.is_empty() {
                println!("No patients found.");
            } else {
                for result in results {
                    let meds: Vec<String> = result
                        .meds
                        .iter()
                        .map(|m| format!("{} ({})", m.name, m.dosage))
                        .collect();
                    println!("{} [{}]", result.patient.name, result.level);
                    println!("  Conditions: {}", result.conditions.join(", "));
                    println!("  Medicines: {}", meds.join(", "));
                    println!("  Specialists: {}", result.docs.join(", "));
                }
            }
        }
        None => {
            println!("Use 'intake --help' for commands");
        }
    }

    Ok(())
}
