//! # API REST
//!
//! REST API implementation for the intake service.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS, API-key gating)
//!
//! Uses `intake-core` for all record and analysis operations.

#![warn(rust_2018_idioms)]

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use api_shared::{auth, dto, HealthService};
use intake_core::{
    AnalysisService, AppointmentStore, CoreConfig, DoctorStore, IntakeError, KnowledgeBase,
    NewAppointment, NewDoctor, NewPatient, NonEmptyText, PatientStore, ShardableUuid,
};

type ApiError = (StatusCode, &'static str);

/// Application state shared across REST API handlers.
#[derive(Clone)]
pub struct AppState {
    cfg: Arc<CoreConfig>,
    analysis: Arc<AnalysisService>,
    api_key: Option<Arc<str>>,
}

impl AppState {
    /// Builds handler state from startup configuration.
    ///
    /// `api_key`, when set, is required on every `/api` request in the `x-api-key` header.
    pub fn new(
        cfg: Arc<CoreConfig>,
        knowledge: Arc<KnowledgeBase>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            analysis: Arc::new(AnalysisService::new(cfg.clone(), knowledge)),
            cfg,
            api_key: api_key.map(Arc::from),
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        list_patients,
        create_patient,
        list_doctors,
        create_doctor,
        list_appointments,
        create_appointment,
        analyse_patients,
    ),
    components(schemas(
        dto::HealthRes,
        dto::Patient,
        dto::CreatePatientReq,
        dto::Doctor,
        dto::CreateDoctorReq,
        dto::Appointment,
        dto::CreateAppointmentReq,
        dto::Medicine,
        dto::RiskLevel,
        dto::AnalysisRes,
    ))
)]
pub struct ApiDoc;

/// Builds the complete REST router.
///
/// `/health` and the Swagger UI are always open; `/api/*` routes pass through the API-key
/// check.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/api/patients", get(list_patients).post(create_patient))
        .route("/api/doctors", get(list_doctors).post(create_doctor))
        .route(
            "/api/appointments",
            get(list_appointments).post(create_appointment),
        )
        .route("/api/analysis", post(analyse_patients))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_api_key,
        ));

    Router::new()
        .route("/health", get(health))
        .merge(api)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn require_api_key(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let provided = req
        .headers()
        .get(auth::API_KEY_HEADER)
        .and_then(|v| v.to_str().ok());

    match auth::validate_api_key(state.api_key.as_deref(), provided) {
        Ok(()) => Ok(next.run(req).await),
        Err(e) => {
            tracing::warn!("rejected request to {}: {}", req.uri().path(), e);
            Err((StatusCode::UNAUTHORIZED, "Unauthorized"))
        }
    }
}

fn store_error(context: &str, e: IntakeError) -> ApiError {
    tracing::error!("{} error: {:?}", context, e);
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = dto::HealthRes)
    )
)]
/// Health check endpoint used by monitoring and load balancers.
async fn health() -> Json<dto::HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    get,
    path = "/api/patients",
    responses(
        (status = 200, description = "List of patients", body = [dto::Patient]),
        (status = 500, description = "Internal server error")
    )
)]
/// List all stored patients.
async fn list_patients(State(state): State<AppState>) -> Result<Json<Vec<dto::Patient>>, ApiError> {
    let patients = PatientStore::new(state.cfg.clone())
        .list()
        .map_err(|e| store_error("List patients", e))?;
    Ok(Json(patients.iter().map(dto::Patient::from).collect()))
}

#[utoipa::path(
    post,
    path = "/api/patients",
    request_body = dto::CreatePatientReq,
    responses(
        (status = 201, description = "Patient created", body = dto::Patient),
        (status = 400, description = "Bad request"),
        (status = 500, description = "Internal server error")
    )
)]
/// Create a new patient record.
///
/// # Errors
/// Returns `400 Bad Request` if `name` is blank, `500` if the record cannot be stored.
async fn create_patient(
    State(state): State<AppState>,
    Json(req): Json<dto::CreatePatientReq>,
) -> Result<impl IntoResponse, ApiError> {
    let name = NonEmptyText::new(&req.name)
        .map_err(|_| (StatusCode::BAD_REQUEST, "Patient name is required"))?;

    let patient = PatientStore::new(state.cfg.clone())
        .create(NewPatient {
            name,
            age: req.age,
            gender: req.gender.unwrap_or_default(),
            symptoms: req.symptoms.unwrap_or_default(),
            history: req.history.unwrap_or_default(),
        })
        .map_err(|e| store_error("Create patient", e))?;

    Ok((StatusCode::CREATED, Json(dto::Patient::from(&patient))))
}

#[utoipa::path(
    get,
    path = "/api/doctors",
    responses(
        (status = 200, description = "List of doctors", body = [dto::Doctor]),
        (status = 500, description = "Internal server error")
    )
)]
async fn list_doctors(State(state): State<AppState>) -> Result<Json<Vec<dto::Doctor>>, ApiError> {
    let doctors = DoctorStore::new(state.cfg.clone())
        .list()
        .map_err(|e| store_error("List doctors", e))?;
    Ok(Json(doctors.iter().map(dto::Doctor::from).collect()))
}

#[utoipa::path(
    post,
    path = "/api/doctors",
    request_body = dto::CreateDoctorReq,
    responses(
        (status = 201, description = "Doctor created", body = dto::Doctor),
        (status = 400, description = "Bad request"),
        (status = 500, description = "Internal server error")
    )
)]
async fn create_doctor(
    State(state): State<AppState>,
    Json(req): Json<dto::CreateDoctorReq>,
) -> Result<impl IntoResponse, ApiError> {
    let name = NonEmptyText::new(&req.name)
        .map_err(|_| (StatusCode::BAD_REQUEST, "Doctor name is required"))?;
    let specialization = NonEmptyText::new(&req.specialization)
        .map_err(|_| (StatusCode::BAD_REQUEST, "Specialization is required"))?;

    let doctor = DoctorStore::new(state.cfg.clone())
        .create(NewDoctor {
            name,
            specialization,
            address: req.address,
            available_time: req.available_time,
        })
        .map_err(|e| store_error("Create doctor", e))?;

    Ok((StatusCode::CREATED, Json(dto::Doctor::from(&doctor))))
}

#[utoipa::path(
    get,
    path = "/api/appointments",
    responses(
        (status = 200, description = "List of appointments", body = [dto::Appointment]),
        (status = 500, description = "Internal server error")
    )
)]
async fn list_appointments(
    State(state): State<AppState>,
) -> Result<Json<Vec<dto::Appointment>>, ApiError> {
    let appointments = AppointmentStore::new(state.cfg.clone())
        .list()
        .map_err(|e| store_error("List appointments", e))?;
    Ok(Json(appointments.iter().map(dto::Appointment::from).collect()))
}

#[utoipa::path(
    post,
    path = "/api/appointments",
    request_body = dto::CreateAppointmentReq,
    responses(
        (status = 201, description = "Appointment booked", body = dto::Appointment),
        (status = 400, description = "Bad request"),
        (status = 500, description = "Internal server error")
    )
)]
/// Book an appointment with an existing doctor.
///
/// # Errors
/// Returns `400 Bad Request` if a field is blank, `doctorId` is not a canonical id, or no such
/// doctor exists.
async fn create_appointment(
    State(state): State<AppState>,
    Json(req): Json<dto::CreateAppointmentReq>,
) -> Result<impl IntoResponse, ApiError> {
    let doctor_id = ShardableUuid::parse(&req.doctor_id).map_err(|e| {
        tracing::error!("Invalid doctor UUID: {:?}", e);
        (StatusCode::BAD_REQUEST, "Invalid doctor UUID")
    })?;
    let (Ok(patient), Ok(date), Ok(time)) = (
        NonEmptyText::new(&req.patient),
        NonEmptyText::new(&req.date),
        NonEmptyText::new(&req.time),
    ) else {
        return Err((StatusCode::BAD_REQUEST, "patient, date and time are required"));
    };

    match AppointmentStore::new(state.cfg.clone()).create(NewAppointment {
        patient,
        doctor_id,
        date,
        time,
    }) {
        Ok(appointment) => Ok((
            StatusCode::CREATED,
            Json(dto::Appointment::from(&appointment)),
        )),
        Err(IntakeError::DoctorNotFound(id)) => {
            tracing::warn!("Appointment for unknown doctor {}", id);
            Err((StatusCode::BAD_REQUEST, "Doctor not found"))
        }
        Err(e) => Err(store_error("Create appointment", e)),
    }
}

#[utoipa::path(
    post,
    path = "/api/analysis",
    responses(
        (status = 200, description = "Risk analysis for every stored patient", body = [dto::AnalysisRes]),
        (status = 500, description = "Patient store unavailable")
    )
)]
/// Analyse every stored patient.
///
/// Runs on the blocking pool; the batch itself fans out across patients.
async fn analyse_patients(
    State(state): State<AppState>,
) -> Result<Json<Vec<dto::AnalysisRes>>, ApiError> {
    let analysis = state.analysis.clone();
    let results = tokio::task::spawn_blocking(move || analysis.analyse_stored())
        .await
        .map_err(|e| {
            tracing::error!("Analysis task failed: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
        })?
        .map_err(|e| store_error("Analyse patients", e))?;
    Ok(Json(results))
}
