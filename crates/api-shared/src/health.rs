use crate::dto::HealthRes;

/// Health check shared by every API surface.
pub struct HealthService;

impl HealthService {
    /// Checks service health.
    ///
    /// # Returns
    /// A `HealthRes` indicating the service is healthy.
    pub fn check_health() -> HealthRes {
        HealthRes {
            ok: true,
            message: "Intake is alive".into(),
        }
    }
}
