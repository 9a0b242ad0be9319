//! Probe endpoints for the design service.
//!
//! Liveness only says the process answers. Readiness says whether a prompt
//! sent now could reach the generation model.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::AppState;

/// Readiness report.
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    /// `"healthy"` when every check passes, else `"unhealthy"`.
    pub status: &'static str,
    /// Crate version of the running binary.
    pub version: &'static str,
    /// Per-dependency results.
    pub checks: HealthChecks,
}

/// Per-dependency readiness.
#[derive(Debug, Serialize)]
pub struct HealthChecks {
    /// The model client has credentials.
    pub generator: bool,
}

impl HealthStatus {
    fn from_generator(ready: bool) -> Self {
        Self {
            status: if ready { "healthy" } else { "unhealthy" },
            version: env!("CARGO_PKG_VERSION"),
            checks: HealthChecks { generator: ready },
        }
    }
}

/// `GET /health/live`.
#[tracing::instrument(name = "liveness_probe")]
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// `GET /health/ready`. 503 while no API key is configured.
#[tracing::instrument(name = "readiness_probe", skip(state))]
pub async fn readiness(State(state): State<AppState>) -> (StatusCode, Json<HealthStatus>) {
    let ready = state.generator.is_ready();
    if !ready {
        tracing::warn!("Generation model is not configured");
    }

    let code = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(HealthStatus::from_generator(ready)))
}
