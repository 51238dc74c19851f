//! Health check endpoint.
//!
//! Reports liveness plus the storage backend in use. The backend check runs a
//! cheap repository query so a broken database connection shows up here.

use axum::extract::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::HEALTH_TAG;
use crate::config::StorageBackend;
use crate::state::AppState;
use crate::usecases::{ErrorType, SuccessType, UseCaseResponse};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    pub storage: StorageBackend,
    pub timestamp: DateTime<Utc>,
}

pub fn health_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(health_check))
}

#[utoipa::path(
    get,
    path = "/health",
    tag = HEALTH_TAG,
    responses(
        (status = 200, description = "Service is healthy", body = UseCaseResponse<HealthResponse>),
        (status = 500, description = "Storage backend unreachable")
    )
)]
async fn health_check(State(state): State<AppState>) -> UseCaseResponse<HealthResponse> {
    let mut report = HealthResponse {
        status: HealthStatus::Healthy,
        version: crate::pkg_version().to_string(),
        storage: state.backend,
        timestamp: Utc::now(),
    };

    match state.repositories.users.find_page(0, 1).await {
        Ok(_) => UseCaseResponse::success(report, "Service is healthy", SuccessType::Ok),
        Err(e) => {
            tracing::error!(error = %e, backend = %state.backend, "Health check failed");
            report.status = HealthStatus::Unhealthy;
            UseCaseResponse {
                data: Some(report),
                ..UseCaseResponse::failure("Storage backend unreachable", ErrorType::Internal)
            }
        }
    }
}
