//! # API Handlers
//!
//! HTTP endpoint handlers for the rentals API.

pub mod admin;
pub mod leases;
pub mod properties;
pub mod tenants;
pub mod types;
pub mod units;

use axum::{extract::State, http::StatusCode, response::Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::config::AppConfig;
use crate::cursor::decode_cursor;
use crate::db;
use crate::error::ApiError;
use crate::models::ServiceInfo;
use crate::repositories::Page;
use crate::server::AppState;

/// Root handler that returns basic service information
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service information", body = ServiceInfo)
    ),
    tag = "root"
)]
pub async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo::default())
}

/// Health probe payload
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthStatus {
    #[schema(example = "ok")]
    pub status: String,
}

/// Liveness probe
#[utoipa::path(
    get,
    path = "/healthz",
    responses(
        (status = 200, description = "Process is up", body = HealthStatus)
    ),
    tag = "health"
)]
pub async fn healthz() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
    })
}

/// Readiness probe; checks the database
#[utoipa::path(
    get,
    path = "/readyz",
    responses(
        (status = 200, description = "Database reachable", body = HealthStatus),
        (status = 503, description = "Database unreachable", body = ApiError)
    ),
    tag = "health"
)]
pub async fn readyz(State(state): State<AppState>) -> Result<Json<HealthStatus>, ApiError> {
    db::health_check(&state.db).await.map_err(|err| {
        tracing::warn!(error = %err, "Readiness check failed");
        ApiError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "SERVICE_UNAVAILABLE",
            "Database service unavailable",
        )
    })?;

    Ok(Json(HealthStatus {
        status: "ready".to_string(),
    }))
}

/// Builds a page request from `limit`/`cursor` query parameters
pub(crate) fn page_from_query(
    config: &AppConfig,
    limit: Option<u64>,
    cursor: Option<&str>,
) -> Result<Page, ApiError> {
    let limit = limit.unwrap_or(config.default_page_size);
    if limit < 1 || limit > config.max_page_size {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            "VALIDATION_FAILED",
            &format!("limit must be between 1 and {}", config.max_page_size),
        ));
    }

    let after_id = cursor
        .map(decode_cursor)
        .transpose()?
        .map(|cursor| cursor.after_id);

    Ok(Page { after_id, limit })
}
