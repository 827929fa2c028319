//! # Leases API Handlers

use axum::{
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::Json,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::page_from_query;
use super::types::{Created, PaginatedResponse, created};
use crate::auth::OperatorAuth;
use crate::error::ApiError;
use crate::repositories::{LeaseFilter, LeaseInput, LeaseRecord, LeaseRepository};
use crate::server::AppState;

/// Lease as returned by the API
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LeaseResponse {
    pub id: i32,
    /// Human-readable identifier
    #[schema(example = "Lease for J. Rivera - 4B")]
    pub label: String,
    pub tenant_id: i32,
    pub tenant_label: String,
    pub unit_id: i32,
    pub unit_label: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Rent fixed at signing, always with two decimal places
    #[schema(value_type = String, example = "1450.00")]
    pub rent_amount: Decimal,
}

impl From<LeaseRecord> for LeaseResponse {
    fn from(record: LeaseRecord) -> Self {
        let label = record.label();
        let unit_label = record.unit.label();
        let LeaseRecord { lease, tenant, .. } = record;
        Self {
            id: lease.id,
            label,
            tenant_id: lease.tenant_id,
            tenant_label: tenant.label(),
            unit_id: lease.unit_id,
            unit_label,
            start_date: lease.start_date,
            end_date: lease.end_date,
            rent_amount: lease.rent_amount,
        }
    }
}

/// Query parameters for listing leases
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListLeasesQuery {
    /// Only leases of this tenant
    pub tenant_id: Option<i32>,
    /// Only leases on this unit
    pub unit_id: Option<i32>,
    /// Page size (1..=max page size)
    pub limit: Option<u64>,
    /// Opaque cursor from a previous page
    pub cursor: Option<String>,
}

fn location(id: i32) -> String {
    format!("/api/v1/leases/{id}")
}

/// List leases
#[utoipa::path(
    get,
    path = "/api/v1/leases",
    security(("bearer_auth" = [])),
    params(ListLeasesQuery),
    responses(
        (status = 200, description = "Page of leases", body = PaginatedResponse<LeaseResponse>),
        (status = 400, description = "Invalid filter, limit or cursor", body = ApiError),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError)
    ),
    tag = "leases"
)]
pub async fn list_leases(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    query: Result<Query<ListLeasesQuery>, QueryRejection>,
) -> Result<Json<PaginatedResponse<LeaseResponse>>, ApiError> {
    let Query(query) = query?;
    let page = page_from_query(&state.config, query.limit, query.cursor.as_deref())?;
    let filter = LeaseFilter {
        tenant_id: query.tenant_id,
        unit_id: query.unit_id,
    };

    let leases = LeaseRepository::new(&state.db).list(&filter, page).await?;
    Ok(Json(PaginatedResponse::from_page(leases, LeaseResponse::from)))
}

/// Create a lease
///
/// A `tenant_id` or `unit_id` that does not exist is reported as a
/// validation error on that field.
#[utoipa::path(
    post,
    path = "/api/v1/leases",
    security(("bearer_auth" = [])),
    request_body = LeaseInput,
    responses(
        (status = 201, description = "Lease created", body = LeaseResponse, headers(
            ("Location", description = "URL of the created lease")
        )),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError)
    ),
    tag = "leases"
)]
pub async fn create_lease(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    payload: Result<Json<LeaseInput>, JsonRejection>,
) -> Result<Created<LeaseResponse>, ApiError> {
    let Json(input) = payload?;
    let record = LeaseRepository::new(&state.db).create(input).await?;
    Ok(created(location(record.lease.id), record.into()))
}

/// Fetch one lease
#[utoipa::path(
    get,
    path = "/api/v1/leases/{id}",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Lease id")),
    responses(
        (status = 200, description = "Lease", body = LeaseResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError),
        (status = 404, description = "No such lease", body = ApiError)
    ),
    tag = "leases"
)]
pub async fn get_lease(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    Path(id): Path<i32>,
) -> Result<Json<LeaseResponse>, ApiError> {
    let record = LeaseRepository::new(&state.db).get(id).await?;
    Ok(Json(record.into()))
}

/// Replace a lease
#[utoipa::path(
    put,
    path = "/api/v1/leases/{id}",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Lease id")),
    request_body = LeaseInput,
    responses(
        (status = 200, description = "Lease updated", body = LeaseResponse),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError),
        (status = 404, description = "No such lease", body = ApiError)
    ),
    tag = "leases"
)]
pub async fn update_lease(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    Path(id): Path<i32>,
    payload: Result<Json<LeaseInput>, JsonRejection>,
) -> Result<Json<LeaseResponse>, ApiError> {
    let Json(input) = payload?;
    let record = LeaseRepository::new(&state.db).update(id, input).await?;
    Ok(Json(record.into()))
}

/// Delete a lease
#[utoipa::path(
    delete,
    path = "/api/v1/leases/{id}",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Lease id")),
    responses(
        (status = 204, description = "Lease deleted"),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError),
        (status = 404, description = "No such lease", body = ApiError)
    ),
    tag = "leases"
)]
pub async fn delete_lease(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    LeaseRepository::new(&state.db).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
