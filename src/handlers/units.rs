//! # Units API Handlers
//!
//! CRUD endpoints for units. Every unit response carries its label and the
//! label of the owning property.

use axum::{
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::page_from_query;
use super::types::{Created, PaginatedResponse, created};
use crate::auth::OperatorAuth;
use crate::error::ApiError;
use crate::repositories::{UnitFilter, UnitInput, UnitRecord, UnitRepository};
use crate::server::AppState;

/// Unit as returned by the API
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UnitResponse {
    pub id: i32,
    /// Human-readable identifier
    #[schema(example = "Unit 4B - Maple Court")]
    pub label: String,
    pub property_id: i32,
    /// Label of the owning property
    pub property_label: String,
    pub unit_number: String,
    pub bedrooms: i32,
    pub bathrooms: i32,
    /// Monthly rent, always with two decimal places
    #[schema(value_type = String, example = "1500.00")]
    pub rent: Decimal,
    pub is_available: bool,
}

impl From<UnitRecord> for UnitResponse {
    fn from(record: UnitRecord) -> Self {
        let label = record.label();
        let UnitRecord { unit, property } = record;
        Self {
            id: unit.id,
            label,
            property_id: unit.property_id,
            property_label: property.label(),
            unit_number: unit.unit_number,
            bedrooms: unit.bedrooms,
            bathrooms: unit.bathrooms,
            rent: unit.rent,
            is_available: unit.is_available,
        }
    }
}

/// Query parameters for listing units
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListUnitsQuery {
    /// Only units of this property
    pub property_id: Option<i32>,
    /// Only units with this availability
    pub is_available: Option<bool>,
    /// Page size (1..=max page size)
    pub limit: Option<u64>,
    /// Opaque cursor from a previous page
    pub cursor: Option<String>,
}

fn location(id: i32) -> String {
    format!("/api/v1/units/{id}")
}

/// List units
#[utoipa::path(
    get,
    path = "/api/v1/units",
    security(("bearer_auth" = [])),
    params(ListUnitsQuery),
    responses(
        (status = 200, description = "Page of units", body = PaginatedResponse<UnitResponse>),
        (status = 400, description = "Invalid filter, limit or cursor", body = ApiError),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError)
    ),
    tag = "units"
)]
pub async fn list_units(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    query: Result<Query<ListUnitsQuery>, QueryRejection>,
) -> Result<Json<PaginatedResponse<UnitResponse>>, ApiError> {
    let Query(query) = query?;
    let page = page_from_query(&state.config, query.limit, query.cursor.as_deref())?;
    let filter = UnitFilter {
        property_id: query.property_id,
        is_available: query.is_available,
    };

    let units = UnitRepository::new(&state.db).list(&filter, page).await?;
    Ok(Json(PaginatedResponse::from_page(units, UnitResponse::from)))
}

/// Create a unit
///
/// `is_available` defaults to `true`. A `property_id` that does not exist is
/// reported as a validation error on that field.
#[utoipa::path(
    post,
    path = "/api/v1/units",
    security(("bearer_auth" = [])),
    request_body = UnitInput,
    responses(
        (status = 201, description = "Unit created", body = UnitResponse, headers(
            ("Location", description = "URL of the created unit")
        )),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError)
    ),
    tag = "units"
)]
pub async fn create_unit(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    payload: Result<Json<UnitInput>, JsonRejection>,
) -> Result<Created<UnitResponse>, ApiError> {
    let Json(input) = payload?;
    let record = UnitRepository::new(&state.db).create(input).await?;
    Ok(created(location(record.unit.id), record.into()))
}

/// Fetch one unit
#[utoipa::path(
    get,
    path = "/api/v1/units/{id}",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Unit id")),
    responses(
        (status = 200, description = "Unit", body = UnitResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError),
        (status = 404, description = "No such unit", body = ApiError)
    ),
    tag = "units"
)]
pub async fn get_unit(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    Path(id): Path<i32>,
) -> Result<Json<UnitResponse>, ApiError> {
    let record = UnitRepository::new(&state.db).get(id).await?;
    Ok(Json(record.into()))
}

/// Replace a unit
#[utoipa::path(
    put,
    path = "/api/v1/units/{id}",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Unit id")),
    request_body = UnitInput,
    responses(
        (status = 200, description = "Unit updated", body = UnitResponse),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError),
        (status = 404, description = "No such unit", body = ApiError)
    ),
    tag = "units"
)]
pub async fn update_unit(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    Path(id): Path<i32>,
    payload: Result<Json<UnitInput>, JsonRejection>,
) -> Result<Json<UnitResponse>, ApiError> {
    let Json(input) = payload?;
    let record = UnitRepository::new(&state.db).update(id, input).await?;
    Ok(Json(record.into()))
}

/// Delete a unit and its leases
#[utoipa::path(
    delete,
    path = "/api/v1/units/{id}",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Unit id")),
    responses(
        (status = 204, description = "Unit and its leases deleted"),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError),
        (status = 404, description = "No such unit", body = ApiError)
    ),
    tag = "units"
)]
pub async fn delete_unit(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    UnitRepository::new(&state.db).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
