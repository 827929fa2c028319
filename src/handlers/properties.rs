//! # Properties API Handlers
//!
//! CRUD endpoints for properties, plus the unit listing of one property.

use axum::{
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::page_from_query;
use super::types::{Created, PaginatedResponse, created};
use super::units::UnitResponse;
use crate::auth::OperatorAuth;
use crate::error::{ApiError, not_found};
use crate::models::PropertyType;
use crate::models::property::Model as PropertyModel;
use crate::repositories::{
    PropertyFilter, PropertyInput, PropertyRepository, UnitFilter, UnitRepository,
};
use crate::server::AppState;

/// Property as returned by the API
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PropertyResponse {
    pub id: i32,
    /// Human-readable identifier
    #[schema(example = "Maple Court")]
    pub label: String,
    pub name: String,
    pub address: String,
    pub property_type: PropertyType,
    pub description: String,
    pub number_of_units: i32,
}

impl From<PropertyModel> for PropertyResponse {
    fn from(property: PropertyModel) -> Self {
        Self {
            id: property.id,
            label: property.label(),
            name: property.name,
            address: property.address,
            property_type: property.property_type,
            description: property.description,
            number_of_units: property.number_of_units,
        }
    }
}

/// Query parameters for listing properties
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListPropertiesQuery {
    /// Only properties of this type
    pub property_type: Option<PropertyType>,
    /// Page size (1..=max page size)
    pub limit: Option<u64>,
    /// Opaque cursor from a previous page
    pub cursor: Option<String>,
}

/// Query parameters for listing the units of a property
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListPropertyUnitsQuery {
    pub is_available: Option<bool>,
    pub limit: Option<u64>,
    pub cursor: Option<String>,
}

fn location(id: i32) -> String {
    format!("/api/v1/properties/{id}")
}

/// List properties
#[utoipa::path(
    get,
    path = "/api/v1/properties",
    security(("bearer_auth" = [])),
    params(ListPropertiesQuery),
    responses(
        (status = 200, description = "Page of properties", body = PaginatedResponse<PropertyResponse>),
        (status = 400, description = "Invalid filter, limit or cursor", body = ApiError),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError)
    ),
    tag = "properties"
)]
pub async fn list_properties(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    query: Result<Query<ListPropertiesQuery>, QueryRejection>,
) -> Result<Json<PaginatedResponse<PropertyResponse>>, ApiError> {
    let Query(query) = query?;
    let page = page_from_query(&state.config, query.limit, query.cursor.as_deref())?;
    let filter = PropertyFilter {
        property_type: query.property_type,
    };

    let properties = PropertyRepository::new(&state.db)
        .list(&filter, page)
        .await?;
    Ok(Json(PaginatedResponse::from_page(
        properties,
        PropertyResponse::from,
    )))
}

/// Create a property
#[utoipa::path(
    post,
    path = "/api/v1/properties",
    security(("bearer_auth" = [])),
    request_body = PropertyInput,
    responses(
        (status = 201, description = "Property created", body = PropertyResponse, headers(
            ("Location", description = "URL of the created property")
        )),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError)
    ),
    tag = "properties"
)]
pub async fn create_property(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    payload: Result<Json<PropertyInput>, JsonRejection>,
) -> Result<Created<PropertyResponse>, ApiError> {
    let Json(input) = payload?;
    let property = PropertyRepository::new(&state.db).create(input).await?;
    Ok(created(location(property.id), property.into()))
}

/// Fetch one property
#[utoipa::path(
    get,
    path = "/api/v1/properties/{id}",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Property id")),
    responses(
        (status = 200, description = "Property", body = PropertyResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError),
        (status = 404, description = "No such property", body = ApiError)
    ),
    tag = "properties"
)]
pub async fn get_property(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    Path(id): Path<i32>,
) -> Result<Json<PropertyResponse>, ApiError> {
    let property = PropertyRepository::new(&state.db).get(id).await?;
    Ok(Json(property.into()))
}

/// Replace a property
#[utoipa::path(
    put,
    path = "/api/v1/properties/{id}",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Property id")),
    request_body = PropertyInput,
    responses(
        (status = 200, description = "Property updated", body = PropertyResponse),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError),
        (status = 404, description = "No such property", body = ApiError)
    ),
    tag = "properties"
)]
pub async fn update_property(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    Path(id): Path<i32>,
    payload: Result<Json<PropertyInput>, JsonRejection>,
) -> Result<Json<PropertyResponse>, ApiError> {
    let Json(input) = payload?;
    let property = PropertyRepository::new(&state.db).update(id, input).await?;
    Ok(Json(property.into()))
}

/// Delete a property with its units and their leases
#[utoipa::path(
    delete,
    path = "/api/v1/properties/{id}",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Property id")),
    responses(
        (status = 204, description = "Property, its units and their leases deleted"),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError),
        (status = 404, description = "No such property", body = ApiError)
    ),
    tag = "properties"
)]
pub async fn delete_property(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    PropertyRepository::new(&state.db).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List the units of one property
#[utoipa::path(
    get,
    path = "/api/v1/properties/{id}/units",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Property id"), ListPropertyUnitsQuery),
    responses(
        (status = 200, description = "Page of units", body = PaginatedResponse<UnitResponse>),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError),
        (status = 404, description = "No such property", body = ApiError)
    ),
    tag = "properties"
)]
pub async fn list_property_units(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    Path(id): Path<i32>,
    query: Result<Query<ListPropertyUnitsQuery>, QueryRejection>,
) -> Result<Json<PaginatedResponse<UnitResponse>>, ApiError> {
    let Query(query) = query?;
    let page = page_from_query(&state.config, query.limit, query.cursor.as_deref())?;

    if PropertyRepository::new(&state.db).find(id).await?.is_none() {
        return Err(not_found(&format!("property {id} not found")));
    }

    let filter = UnitFilter {
        property_id: Some(id),
        is_available: query.is_available,
    };
    let units = UnitRepository::new(&state.db).list(&filter, page).await?;
    Ok(Json(PaginatedResponse::from_page(units, UnitResponse::from)))
}
