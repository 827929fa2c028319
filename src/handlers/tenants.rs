//! # Tenants API Handlers
//!
//! CRUD endpoints for tenants. Deleting a tenant deletes the tenant's leases.

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
use crate::auth::OperatorAuth;
use crate::error::ApiError;
use crate::models::tenant::Model as TenantModel;
use crate::repositories::{TenantInput, TenantRepository};
use crate::server::AppState;

/// Tenant as returned by the API
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TenantResponse {
    pub id: i32,
    /// Human-readable identifier
    #[schema(example = "J. Rivera")]
    pub label: String,
    pub name: String,
    #[schema(example = "j.rivera@example.com")]
    pub email: String,
    pub phone_number: String,
}

impl From<TenantModel> for TenantResponse {
    fn from(tenant: TenantModel) -> Self {
        Self {
            id: tenant.id,
            label: tenant.label(),
            name: tenant.name,
            email: tenant.email,
            phone_number: tenant.phone_number,
        }
    }
}

/// Query parameters for listing tenants
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListTenantsQuery {
    /// Page size (1..=max page size)
    pub limit: Option<u64>,
    /// Opaque cursor from a previous page
    pub cursor: Option<String>,
}

fn location(id: i32) -> String {
    format!("/api/v1/tenants/{id}")
}

/// List tenants
#[utoipa::path(
    get,
    path = "/api/v1/tenants",
    security(("bearer_auth" = [])),
    params(ListTenantsQuery),
    responses(
        (status = 200, description = "Page of tenants", body = PaginatedResponse<TenantResponse>),
        (status = 400, description = "Invalid limit or cursor", body = ApiError),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError)
    ),
    tag = "tenants"
)]
pub async fn list_tenants(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    query: Result<Query<ListTenantsQuery>, QueryRejection>,
) -> Result<Json<PaginatedResponse<TenantResponse>>, ApiError> {
    let Query(query) = query?;
    let page = page_from_query(&state.config, query.limit, query.cursor.as_deref())?;

    let tenants = TenantRepository::new(&state.db).list(page).await?;
    Ok(Json(PaginatedResponse::from_page(tenants, TenantResponse::from)))
}

/// Create a new tenant
#[utoipa::path(
    post,
    path = "/api/v1/tenants",
    security(("bearer_auth" = [])),
    request_body = TenantInput,
    responses(
        (status = 201, description = "Tenant created successfully", body = TenantResponse, headers(
            ("Location", description = "URL of the created tenant"),
            ("X-Trace-Id", description = "Trace identifier for request correlation")
        )),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError)
    ),
    tag = "tenants"
)]
pub async fn create_tenant(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    payload: Result<Json<TenantInput>, JsonRejection>,
) -> Result<Created<TenantResponse>, ApiError> {
    let Json(input) = payload?;
    let tenant = TenantRepository::new(&state.db).create(input).await?;
    Ok(created(location(tenant.id), tenant.into()))
}

/// Fetch one tenant
#[utoipa::path(
    get,
    path = "/api/v1/tenants/{id}",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Tenant id")),
    responses(
        (status = 200, description = "Tenant", body = TenantResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError),
        (status = 404, description = "No such tenant", body = ApiError)
    ),
    tag = "tenants"
)]
pub async fn get_tenant(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    Path(id): Path<i32>,
) -> Result<Json<TenantResponse>, ApiError> {
    let tenant = TenantRepository::new(&state.db).get(id).await?;
    Ok(Json(tenant.into()))
}

/// Replace a tenant
#[utoipa::path(
    put,
    path = "/api/v1/tenants/{id}",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Tenant id")),
    request_body = TenantInput,
    responses(
        (status = 200, description = "Tenant updated", body = TenantResponse),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError),
        (status = 404, description = "No such tenant", body = ApiError)
    ),
    tag = "tenants"
)]
pub async fn update_tenant(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    Path(id): Path<i32>,
    payload: Result<Json<TenantInput>, JsonRejection>,
) -> Result<Json<TenantResponse>, ApiError> {
    let Json(input) = payload?;
    let tenant = TenantRepository::new(&state.db).update(id, input).await?;
    Ok(Json(tenant.into()))
}

/// Delete a tenant and the tenant's leases
#[utoipa::path(
    delete,
    path = "/api/v1/tenants/{id}",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Tenant id")),
    responses(
        (status = 204, description = "Tenant and leases deleted"),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError),
        (status = 404, description = "No such tenant", body = ApiError)
    ),
    tag = "tenants"
)]
pub async fn delete_tenant(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    TenantRepository::new(&state.db).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
