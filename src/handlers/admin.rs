//! # Admin API Handlers
//!
//! Exposes the admin registry: the registered record types, their form
//! schemas and `{id, label}` rows for list views and pickers.

use axum::{
    extract::{Path, Query, State, rejection::QueryRejection},
    response::Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::page_from_query;
use super::types::PaginatedResponse;
use crate::admin::{EntityDescriptor, Registration};
use crate::auth::OperatorAuth;
use crate::error::{ApiError, not_found};
use crate::repositories::LabelRow;
use crate::server::AppState;

/// Registry index
#[derive(Debug, Serialize, ToSchema)]
pub struct AdminIndex {
    /// Registered record types in registration order
    pub entities: Vec<EntityDescriptor>,
}

/// Query parameters for label listings
#[derive(Debug, Deserialize, IntoParams)]
pub struct LabelsQuery {
    pub limit: Option<u64>,
    pub cursor: Option<String>,
}

fn registration<'a>(state: &'a AppState, entity: &str) -> Result<&'a Registration, ApiError> {
    state
        .admin
        .get(entity)
        .ok_or_else(|| not_found(&format!("entity '{entity}' is not registered")))
}

/// List registered record types
#[utoipa::path(
    get,
    path = "/admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Registered record types", body = AdminIndex),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError)
    ),
    tag = "admin"
)]
pub async fn index(State(state): State<AppState>, _operator_auth: OperatorAuth) -> Json<AdminIndex> {
    Json(AdminIndex {
        entities: state.admin.entities().cloned().collect(),
    })
}

/// Form schema of one record type
#[utoipa::path(
    get,
    path = "/admin/{entity}",
    security(("bearer_auth" = [])),
    params(("entity" = String, Path, description = "Registry key, e.g. `units`")),
    responses(
        (status = 200, description = "Form schema", body = EntityDescriptor),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError),
        (status = 404, description = "Entity not registered", body = ApiError)
    ),
    tag = "admin"
)]
pub async fn entity(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    Path(entity): Path<String>,
) -> Result<Json<EntityDescriptor>, ApiError> {
    let registration = registration(&state, &entity)?;
    Ok(Json(registration.descriptor.clone()))
}

/// `{id, label}` rows of one record type
#[utoipa::path(
    get,
    path = "/admin/{entity}/labels",
    security(("bearer_auth" = [])),
    params(("entity" = String, Path, description = "Registry key, e.g. `units`"), LabelsQuery),
    responses(
        (status = 200, description = "Page of labels", body = PaginatedResponse<LabelRow>),
        (status = 400, description = "Invalid limit or cursor", body = ApiError),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError),
        (status = 404, description = "Entity not registered", body = ApiError)
    ),
    tag = "admin"
)]
pub async fn labels(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    Path(entity): Path<String>,
    query: Result<Query<LabelsQuery>, QueryRejection>,
) -> Result<Json<PaginatedResponse<LabelRow>>, ApiError> {
    let Query(query) = query?;
    let page = page_from_query(&state.config, query.limit, query.cursor.as_deref())?;
    let registration = registration(&state, &entity)?;

    let rows = registration.labels.labels(&state.db, page).await?;
    Ok(Json(PaginatedResponse::from_page(rows, |row| row)))
}

/// `{id, label}` of one record, for resolving a picker's current value
#[utoipa::path(
    get,
    path = "/admin/{entity}/{id}/label",
    security(("bearer_auth" = [])),
    params(
        ("entity" = String, Path, description = "Registry key, e.g. `units`"),
        ("id" = i32, Path, description = "Record id")
    ),
    responses(
        (status = 200, description = "Record label", body = LabelRow),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError),
        (status = 404, description = "Entity not registered or no such record", body = ApiError)
    ),
    tag = "admin"
)]
pub async fn label(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    Path((entity, id)): Path<(String, i32)>,
) -> Result<Json<LabelRow>, ApiError> {
    let registration = registration(&state, &entity)?;
    let label = registration.labels.label_for(&state.db, id).await?;
    Ok(Json(LabelRow { id, label }))
}
