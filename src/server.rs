//! # Server Configuration
//!
//! Router assembly, shared state and the serve loop for the rentals API.

use std::sync::Arc;

use axum::{Router, middleware, routing::get};
use sea_orm::DatabaseConnection;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::admin::AdminSite;
use crate::auth::auth_middleware;
use crate::config::AppConfig;
use crate::handlers::{self, admin, leases, properties, tenants, units};
use crate::telemetry::trace_context_middleware;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: DatabaseConnection,
    pub admin: Arc<AdminSite>,
}

/// Creates and configures the Axum application router
pub fn create_app(state: AppState) -> Router {
    let protected = Router::new()
        .route(
            "/api/v1/properties",
            get(properties::list_properties).post(properties::create_property),
        )
        .route(
            "/api/v1/properties/{id}",
            get(properties::get_property)
                .put(properties::update_property)
                .delete(properties::delete_property),
        )
        .route(
            "/api/v1/properties/{id}/units",
            get(properties::list_property_units),
        )
        .route("/api/v1/units", get(units::list_units).post(units::create_unit))
        .route(
            "/api/v1/units/{id}",
            get(units::get_unit)
                .put(units::update_unit)
                .delete(units::delete_unit),
        )
        .route(
            "/api/v1/tenants",
            get(tenants::list_tenants).post(tenants::create_tenant),
        )
        .route(
            "/api/v1/tenants/{id}",
            get(tenants::get_tenant)
                .put(tenants::update_tenant)
                .delete(tenants::delete_tenant),
        )
        .route(
            "/api/v1/leases",
            get(leases::list_leases).post(leases::create_lease),
        )
        .route(
            "/api/v1/leases/{id}",
            get(leases::get_lease)
                .put(leases::update_lease)
                .delete(leases::delete_lease),
        )
        .route("/admin", get(admin::index))
        .route("/admin/{entity}", get(admin::entity))
        .route("/admin/{entity}/labels", get(admin::labels))
        .route("/admin/{entity}/{id}/label", get(admin::label))
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state.config),
            auth_middleware,
        ));

    Router::new()
        .route("/", get(handlers::root))
        .route("/healthz", get(handlers::healthz))
        .route("/readyz", get(handlers::readyz))
        .merge(protected)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .layer(middleware::from_fn(trace_context_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Starts the server and serves until Ctrl+C
pub async fn run_server(
    config: AppConfig,
    db: DatabaseConnection,
    admin: AdminSite,
) -> anyhow::Result<()> {
    let addr = config
        .bind_addr()
        .map_err(|e| anyhow::anyhow!("Invalid server address: {}", e))?;

    let profile = config.profile.clone();
    let state = AppState {
        config: Arc::new(config),
        db,
        admin: Arc::new(admin),
    };
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, %profile, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
    }
}

struct BearerAuthAddon;

impl Modify for BearerAuthAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
        );
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::root,
        crate::handlers::healthz,
        crate::handlers::readyz,
        crate::handlers::properties::list_properties,
        crate::handlers::properties::create_property,
        crate::handlers::properties::get_property,
        crate::handlers::properties::update_property,
        crate::handlers::properties::delete_property,
        crate::handlers::properties::list_property_units,
        crate::handlers::units::list_units,
        crate::handlers::units::create_unit,
        crate::handlers::units::get_unit,
        crate::handlers::units::update_unit,
        crate::handlers::units::delete_unit,
        crate::handlers::tenants::list_tenants,
        crate::handlers::tenants::create_tenant,
        crate::handlers::tenants::get_tenant,
        crate::handlers::tenants::update_tenant,
        crate::handlers::tenants::delete_tenant,
        crate::handlers::leases::list_leases,
        crate::handlers::leases::create_lease,
        crate::handlers::leases::get_lease,
        crate::handlers::leases::update_lease,
        crate::handlers::leases::delete_lease,
        crate::handlers::admin::index,
        crate::handlers::admin::entity,
        crate::handlers::admin::labels,
        crate::handlers::admin::label,
    ),
    components(
        schemas(
            crate::models::ServiceInfo,
            crate::models::PropertyType,
            crate::error::ApiError,
            crate::handlers::HealthStatus,
            crate::repositories::PropertyInput,
            crate::repositories::UnitInput,
            crate::repositories::TenantInput,
            crate::repositories::LeaseInput,
            crate::repositories::LabelRow,
            crate::handlers::properties::PropertyResponse,
            crate::handlers::units::UnitResponse,
            crate::handlers::tenants::TenantResponse,
            crate::handlers::leases::LeaseResponse,
            crate::handlers::admin::AdminIndex,
            crate::admin::EntityDescriptor,
            crate::admin::FieldDescriptor,
            crate::admin::FieldKind,
        )
    ),
    modifiers(&BearerAuthAddon),
    tags(
        (name = "properties", description = "Managed real-estate assets"),
        (name = "units", description = "Rentable subdivisions of properties"),
        (name = "tenants", description = "People who may hold leases"),
        (name = "leases", description = "Tenant-unit rental agreements"),
        (name = "admin", description = "Admin registry and label lookups"),
    ),
    info(
        title = "Rentals API",
        description = "Records service for properties, units, tenants and leases",
        version = env!("CARGO_PKG_VERSION"),
    )
)]
pub struct ApiDoc;
