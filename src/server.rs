//! # Server Configuration
//!
//! This module contains the server setup and configuration for the Employee Directory API.

use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{delete, get},
};
use sea_orm::DatabaseConnection;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::AppConfig;
use crate::handlers;
use crate::repositories::{EmployeeGateway, EmployeeRepository};
use crate::telemetry;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub gateway: Arc<dyn EmployeeGateway>,
}

impl AppState {
    /// State backed by the SeaORM repository on `db`
    pub fn new(config: AppConfig, db: DatabaseConnection) -> Self {
        Self {
            config: Arc::new(config),
            gateway: Arc::new(EmployeeRepository::new(Arc::new(db))),
        }
    }
}

/// CORS policy allowing the directory front end
fn cors_layer(config: &AppConfig) -> anyhow::Result<CorsLayer> {
    let origin = HeaderValue::from_str(config.frontend_url.trim_end_matches('/'))
        .with_context(|| format!("Invalid frontend origin: {}", config.frontend_url))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE]))
}

/// Creates and configures the Axum application router
pub fn create_app(state: AppState) -> anyhow::Result<Router> {
    let cors = cors_layer(&state.config)?;

    let router = Router::new()
        .route("/", get(handlers::root))
        .route("/healthz", get(handlers::healthz))
        .route("/readyz", get(handlers::readyz))
        .route(
            "/employees",
            get(handlers::employees::list_active_employees)
                .post(handlers::employees::create_employee),
        )
        .route(
            "/employees/all",
            get(handlers::employees::list_all_employees),
        )
        .route(
            "/employees/{id}",
            get(handlers::employees::get_employee)
                .put(handlers::employees::replace_employee)
                .patch(handlers::employees::patch_employee)
                .delete(handlers::employees::deactivate_employee),
        )
        .route(
            "/employees/hard/{id}",
            delete(handlers::employees::destroy_employee),
        )
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .layer(middleware::from_fn(telemetry::trace_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    Ok(router)
}

/// Starts the server with the given configuration
pub async fn run_server(config: AppConfig, db: DatabaseConnection) -> anyhow::Result<()> {
    let addr = config
        .bind_addr()
        .with_context(|| format!("Invalid server address: {}", config.api_bind_addr))?;
    let profile = config.profile.clone();

    let app = create_app(AppState::new(config, db))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(%addr, %profile, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::root,
        crate::handlers::healthz,
        crate::handlers::readyz,
        crate::handlers::employees::list_active_employees,
        crate::handlers::employees::list_all_employees,
        crate::handlers::employees::get_employee,
        crate::handlers::employees::create_employee,
        crate::handlers::employees::replace_employee,
        crate::handlers::employees::patch_employee,
        crate::handlers::employees::deactivate_employee,
        crate::handlers::employees::destroy_employee,
    ),
    components(
        schemas(
            crate::models::ServiceInfo,
            crate::models::HealthStatus,
            crate::models::EmployeeRecord,
            crate::handlers::employees::CreateEmployeeRequest,
            crate::handlers::employees::ReplaceEmployeeRequest,
            crate::handlers::employees::PatchEmployeeRequest,
            crate::error::ApiError,
        )
    ),
    tags(
        (name = "root", description = "Service information"),
        (name = "health", description = "Liveness and readiness probes"),
        (name = "employees", description = "Employee directory"),
    ),
    info(
        title = "Employee Directory API",
        description = "API for managing the employee directory",
        version = env!("CARGO_PKG_VERSION"),
    )
)]
pub struct ApiDoc;
