pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod state;
pub mod types;

#[cfg(test)]
pub mod testing;

use axum::{
    extract::State,
    http::StatusCode,
    middleware::from_fn_with_state,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::protected::{
    resource, Animals, Logs, MedicalRecords, Roles, SmartDevices, StateRecords, Treatments, Users,
};
use crate::middleware::{activity_middleware, auth_gate_middleware};

pub use crate::state::AppState;

/// Full application router. Layers run outside-in: trace, CORS, auth gate, activity tracker.
pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(public_routes())
        // Protected
        .merge(resource_routes())
        // Elevated
        .merge(admin_routes())
        // Global middleware
        .layer(from_fn_with_state(state.clone(), activity_middleware))
        .layer(from_fn_with_state(state.clone(), auth_gate_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    use handlers::public;

    Router::new()
        .route("/api/users/register", post(public::register_post))
        .route("/api/users/login", post(public::login_post))
        .route("/api-docs", get(public::docs_get))
}

fn resource_routes() -> Router<AppState> {
    Router::new()
        .merge(resource::routes::<Animals>("/api/animals"))
        .merge(resource::routes::<Roles>("/api/roles"))
        .merge(resource::routes::<MedicalRecords>("/api/medical-records"))
        .merge(resource::routes::<StateRecords>("/api/state-records"))
        .merge(resource::routes::<Treatments>("/api/treatments"))
        .merge(resource::routes::<Logs>("/api/logs"))
        .merge(resource::routes::<SmartDevices>("/api/smart-devices"))
        .merge(resource::routes::<Users>("/api/users"))
}

fn admin_routes() -> Router<AppState> {
    use handlers::elevated;

    Router::new()
        .route("/api/admin/block/:id", post(elevated::block_post))
        .route("/api/admin/unblock/:id", post(elevated::unblock_post))
        .route("/api/admin/statistics", get(elevated::statistics_get))
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "Pet Shelter API",
        "version": version,
        "description": "Shelter records: animals, medical history, treatments, devices and audit log",
        "endpoints": {
            "home": "/ (public)",
            "health": "/health (public)",
            "docs": "/api-docs (public)",
            "auth": "/api/users/register, /api/users/login (public - token acquisition)",
            "resources": "/api/{animals,roles,medical-records,state-records,treatments,logs,smart-devices,users}[/:id] (protected)",
            "admin": "/api/admin/block/:id, /api/admin/unblock/:id, /api/admin/statistics (admin only)",
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.db.health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "database": "unavailable"
                })),
            )
        }
    }
}
