//! Axum router configuration with middleware.
//!
//! All routes are under `/api/v1/`. Middleware: CORS and request tracing.

use axum::extract::State;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use sentira_core::llm::ChatClient;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/users", post(handlers::user::create_user))
        .route("/users/{id}", get(handlers::user::get_user))
        .route("/users/{id}/statistics", get(handlers::user::get_statistics))
        .route("/interactions", post(handlers::interaction::process_interaction))
        .route(
            "/interactions/{id}/analysis",
            get(handlers::interaction::get_analysis),
        )
        .route(
            "/users/{id}/reports/{period}",
            get(handlers::report::get_report),
        )
        .route(
            "/users/{id}/memories/classification",
            get(handlers::report::classify_memories),
        );

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - liveness plus a completion-endpoint probe.
async fn health_check(State(state): State<AppState>) -> axum::Json<serde_json::Value> {
    let llm_available = state.pipeline.client().is_available().await;
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "llm_available": llm_available,
    }))
}
