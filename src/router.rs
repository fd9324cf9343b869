use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::AppState;

/// Build the application router with all routes
pub fn build(state: Arc<AppState>, frontend_origin: Option<&str>) -> Router {
    Router::new()
        .route("/api/health", get(handlers::healthcheck))
        // Template catalog routes
        .route("/api/templates", get(handlers::templates::list_templates))
        .route("/api/templates/stats", get(handlers::templates::template_stats))
        .route("/api/templates/facets", get(handlers::templates::template_facets))
        .route("/api/templates/render-batch", post(handlers::templates::render_batch))
        .route("/api/templates/:id", get(handlers::templates::get_template))
        .route("/api/templates/:id/render", post(handlers::templates::render_template))
        // Deployment planning
        .route("/api/planning", post(handlers::planning::create_plan))
        // Add state and middleware
        .with_state(state)
        .layer(cors_layer(frontend_origin))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(frontend_origin: Option<&str>) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    match frontend_origin.map(HeaderValue::from_str) {
        Some(Ok(origin)) => cors.allow_origin(origin),
        Some(Err(e)) => {
            tracing::warn!("Invalid FRONTEND_ORIGIN, allowing any origin: {}", e);
            cors.allow_origin(Any)
        }
        None => cors.allow_origin(Any),
    }
}
