use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        // Preference submissions
        .route(
            "/preferences",
            get(handlers::list_preferences).post(handlers::submit_preference),
        )
        .route("/preferences/stats", get(handlers::submission_stats))
        // Analysis
        .route("/analysis", get(handlers::get_analysis))
        .route("/analysis/charts", get(handlers::get_charts))
        // Recommendations
        .route(
            "/recommendations/group",
            get(handlers::group_recommendations),
        )
        .route(
            "/recommendations/personal",
            post(handlers::personal_recommendations),
        )
}
