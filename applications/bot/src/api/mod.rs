/// API route modules
pub mod events;
pub mod health;

use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

/// Full router: liveness probe plus the bridge API under `/api`
pub fn router(app_state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health::health))
        .route("/events/message", post(events::message))
        .route("/events/interaction", post(events::interaction))
        .route("/events/engine", post(events::engine));

    Router::new()
        .route("/", get(health::root))
        .nest("/api", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true)),
        )
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
