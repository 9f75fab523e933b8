use axum::{
    body::Body,
    http::Request,
    routing::{any, get},
    Router,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::handlers::{contact_endpoint, health_check, translate_endpoint};
use crate::state::AppState;

pub fn create_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/api/health", get(health_check))
        // Proxy endpoints; method dispatch happens after the origin check
        .route("/api/translate", any(translate_endpoint))
        .route("/api/contact", any(contact_endpoint))
}

/// Full application: routes, request tracing, state
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(create_routes())
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "http_request",
                    request_id = %Uuid::new_v4(),
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            }),
        )
        .with_state(state)
}
