//! HTTP server setup with Axum

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    middleware,
    routing::{any, get, put},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
};

use super::middleware::{access_log, handle_panic};
use super::rest::{admin, webhooks, ApiError};
use super::state::AppState;

/// Upper bound on buffered request bodies. Channels apply their own,
/// smaller limits so they can report them.
pub const MAX_REQUEST_BODY: usize = 8 * 1024 * 1024;

/// Create the Axum router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    let router = Router::new()
        // Webhook ingestion
        .route("/webhooks/:channel", any(webhooks::receive_webhook))
        // Health check
        .route("/health", get(health_check).fallback(method_not_allowed))
        // Admin API
        .route("/admin/events", get(admin::list_events).fallback(method_not_allowed))
        .route("/admin/events/:id", get(admin::get_event).fallback(method_not_allowed))
        .route(
            "/admin/events/:id/status",
            put(admin::update_event_status).fallback(method_not_allowed),
        )
        .route("/admin/stats", get(admin::get_stats).fallback(method_not_allowed))
        .route("/admin/channels", get(admin::list_channels).fallback(method_not_allowed))
        .route("/admin/skills", get(admin::list_skills).fallback(method_not_allowed))
        .fallback(route_not_found)
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY))
        .with_state(state);

    with_middleware(router)
}

/// Wrap a router in request id, access log and panic recovery layers,
/// outermost first.
pub fn with_middleware(router: Router) -> Router {
    router.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(middleware::from_fn(access_log))
            .layer(CatchPanicLayer::custom(handle_panic)),
    )
}

/// Health check endpoint
async fn health_check() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

async fn route_not_found() -> ApiError {
    ApiError::not_found("not found")
}

async fn method_not_allowed() -> ApiError {
    ApiError::new(StatusCode::METHOD_NOT_ALLOWED, "method not allowed")
}
