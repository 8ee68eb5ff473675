//! Axum router construction.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{compression::CompressionLayer, timeout::TimeoutLayer, trace::TraceLayer};

use super::{handlers, middleware::HttpLimits, state::AppState};

/// Build the application [`Router`] with all routes and middleware attached.
pub fn build(state: AppState, limits: HttpLimits) -> Router {
    Router::new()
        .route("/v1/message/seal", post(handlers::seal_message))
        .route("/v1/message/open", post(handlers::open_message))
        .route("/v1/object/seal", post(handlers::seal_object))
        .route("/v1/object/open", post(handlers::open_object))
        .route("/v1/hash", post(handlers::hash))
        .route("/v1/hmac", post(handlers::hmac))
        .route("/v1/derive-key", post(handlers::derive_key))
        .route("/v1/salt", post(handlers::salt))
        .route("/v1/fingerprint", post(handlers::fingerprint))
        .route("/health", get(handlers::health))
        .fallback(handlers::not_found)
        .layer(DefaultBodyLimit::max(limits.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(limits.request_timeout))
        .layer(CompressionLayer::new())
        .with_state(state)
}
