//! Route definitions for the OpsDash HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.
//! The router receives `AppState` and passes it to all handlers via
//! Axum's `State` extractor.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{delete, get, post, put},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let max_upload = state.config.storage.max_upload_size_bytes as usize;

    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(user_routes())
        .merge(file_routes())
        .merge(health_routes());

    let cors = build_cors_layer(&state);

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(max_upload))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Login flow endpoints.
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/check-email", post(handlers::auth::check_email))
        .route("/auth/check-password", post(handlers::auth::check_password))
        .route("/auth/send-otp", post(handlers::auth::send_otp))
        .route("/auth/verify-otp", post(handlers::auth::verify_otp))
        .route("/auth/me", get(handlers::auth::me))
        .route("/auth/logout", post(handlers::auth::logout))
}

/// Profile, departments, junior management.
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/profile", get(handlers::user::profile))
        .route("/users/juniors", get(handlers::user::juniors))
        .route(
            "/users/{id}/dashboard-access",
            put(handlers::user::set_dashboard_access),
        )
        .route("/departments", get(handlers::user::departments))
}

/// File lifecycle and listing endpoints, each mapping 1:1 to an engine
/// or query operation.
fn file_routes() -> Router<AppState> {
    Router::new()
        .route("/files", get(handlers::file::list_files))
        .route("/files/upload", post(handlers::file::upload))
        .route("/files/activity-log", get(handlers::file::activity_log))
        .route("/files/{id}", put(handlers::file::submit_edit))
        .route("/files/{id}", delete(handlers::file::delete_file))
        .route("/files/{id}/action", post(handlers::file::file_action))
        .route("/files/{id}/content", get(handlers::file::read_content))
}

/// Health endpoint.
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// Build the CORS layer from configuration.
fn build_cors_layer(state: &AppState) -> CorsLayer {
    let origins = &state.config.server.cors.allowed_origins;

    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let parsed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        CorsLayer::new()
            .allow_origin(parsed)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
