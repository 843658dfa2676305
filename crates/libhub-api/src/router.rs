//! Route definitions for the LibHub HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.
//! The router receives `AppState` and passes it to all handlers via
//! Axum's `State` extractor.

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(access_routes())
        .merge(profile_routes())
        .merge(admin_routes())
        .merge(health_routes());

    let cors = middleware::cors::build_cors_layer(&state.config.server.cors);

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// Auth endpoints: login, logout, me
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/me", get(handlers::auth::me))
}

/// Per-book access decisions
fn access_routes() -> Router<AppState> {
    Router::new().route("/books/{id}/access", get(handlers::access::check_access))
}

/// Member self-service endpoints
fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/profile/complete", post(handlers::profile::complete_profile))
        .route("/profile/id-proof", post(handlers::profile::upload_id_proof))
}

/// Operator-only administration endpoints
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/members", get(handlers::admin::list_members))
        .route(
            "/admin/members/{subject_id}",
            get(handlers::admin::member_detail),
        )
        .route(
            "/admin/members/{subject_id}/sessions",
            get(handlers::admin::member_sessions),
        )
        .route(
            "/admin/members/{subject_id}/verify",
            post(handlers::admin::verify_id_proof),
        )
        .route(
            "/admin/members/{subject_id}/suspend",
            post(handlers::admin::suspend_member),
        )
        .route(
            "/admin/analytics/members",
            get(handlers::admin::member_analytics),
        )
}

/// Liveness endpoints
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
