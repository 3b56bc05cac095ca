//! Route table for the HTTP API

use std::path::Path;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use super::middleware::logging_middleware;
use super::state::AppState;
use super::{accounts, demo, health, users};

/// Create the full router with application state
///
/// Unmatched paths fall through to static files under `public_dir`.
pub fn create_router(state: AppState, public_dir: impl AsRef<Path>) -> Router {
    Router::new()
        // Probes
        .route("/health", get(health::health_check))
        .route("/live", get(health::live_check))
        // Demo routes
        .route("/", get(demo::index))
        .route("/user/{id}", get(demo::show_user))
        .route("/search", get(demo::search))
        .route("/form", post(demo::submit_form))
        .route("/api/data", post(demo::receive_data))
        .route("/error", get(demo::intentional_error))
        // JSON-file user records
        .route("/users", get(users::list_users).post(users::create_user))
        .route("/users/{id}", put(users::update_user).delete(users::delete_user))
        // Database accounts
        .route("/db-users", get(accounts::list_accounts))
        .route("/register", post(accounts::register))
        .route("/login", post(accounts::login))
        .route("/protected-route", get(accounts::protected_route))
        .fallback_service(ServeDir::new(public_dir.as_ref()))
        .with_state(state)
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
}
