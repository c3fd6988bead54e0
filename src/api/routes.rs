//! Router assembly
//! Mission: One place that binds paths, methods, auth and middleware

use crate::api::{admin, employee, public};
use crate::auth::{api as auth_api, require_auth, AuthGate, JwtHandler, UserStore};
use crate::error::method_not_allowed;
use crate::middleware::request_logging;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub gate: AuthGate,
    pub user_store: Arc<dyn UserStore>,
}

impl AppState {
    pub fn new(jwt: Arc<JwtHandler>, user_store: Arc<dyn UserStore>) -> Self {
        Self {
            gate: AuthGate::new(jwt),
            user_store,
        }
    }
}

/// Build the full application router.
///
/// Each route accepts one method; anything else hits the 405 fallback before
/// auth or body parsing run.
pub fn router(state: AppState) -> Router {
    let me = get(auth_api::get_current_user)
        .route_layer(middleware::from_fn_with_state(
            state.gate.clone(),
            require_auth,
        ))
        .fallback(method_not_allowed);

    Router::new()
        .route("/health", get(public::health_check))
        .route(
            "/api/ai",
            post(public::ai_placeholder).fallback(method_not_allowed),
        )
        .route(
            "/api/employee/dashboard",
            get(employee::dashboard).fallback(method_not_allowed),
        )
        .route(
            "/api/admin/profile",
            post(admin::update_profile).fallback(method_not_allowed),
        )
        .route("/api/auth/me", me)
        .with_state(state)
        .layer(middleware::from_fn(request_logging))
        .layer(CorsLayer::permissive())
}
