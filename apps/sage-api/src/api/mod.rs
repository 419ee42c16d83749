//! HTTP routes for the Sage API

pub mod auth;
pub mod health;
pub mod questions;

use axum::Router;
use axum_helpers::health_router;
use domain_users::UserResult;

use crate::state::AppState;

/// Routes nested under `/api` by `axum_helpers::create_router`
pub fn routes(state: &AppState) -> Router {
    Router::new().nest("/questions", questions::router(state))
}

/// Routes served from the root: auth, liveness and readiness
pub fn root_routes(state: &AppState) -> UserResult<Router> {
    Ok(Router::new()
        .nest("/auth", auth::router(state)?)
        .merge(health_router(state.config.app))
        .merge(health::router(state.clone())))
}
