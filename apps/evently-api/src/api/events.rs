//! Events API routes

use axum::Router;
use domain_events::handlers;

use crate::state::AppState;

/// Create events router
pub fn router(state: &AppState) -> Router {
    handlers::router(state.events.clone())
}
