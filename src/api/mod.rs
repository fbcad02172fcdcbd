//! HTTP API module
//!
//! Local control surface for the daemon: steak list, cook session, saved
//! steaks and preferences.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/steaks", get(list_steaks_handler).post(add_steak_handler))
        .route("/steaks/:index", put(edit_steak_handler).delete(remove_steak_handler))
        .route("/schedule", get(schedule_handler))
        .route("/session/start", post(start_session_handler))
        .route("/session/stop", post(stop_session_handler))
        .route("/status", get(status_handler))
        .route("/notices/clear", post(clear_notices_handler))
        .route("/saved-steaks", get(list_saved_steaks_handler).post(create_saved_steak_handler))
        .route(
            "/saved-steaks/:id",
            put(update_saved_steak_handler).delete(delete_saved_steak_handler),
        )
        .route("/saved-steaks/:id/info", put(set_saved_steak_info_handler))
        .route("/saved-steaks/:id/cook", post(cook_saved_steak_handler))
        .route(
            "/preferences/skip-intro",
            get(get_skip_intro_handler).put(set_skip_intro_handler),
        )
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
