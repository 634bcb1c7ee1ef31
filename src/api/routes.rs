//! API route definitions
//!
//! - /api/login, /api/logout, /api/session - operator gate and navigation
//! - /api/knowledge/search - top-1 protocol lookup
//! - /api/strategy - canned recommendation
//! - /api/chat - assistant transcript
//! - /api/console/* - widget data for the remaining pages

use axum::{
    routing::{get, post, put},
    Router,
};

use super::handlers::{self, DashboardState};

/// Create all `/api` routes for the console
pub fn api_routes(state: DashboardState) -> Router {
    Router::new()
        // Session gate
        .route("/login", post(handlers::login))
        .route("/logout", post(handlers::logout))
        .route("/session", get(handlers::get_session))
        .route("/session/page", put(handlers::set_page))
        // Dispatch tools
        .route("/knowledge/search", post(handlers::search_knowledge))
        .route("/strategy", post(handlers::generate_strategy))
        .route(
            "/chat",
            get(handlers::get_chat)
                .post(handlers::send_chat)
                .delete(handlers::clear_chat),
        )
        // Console pages
        .route("/console/map", get(handlers::get_map))
        .route("/console/mission", get(handlers::get_mission))
        .route("/console/mission/checklist", put(handlers::update_checklist))
        .route("/console/vitals", get(handlers::get_vitals))
        .route("/console/supervisor", get(handlers::get_supervisor))
        .route("/console/features", get(handlers::get_features))
        .route("/console/actions/:action", post(handlers::console_action))
        .with_state(state)
}

/// Health endpoint at root level
pub fn health_routes(state: DashboardState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .with_state(state)
}
