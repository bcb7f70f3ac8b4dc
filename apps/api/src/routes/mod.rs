pub mod health;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::profile::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Profile API
        .route("/api/v1/profile", get(handlers::handle_get_profile))
        .route("/api/v1/profile/phone/add", post(handlers::handle_add_phone))
        .route(
            "/api/v1/profile/phone/verify",
            post(handlers::handle_verify_phone),
        )
        .route("/api/v1/profile/phone", delete(handlers::handle_remove_phone))
        .route(
            "/api/v1/profile/sms/settings",
            put(handlers::handle_update_sms_settings),
        )
        .route("/api/v1/profile/sms/usage", get(handlers::handle_sms_usage))
        .with_state(state)
}
