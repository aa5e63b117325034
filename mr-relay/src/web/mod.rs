//! Web server module for handling inbound GitLab webhooks.
//!
//! This module provides a thin web server that:
//! - Receives merge request webhooks from GitLab
//! - Verifies the shared token
//! - Spawns the note relay in the background
//! - Returns 200 OK without waiting for GitLab's answer

pub mod auth;
pub mod error;
pub mod handlers;

use axum::{
    routing::{any, get},
    Router,
};
use tower_http::trace::TraceLayer;

pub use auth::{is_token_verification_enabled, verify_gitlab_token, GITLAB_TOKEN_HEADER};
pub use error::WebhookError;
pub use handlers::{gitlab_webhook, health, AppState, HealthResponse};

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/webhook", any(gitlab_webhook))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
