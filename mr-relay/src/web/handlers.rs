//! Webhook endpoint handlers.
//!
//! The GitLab handler only:
//! 1. Verifies the shared token
//! 2. Decodes and validates the merge request event
//! 3. Spawns the note relay without waiting for it
//! 4. Returns 200 OK
//!
//! The relay outcome is never reported back to the webhook caller.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    extract::{ConnectInfo, State},
    http::{HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{debug, error, info};

use crate::gitlab::{GitlabClient, WebhookEvent};
use crate::relay::{comment_body, spawn_comment};
use crate::web::auth::verify_gitlab_token;
use crate::web::error::WebhookError;
use crate::Config;

/// Upper bound on accepted webhook bodies.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub gitlab: GitlabClient,
}

impl AppState {
    pub fn new(config: Config, gitlab: GitlabClient) -> Self {
        Self {
            config: Arc::new(config),
            gitlab,
        }
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// =============================================================================
// GitLab Webhook
// =============================================================================

/// GitLab webhook endpoint.
///
/// Mounted for every method so that non-POST requests get a 405 from here,
/// after authentication, rather than from the router.
pub async fn gitlab_webhook(
    State(state): State<AppState>,
    ConnectInfo(remote_addr): ConnectInfo<SocketAddr>,
    method: Method,
    headers: HeaderMap,
    body: Body,
) -> Result<Response, WebhookError> {
    let remote_addr = remote_addr.to_string();

    verify_gitlab_token(state.config.webhook_secret.as_deref(), &headers, &remote_addr)?;

    if method != Method::POST {
        error!(method = %method, remote_addr = %remote_addr, "webhook_method_not_allowed");
        return Err(WebhookError::MethodNotAllowed);
    }

    let body = to_bytes(body, MAX_BODY_BYTES).await.map_err(|e| {
        error!(error = %e, remote_addr = %remote_addr, "webhook_body_read_failed");
        WebhookError::BodyRead
    })?;

    // A JSON `null` body decodes to an empty event.
    let event: Option<WebhookEvent> = serde_json::from_slice(&body).map_err(|e| {
        error!(
            error = %e,
            body = %String::from_utf8_lossy(&body),
            "webhook_json_parse_failed"
        );
        WebhookError::Parse
    })?;
    let event = event.unwrap_or_default();

    if !event.is_merge_request() {
        info!(object_kind = %event.kind(), "webhook_event_ignored");
        return Ok((
            StatusCode::OK,
            format!("Event kind '{}' ignored", event.kind()),
        )
            .into_response());
    }

    let project_id = event.project_id();
    let mr_iid = event.merge_request_iid();

    if project_id == 0 || mr_iid == 0 {
        error!(
            project_id = project_id,
            mr_iid = mr_iid,
            object_kind = %event.kind(),
            body = %String::from_utf8_lossy(&body),
            "webhook_missing_project_or_mr"
        );
        return Err(WebhookError::MissingField);
    }

    info!(
        object_kind = %event.kind(),
        project_id = project_id,
        mr_iid = mr_iid,
        action = %event.action(),
        state = %event.state(),
        "merge_request_event_received"
    );

    match serde_json::to_string_pretty(&event) {
        Ok(pretty) => debug!(payload = %pretty, "merge_request_event_payload"),
        Err(e) => error!(error = %e, "merge_request_event_format_failed"),
    }

    // Detached: the handle is dropped and the response does not wait on it.
    spawn_comment(state.gitlab.clone(), project_id, mr_iid, comment_body(mr_iid));

    Ok((
        StatusCode::OK,
        format!(
            "Webhook received and comment posted successfully for MR !{}.",
            mr_iid
        ),
    )
        .into_response())
}
