//! GitLab REST client for creating merge request notes.
//!
//! One request per call, no retries, transport defaults for timeouts.

use std::sync::Arc;

use reqwest::{header::CONTENT_TYPE, Client};
use thiserror::Error;
use tracing::{error, info};

use super::types::CommentRequest;
use crate::config::DEFAULT_GITLAB_BASE_URL;

/// Header GitLab reads access tokens from.
pub const PRIVATE_TOKEN_HEADER: &str = "PRIVATE-TOKEN";

/// Logged and returned when a failed response body cannot be read.
pub const UNREADABLE_BODY: &str = "Could not read response body.";

/// Failure to relay a note to GitLab.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("failed to serialize comment JSON: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to execute request: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("gitlab API error: status code {status}")]
    Status { status: u16, body: String },
}

/// GitLab API client.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct GitlabClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: Client,
    base_url: String,
    token: String,
}

impl GitlabClient {
    /// Create a client for the given GitLab instance and access token.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self::with_http_client(Client::new(), base_url, token)
    }

    /// Create a client on top of an existing `reqwest::Client`.
    pub fn with_http_client(
        http: Client,
        base_url: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into();
        let base_url = match base_url.trim().trim_end_matches('/') {
            "" => DEFAULT_GITLAB_BASE_URL.to_string(),
            trimmed => trimmed.to_string(),
        };

        Self {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                token: token.into(),
            }),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// URL of the notes collection for a merge request.
    pub fn notes_url(&self, project_id: u64, merge_request_iid: u64) -> String {
        format!(
            "{}/api/v4/projects/{}/merge_requests/{}/notes",
            self.inner.base_url, project_id, merge_request_iid
        )
    }

    /// Post a note to a merge request.
    ///
    /// Any 2xx status is a success. For other statuses the response body is
    /// read (best effort) and logged before the error is returned.
    pub async fn post_comment(
        &self,
        project_id: u64,
        merge_request_iid: u64,
        body: String,
    ) -> Result<(), RelayError> {
        let url = self.notes_url(project_id, merge_request_iid);

        let payload = serde_json::to_vec(&CommentRequest::new(body)).map_err(|e| {
            error!(error = %e, "gitlab_comment_serialize_failed");
            RelayError::Serialize(e)
        })?;

        let response = self
            .inner
            .http
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .header(PRIVATE_TOKEN_HEADER, self.inner.token.as_str())
            .body(payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_builder() {
                    error!(url = %url, error = %e, "gitlab_request_build_failed");
                } else {
                    error!(url = %url, error = %e, "gitlab_request_failed");
                }
                RelayError::Transport(e)
            })?;

        let status = response.status();
        if status.is_success() {
            info!(status_code = status.as_u16(), "gitlab_api_call_successful");
            return Ok(());
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| UNREADABLE_BODY.to_string());

        error!(
            status_code = status.as_u16(),
            url = %url,
            response = %body,
            "gitlab_api_non_success_status"
        );

        Err(RelayError::Status {
            status: status.as_u16(),
            body,
        })
    }
}
