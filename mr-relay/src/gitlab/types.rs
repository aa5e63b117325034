//! GitLab wire types.
//!
//! This module defines the message formats for:
//! - Inbound merge-request webhook events (`object_kind = "merge_request"`)
//! - Outbound note creation requests (`POST .../merge_requests/:iid/notes`)

use serde::{Deserialize, Serialize};

/// The only `object_kind` this service acts on.
pub const MERGE_REQUEST_KIND: &str = "merge_request";

// =============================================================================
// Webhook Event (inbound)
// =============================================================================

/// Webhook event as sent by GitLab.
///
/// Every field is optional: absent or `null` values decode to their zero
/// value so that validation, not parsing, decides whether an event is usable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhookEvent {
    /// Event type tag, e.g. `merge_request`, `push`, `note`
    #[serde(default)]
    pub object_kind: Option<String>,
    /// Project the event belongs to
    #[serde(default)]
    pub project: Option<ProjectInfo>,
    /// Merge request attributes
    #[serde(default)]
    pub object_attributes: Option<ObjectAttributes>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectInfo {
    #[serde(default)]
    pub id: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObjectAttributes {
    /// Project-scoped merge request number
    #[serde(default)]
    pub iid: Option<u64>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
}

impl WebhookEvent {
    pub fn kind(&self) -> &str {
        self.object_kind.as_deref().unwrap_or_default()
    }

    /// Project id, `0` when absent.
    pub fn project_id(&self) -> u64 {
        self.project.as_ref().and_then(|p| p.id).unwrap_or(0)
    }

    /// Merge request IID, `0` when absent.
    pub fn merge_request_iid(&self) -> u64 {
        self.object_attributes
            .as_ref()
            .and_then(|a| a.iid)
            .unwrap_or(0)
    }

    pub fn state(&self) -> &str {
        self.object_attributes
            .as_ref()
            .and_then(|a| a.state.as_deref())
            .unwrap_or_default()
    }

    pub fn action(&self) -> &str {
        self.object_attributes
            .as_ref()
            .and_then(|a| a.action.as_deref())
            .unwrap_or_default()
    }

    pub fn is_merge_request(&self) -> bool {
        self.kind() == MERGE_REQUEST_KIND
    }
}

// =============================================================================
// Comment Request (outbound)
// =============================================================================

/// Body of a note creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRequest {
    pub body: String,
}

impl CommentRequest {
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }
}
