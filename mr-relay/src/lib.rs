//! MR Relay - GitLab merge request webhook relay.
//!
//! Receives merge request webhooks from GitLab, authenticates them with the
//! shared `X-Gitlab-Token` secret and posts a note back to the merge request
//! through the GitLab REST API.
//!
//! ## Architecture
//!
//! ```text
//! GitLab → POST /webhook → validate → 200 OK
//!                              └─ spawn → POST /api/v4/projects/:id/merge_requests/:iid/notes
//! ```

pub mod config;
pub mod gitlab;
pub mod relay;
pub mod web;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use config::{Config, ConfigError};
pub use gitlab::{GitlabClient, RelayError, WebhookEvent};
pub use web::{router, AppState, WebhookError};
