//! GitLab module: wire types and the REST client used to post notes.

pub mod client;
pub mod types;

pub use client::{GitlabClient, RelayError, PRIVATE_TOKEN_HEADER};
pub use types::{CommentRequest, ObjectAttributes, ProjectInfo, WebhookEvent, MERGE_REQUEST_KIND};
