//! Background relay of merge request notes.
//!
//! The webhook handler hands each comment to [`spawn_comment`] and answers its
//! caller right away. The spawned task is never joined on the request path:
//! its outcome only shows up in the logs.

use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::gitlab::GitlabClient;

/// Text of the note posted for a merge request event.
pub fn comment_body(merge_request_iid: u64) -> String {
    format!(
        "Received webhook event via direct API call. Merge Request IID is: `{}`",
        merge_request_iid
    )
}

/// Launch a detached task that posts `body` to the merge request.
///
/// The returned handle may be dropped; dropping it does not cancel the task.
pub fn spawn_comment(
    client: GitlabClient,
    project_id: u64,
    merge_request_iid: u64,
    body: String,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            project_id = project_id,
            mr_iid = merge_request_iid,
            "relay_started"
        );

        match client.post_comment(project_id, merge_request_iid, body).await {
            Ok(()) => info!(
                project_id = project_id,
                mr_iid = merge_request_iid,
                "relay_succeeded"
            ),
            Err(e) => error!(
                project_id = project_id,
                mr_iid = merge_request_iid,
                error = %e,
                "relay_failed"
            ),
        }
    })
}
