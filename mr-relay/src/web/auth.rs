//! GitLab webhook token verification.
//!
//! GitLab sends the secret configured on the webhook verbatim in the
//! `X-Gitlab-Token` header. There is no signature, only a shared value.
//! Reference: https://docs.gitlab.com/ee/user/project/integrations/webhooks.html#validate-requests-with-a-secret-token

use axum::http::HeaderMap;
use tracing::{debug, warn};

use super::error::WebhookError;

/// Header carrying the shared secret.
pub const GITLAB_TOKEN_HEADER: &str = "X-Gitlab-Token";

/// Check the `X-Gitlab-Token` header against the configured secret.
///
/// With no secret configured every request passes. That default is weak and
/// is logged on every request so it does not go unnoticed.
pub fn verify_gitlab_token(
    secret: Option<&str>,
    headers: &HeaderMap,
    remote_addr: &str,
) -> Result<(), WebhookError> {
    let Some(expected) = secret.filter(|s| is_token_verification_enabled(s)) else {
        warn!(remote_addr = %remote_addr, "webhook_token_not_configured_skipping_validation");
        return Ok(());
    };

    // An empty header value counts as missing.
    let Some(provided) = headers
        .get(GITLAB_TOKEN_HEADER)
        .filter(|value| !value.is_empty())
    else {
        warn!(remote_addr = %remote_addr, "webhook_token_missing");
        return Err(WebhookError::MissingToken);
    };

    if !constant_time_compare(expected.as_bytes(), provided.as_bytes()) {
        warn!(
            remote_addr = %remote_addr,
            expected_length = expected.len(),
            actual_length = provided.len(),
            "webhook_token_invalid"
        );
        return Err(WebhookError::InvalidToken);
    }

    debug!(remote_addr = %remote_addr, "webhook_token_valid");
    Ok(())
}

/// Constant-time byte comparison to prevent timing attacks.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

/// Check if token verification is enabled for a configured secret.
pub fn is_token_verification_enabled(secret: &str) -> bool {
    !secret.is_empty()
}
