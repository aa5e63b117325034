//! Errors that end webhook handling early.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Terminal failure for an inbound webhook request.
///
/// The `Display` text is the response body sent to the caller.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WebhookError {
    #[error("Unauthorized: Missing X-Gitlab-Token header")]
    MissingToken,

    #[error("Unauthorized: Invalid X-Gitlab-Token")]
    InvalidToken,

    #[error("Method Not Allowed")]
    MethodNotAllowed,

    #[error("Failed to read request body")]
    BodyRead,

    #[error("Bad Request: Failed to parse JSON payload")]
    Parse,

    #[error("Bad Request: Missing project ID or merge request IID in payload")]
    MissingField,
}

impl WebhookError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::MissingToken | WebhookError::InvalidToken => StatusCode::UNAUTHORIZED,
            WebhookError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            WebhookError::BodyRead => StatusCode::INTERNAL_SERVER_ERROR,
            WebhookError::Parse | WebhookError::MissingField => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        (self.status_code(), self.to_string()).into_response()
    }
}
