//! Error types.
//!
//! [`ChatError`] is returned by every chat store and responder. Handlers
//! return [`AppError`], which renders as a JSON `{"error": ...}` body.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::message::SessionId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChatError {
    #[error("chat session {0} not found")]
    NotFound(SessionId),

    #[error("invalid request: {0}")]
    Validation(String),

    #[error("chat session {0} has ended")]
    SessionEnded(SessionId),

    /// Transport failure or timeout talking to a chat backend.
    #[error("chat service unreachable: {0}")]
    Unreachable(String),

    /// The backend answered, but not with something we can use.
    #[error("chat service error: {0}")]
    Upstream(String),
}

impl From<reqwest::Error> for ChatError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ChatError::Upstream(e.to_string())
        } else {
            ChatError::Unreachable(e.to_string())
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("service unavailable: {0}")]
    Unavailable(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        match e {
            ChatError::NotFound(_) => AppError::NotFound(e.to_string()),
            ChatError::Validation(m) => AppError::BadRequest(m),
            ChatError::SessionEnded(_) => AppError::Conflict(e.to_string()),
            ChatError::Unreachable(m) => AppError::Unavailable(m),
            ChatError::Upstream(m) => AppError::Internal(m),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
            AppError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
            AppError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized".to_owned()),
            AppError::Unavailable(m) => {
                error!(error = %m, "chat responder unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "chat service is temporarily unavailable".to_owned(),
                )
            }
            AppError::Internal(m) => {
                error!(error = %m, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_owned(),
                )
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
