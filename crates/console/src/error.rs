//! Unified error handling for the console.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use estancia_core::ActivityId;

use crate::backend::BackendError;
use crate::models::ValidationError;
use crate::services::{CommitError, UndoError};

/// Application-level error type for the console.
#[derive(Debug, Error)]
pub enum AppError {
    /// Backend RPC/transport failed.
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// A submitted plan failed validation; carries every failure.
    #[error("Validation failed with {} error(s)", .0.len())]
    Validation(Vec<ValidationError>),

    /// Undo refused because the activity is already reversed.
    #[error("Activity {0} is already reversed")]
    AlreadyReversed(ActivityId),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// User lacks permission.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<CommitError> for AppError {
    fn from(err: CommitError) -> Self {
        match err {
            CommitError::Validation(errors) => Self::Validation(errors),
            CommitError::Persist { .. } => Self::Internal(err.to_string()),
        }
    }
}

impl From<UndoError> for AppError {
    fn from(err: UndoError) -> Self {
        match err {
            UndoError::AlreadyReversed(id) => Self::AlreadyReversed(id),
            UndoError::InvalidParameters(msg) => Self::BadRequest(msg.to_string()),
            UndoError::Fetch(BackendError::NotFound(what)) => Self::NotFound(what),
            UndoError::Fetch(source) => Self::Backend(source),
            UndoError::MarkReversed { .. } => Self::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log server errors with Sentry
        if matches!(self, Self::Backend(_) | Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Console request error"
            );
        }

        let status = match &self {
            Self::Backend(_) => StatusCode::BAD_GATEWAY,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::AlreadyReversed(_) => StatusCode::CONFLICT,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Validation responses enumerate every error so the user corrects
        // everything in one pass. Internal details are never exposed.
        let body = match &self {
            Self::Validation(errors) => json!({
                "error": "validation_failed",
                "errors": errors,
                "messages": errors.iter().map(ToString::to_string).collect::<Vec<_>>(),
            }),
            Self::Backend(_) => json!({ "error": "backend_unavailable" }),
            Self::Internal(_) => json!({ "error": "internal_error" }),
            other => json!({ "error": other.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}
