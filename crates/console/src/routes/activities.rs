//! Persisted activity route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use tracing::instrument;

use estancia_core::{ActivityId, CategoryId, LotId};

use crate::backend::{BackendError, ReclassificationBackend};
use crate::error::AppError;
use crate::middleware::RequireUser;
use crate::models::ReclassificationActivity;
use crate::services::{UndoCoordinator, UndoOutcome};
use crate::state::AppState;

/// `GET /api/activities/{id}`
#[instrument(skip(state, _user))]
pub async fn detail(
    State(state): State<AppState>,
    RequireUser(_user): RequireUser,
    Path(activity_id): Path<ActivityId>,
) -> Result<Json<ReclassificationActivity>, AppError> {
    let activity = state
        .backend()
        .fetch_activity(activity_id)
        .await
        .map_err(|e| match e {
            BackendError::NotFound(_) => AppError::NotFound(format!("activity {activity_id}")),
            other => AppError::Backend(other),
        })?;
    Ok(Json(activity))
}

/// Result of an undo request.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UndoResponse {
    /// Every inverse line committed; the activity is now reversed.
    Reversed {
        activity_id: ActivityId,
        line_count: usize,
    },
    /// An inverse line failed; the activity remains un-reversed and the
    /// undo can be retried.
    PartialFailure {
        succeeded: usize,
        lot_id: LotId,
        category_id: CategoryId,
        message: String,
    },
}

impl From<UndoOutcome> for UndoResponse {
    fn from(outcome: UndoOutcome) -> Self {
        match outcome {
            UndoOutcome::Reversed {
                activity_id,
                line_count,
            } => Self::Reversed {
                activity_id,
                line_count,
            },
            UndoOutcome::PartialFailure {
                succeeded,
                lot_id,
                category_id,
                message,
            } => Self::PartialFailure {
                succeeded,
                lot_id,
                category_id,
                message,
            },
        }
    }
}

/// `POST /api/activities/{id}/undo`
#[instrument(skip(state, user))]
pub async fn undo(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(activity_id): Path<ActivityId>,
) -> Result<Json<UndoResponse>, AppError> {
    user.require_reclassify()?;

    let outcome = UndoCoordinator::new(state.backend().clone())
        .undo(activity_id, user.id)
        .await?;

    Ok(Json(outcome.into()))
}
