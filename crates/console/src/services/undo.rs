//! Undo coordinator for committed reclassification activities.
//!
//! Undo builds the inverse of each persisted detail line (categories
//! swapped, quantity and weight untouched) and submits it through the same
//! sequential fail-fast path as a regular commit. The activity is marked
//! reversed only after every inverse line succeeds: a partial failure
//! leaves `reversed = false` so the operator can retry. A retry re-attempts
//! all lines, which can double-move lines that succeeded on the earlier
//! attempt; per-line resume tracking is a known gap.

use chrono::Utc;
use thiserror::Error;
use tracing::{info, instrument, warn};

use estancia_core::{ActivityId, CategoryId, LotId, UserId};

use crate::backend::{BackendError, ReclassificationBackend};
use crate::models::ReclassificationOp;

use super::reclassification::submit_sequential;

/// Outcome of an undo attempt.
#[derive(Debug)]
pub enum UndoOutcome {
    /// Every inverse line committed and the activity is marked reversed.
    Reversed {
        /// The reversed activity.
        activity_id: ActivityId,
        /// Number of inverse lines committed.
        line_count: usize,
    },
    /// An inverse line failed; the activity remains un-reversed.
    PartialFailure {
        /// Inverse lines committed before the failure.
        succeeded: usize,
        /// Lot of the failing inverse line.
        lot_id: LotId,
        /// Source category of the failing inverse line.
        category_id: CategoryId,
        /// Backend error message for the failing line.
        message: String,
    },
}

/// Errors that prevent an undo from starting or completing.
#[derive(Debug, Error)]
pub enum UndoError {
    /// The activity was already reversed; undo is terminal and never
    /// applied twice.
    #[error("activity {0} is already reversed")]
    AlreadyReversed(ActivityId),

    /// Required context is missing; indicates an integration bug.
    #[error("invalid undo parameters: {0}")]
    InvalidParameters(&'static str),

    /// The activity could not be fetched.
    #[error("activity fetch failed: {0}")]
    Fetch(#[source] BackendError),

    /// All inverse lines committed but the reversed mark failed.
    ///
    /// Stock is back where it was; the audit flag is not set. A retry of
    /// undo would double-apply, so this is surfaced for manual reconciliation.
    #[error("reversed mark failed after {line_count} inverse line(s): {source}")]
    MarkReversed {
        line_count: usize,
        #[source]
        source: BackendError,
    },
}

/// Coordinates the undo of a previously committed activity.
pub struct UndoCoordinator<B> {
    backend: B,
}

impl<B: ReclassificationBackend> UndoCoordinator<B> {
    /// Create a new coordinator over a backend.
    pub const fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Undo a committed activity on behalf of `acting_user`.
    ///
    /// # Errors
    ///
    /// [`UndoError::AlreadyReversed`] if the activity is terminal (no
    /// mutation is issued), [`UndoError::InvalidParameters`] if the
    /// activity has no detail lines, [`UndoError::Fetch`] if it cannot be
    /// read, [`UndoError::MarkReversed`] if the final audit mark fails.
    #[instrument(skip(self))]
    pub async fn undo(
        &self,
        activity_id: ActivityId,
        acting_user: UserId,
    ) -> Result<UndoOutcome, UndoError> {
        let activity = self
            .backend
            .fetch_activity(activity_id)
            .await
            .map_err(UndoError::Fetch)?;

        if activity.reversed {
            return Err(UndoError::AlreadyReversed(activity_id));
        }
        if activity.lines.is_empty() {
            return Err(UndoError::InvalidParameters("activity has no detail lines"));
        }

        // Inverse pairing comes from the persisted lines in commit order.
        let inverse: Vec<ReclassificationOp> =
            activity.lines.iter().map(|line| line.inverse()).collect();

        if let Err(failure) = submit_sequential(&self.backend, &inverse).await {
            warn!(
                %activity_id,
                succeeded = failure.index,
                lot = %failure.lot_id,
                "undo stopped mid-batch; activity left un-reversed"
            );
            return Ok(UndoOutcome::PartialFailure {
                succeeded: failure.index,
                lot_id: failure.lot_id,
                category_id: failure.category_id,
                message: failure.message,
            });
        }

        self.backend
            .mark_activity_reversed(activity_id, Utc::now(), acting_user)
            .await
            .map_err(|source| UndoError::MarkReversed {
                line_count: inverse.len(),
                source,
            })?;

        info!(%activity_id, lines = inverse.len(), "activity reversed");
        Ok(UndoOutcome::Reversed {
            activity_id,
            line_count: inverse.len(),
        })
    }
}
