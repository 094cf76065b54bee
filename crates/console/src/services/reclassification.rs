//! Batch commit orchestrator.
//!
//! Lines commit strictly one at a time, in presentation order, because the
//! backend procedure mutates shared stock state and concurrent calls
//! against the same lot/category could race. The first failure stops the
//! batch; already-committed lines are left as-is. A compensating move is
//! itself a reclassification subject to the same stock invariants, so
//! automatic rollback is deliberately not attempted.

use thiserror::Error;
use tracing::{info, instrument};

use estancia_core::{ActivityId, CategoryId, LotId};

use crate::backend::{BackendError, ReclassificationBackend};
use crate::models::{PlanSession, ReclassificationOp, ValidationError};

/// Identity and cause of the line that stopped a batch.
#[derive(Debug)]
pub struct LineFailure {
    /// Zero-based position of the failed line; equals the count of lines
    /// that committed before it.
    pub index: usize,
    /// Lot of the failed line.
    pub lot_id: LotId,
    /// Source category of the failed line.
    pub category_id: CategoryId,
    /// Backend error message.
    pub message: String,
}

/// Outcome of a batch commit.
#[derive(Debug)]
pub enum CommitOutcome {
    /// Every line committed and the activity record was persisted.
    Committed {
        /// Activity ID assigned by the backend.
        activity_id: ActivityId,
        /// Number of committed lines.
        line_count: usize,
    },
    /// A line failed; earlier lines are applied, later ones not attempted.
    PartialFailure {
        /// Lines committed before the failure.
        succeeded: usize,
        /// Lot of the failing line.
        lot_id: LotId,
        /// Source category of the failing line.
        category_id: CategoryId,
        /// Backend error message for the failing line.
        message: String,
    },
}

/// Errors that prevent or follow a commit attempt.
#[derive(Debug, Error)]
pub enum CommitError {
    /// The plan failed pre-submit validation; nothing was submitted.
    #[error("batch failed validation with {} error(s)", .0.len())]
    Validation(Vec<ValidationError>),

    /// Every line committed but the activity record could not be persisted.
    ///
    /// Stock has moved; the ledger entry is missing. Surfaced distinctly so
    /// the operator can reconcile by hand.
    #[error("activity not persisted after {committed} committed line(s): {source}")]
    Persist {
        committed: usize,
        #[source]
        source: BackendError,
    },
}

/// Orchestrates the submission of a validated plan to the backend.
pub struct ReclassificationService<B> {
    backend: B,
}

impl<B: ReclassificationBackend> ReclassificationService<B> {
    /// Create a new service over a backend.
    pub const fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Validate and commit a plan.
    ///
    /// Selected lines are submitted sequentially in presentation order; the
    /// first backend failure stops the batch and is reported as
    /// [`CommitOutcome::PartialFailure`]. On full success the activity
    /// record is persisted and its ID returned.
    ///
    /// # Errors
    ///
    /// [`CommitError::Validation`] if the plan fails pre-submit checks
    /// (no lines submitted), [`CommitError::Persist`] if all lines
    /// committed but the activity record could not be written.
    #[instrument(skip(self, session), fields(establishment = %session.header().establishment_id))]
    pub async fn commit(&self, session: &PlanSession) -> Result<CommitOutcome, CommitError> {
        let errors = session.validate();
        if !errors.is_empty() {
            return Err(CommitError::Validation(errors));
        }

        let ops = session.ops();
        if let Err(failure) = submit_sequential(&self.backend, &ops).await {
            return Ok(CommitOutcome::PartialFailure {
                succeeded: failure.index,
                lot_id: failure.lot_id,
                category_id: failure.category_id,
                message: failure.message,
            });
        }

        let activity_id = self
            .backend
            .persist_activity(session.header(), &ops)
            .await
            .map_err(|source| CommitError::Persist {
                committed: ops.len(),
                source,
            })?;

        info!(%activity_id, lines = ops.len(), "reclassification batch committed");
        Ok(CommitOutcome::Committed {
            activity_id,
            line_count: ops.len(),
        })
    }
}

/// Submit operations one-by-one, stopping at the first failure.
///
/// Shared by commit and undo so both take the exact same path to the
/// backend. Each call must complete before the next line is attempted.
pub(crate) async fn submit_sequential<B: ReclassificationBackend>(
    backend: &B,
    ops: &[ReclassificationOp],
) -> Result<(), LineFailure> {
    for (index, op) in ops.iter().enumerate() {
        if let Err(e) = backend.commit_reclassification_line(op).await {
            return Err(LineFailure {
                index,
                lot_id: op.lot_id,
                category_id: op.source_category,
                message: e.to_string(),
            });
        }
    }
    Ok(())
}
