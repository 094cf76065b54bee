//! Reclassification batch submission.

use axum::{Json, extract::State};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use estancia_core::{ActivityId, CategoryId, EstablishmentId, LotId};

use crate::error::AppError;
use crate::middleware::RequireUser;
use crate::models::{BatchHeader, PlanSession};
use crate::services::{CommitOutcome, ReclassificationService, StockSnapshotService};
use crate::state::AppState;

/// One submitted plan line.
///
/// `quantity` arrives as the raw form input; parse-and-clamp semantics are
/// applied server-side against a fresh snapshot, so a stale or tampered
/// value can never exceed available stock.
#[derive(Debug, Deserialize)]
pub struct SubmitLine {
    pub lot_id: LotId,
    pub category_id: CategoryId,
    #[serde(default)]
    pub destination_category_id: Option<CategoryId>,
    pub quantity: String,
    #[serde(default = "default_selected")]
    pub selected: bool,
}

const fn default_selected() -> bool {
    true
}

/// A submitted reclassification batch.
#[derive(Debug, Deserialize)]
pub struct SubmitBatchRequest {
    pub establishment_id: EstablishmentId,
    pub date: NaiveDate,
    pub time: NaiveTime,
    #[serde(default)]
    pub note: Option<String>,
    pub lines: Vec<SubmitLine>,
}

/// Result of a batch submission.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CommitResponse {
    /// All lines committed and the activity was persisted.
    Committed {
        activity_id: ActivityId,
        line_count: usize,
    },
    /// A line failed; `succeeded` lines are applied and the rest were not
    /// attempted. The caller must reconcile or retry the remainder.
    PartialFailure {
        succeeded: usize,
        lot_id: LotId,
        category_id: CategoryId,
        message: String,
    },
}

impl From<CommitOutcome> for CommitResponse {
    fn from(outcome: CommitOutcome) -> Self {
        match outcome {
            CommitOutcome::Committed {
                activity_id,
                line_count,
            } => Self::Committed {
                activity_id,
                line_count,
            },
            CommitOutcome::PartialFailure {
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

/// `POST /api/reclassifications`
///
/// Rebuilds the plan over a fresh snapshot, applies the submitted
/// selections, validates exhaustively, then commits line-by-line.
#[instrument(skip(state, user, request), fields(establishment = %request.establishment_id, lines = request.lines.len()))]
pub async fn submit(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(request): Json<SubmitBatchRequest>,
) -> Result<Json<CommitResponse>, AppError> {
    user.require_reclassify()?;

    let snapshot = StockSnapshotService::new(state.backend().clone())
        .list_lots_with_stock(request.establishment_id)
        .await;

    let header = BatchHeader {
        establishment_id: request.establishment_id,
        user_id: user.id,
        date: request.date,
        time: request.time,
        note: request.note,
    };

    let mut session = PlanSession::from_snapshot(header, &snapshot);
    for line in &request.lines {
        session.toggle_category(line.lot_id, line.category_id, line.selected);
        session.set_quantity(line.lot_id, line.category_id, &line.quantity);
        session.set_destination(line.lot_id, line.category_id, line.destination_category_id);
    }

    let outcome = ReclassificationService::new(state.backend().clone())
        .commit(&session)
        .await?;

    Ok(Json(outcome.into()))
}
