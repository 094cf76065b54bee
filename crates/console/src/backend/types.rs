//! Wire payloads for the backend RPC endpoints.
//!
//! These mirror the stored procedures' JSON contracts and convert into the
//! domain models; handlers and services never see them.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use estancia_core::{
    ActivityId, AgeBracket, CategoryId, CompanyId, EstablishmentId, LotId, PaddockId, Sex, UserId,
};

use crate::models::{
    ActivityLine, BatchHeader, Category, LotWithStock, ReclassificationActivity,
    ReclassificationOp, StockLine,
};

/// `rpc/lots_with_stock` request.
#[derive(Debug, Serialize)]
pub struct LotsWithStockRequest {
    pub establishment_id: EstablishmentId,
}

/// `rpc/lots_with_stock` response.
#[derive(Debug, Deserialize)]
pub struct LotsWithStockResponse {
    pub lots: Vec<LotPayload>,
}

/// One lot as returned by the backend.
#[derive(Debug, Deserialize)]
pub struct LotPayload {
    pub lot_id: LotId,
    pub name: String,
    #[serde(default)]
    pub paddock_id: Option<PaddockId>,
    #[serde(default)]
    pub inactive: bool,
    pub stock_lines: Vec<StockLinePayload>,
}

/// One stock line as returned by the backend.
#[derive(Debug, Deserialize)]
pub struct StockLinePayload {
    pub category_id: CategoryId,
    pub head_count: u32,
    pub total_weight: f64,
}

impl From<LotPayload> for LotWithStock {
    fn from(payload: LotPayload) -> Self {
        let stock = payload
            .stock_lines
            .into_iter()
            .map(|line| StockLine {
                lot_id: payload.lot_id,
                category_id: line.category_id,
                head_count: line.head_count,
                total_weight: line.total_weight,
            })
            .collect();

        Self {
            id: payload.lot_id,
            name: payload.name,
            paddock_id: payload.paddock_id,
            inactive: payload.inactive,
            stock,
        }
    }
}

/// `rpc/categories_for_company` request.
#[derive(Debug, Serialize)]
pub struct CategoriesRequest {
    pub company_id: CompanyId,
}

/// `rpc/categories_for_company` response.
#[derive(Debug, Deserialize)]
pub struct CategoriesResponse {
    pub categories: Vec<CategoryPayload>,
}

/// One category as returned by the backend.
#[derive(Debug, Deserialize)]
pub struct CategoryPayload {
    pub id: CategoryId,
    pub name: String,
    pub sex: Sex,
    pub age: AgeBracket,
}

impl From<CategoryPayload> for Category {
    fn from(payload: CategoryPayload) -> Self {
        Self {
            id: payload.id,
            name: payload.name,
            sex: payload.sex,
            age: payload.age,
        }
    }
}

/// `rpc/reclassify_lot_category` request - one line per invocation.
#[derive(Debug, Serialize)]
pub struct CommitLineRequest {
    pub lot_id: LotId,
    pub source_category_id: CategoryId,
    pub destination_category_id: CategoryId,
    pub quantity: u32,
    pub average_weight: f64,
}

impl From<&ReclassificationOp> for CommitLineRequest {
    fn from(op: &ReclassificationOp) -> Self {
        Self {
            lot_id: op.lot_id,
            source_category_id: op.source_category,
            destination_category_id: op.destination_category,
            quantity: op.quantity,
            average_weight: op.average_weight,
        }
    }
}

/// Status payload returned by mutating procedures.
#[derive(Debug, Deserialize)]
pub struct RpcStatus {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// `rpc/register_reclassification_activity` request.
#[derive(Debug, Serialize)]
pub struct PersistActivityRequest {
    pub establishment_id: EstablishmentId,
    pub user_id: UserId,
    pub date: NaiveDate,
    pub time: NaiveTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub detail_lines: Vec<CommitLineRequest>,
}

impl PersistActivityRequest {
    /// Build the request from a batch header and its committed operations.
    #[must_use]
    pub fn new(header: &BatchHeader, lines: &[ReclassificationOp]) -> Self {
        Self {
            establishment_id: header.establishment_id,
            user_id: header.user_id,
            date: header.date,
            time: header.time,
            note: header.note.clone(),
            detail_lines: lines.iter().map(CommitLineRequest::from).collect(),
        }
    }
}

/// `rpc/register_reclassification_activity` response.
#[derive(Debug, Deserialize)]
pub struct PersistActivityResponse {
    pub activity_id: ActivityId,
}

/// `rpc/reclassification_activity_detail` request.
#[derive(Debug, Serialize)]
pub struct ActivityDetailRequest {
    pub activity_id: ActivityId,
}

/// `rpc/reclassification_activity_detail` response.
#[derive(Debug, Deserialize)]
pub struct ActivityDetailResponse {
    pub activity_id: ActivityId,
    pub establishment_id: EstablishmentId,
    pub user_id: UserId,
    pub date: NaiveDate,
    pub time: NaiveTime,
    #[serde(default)]
    pub note: Option<String>,
    pub detail_lines: Vec<ActivityLinePayload>,
    #[serde(default)]
    pub reversed: bool,
    #[serde(default)]
    pub reversed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub reversed_by_user_id: Option<UserId>,
}

/// One persisted detail line as returned by the backend.
#[derive(Debug, Deserialize)]
pub struct ActivityLinePayload {
    pub lot_id: LotId,
    pub category_from: CategoryId,
    pub category_to: CategoryId,
    pub quantity: u32,
    pub average_weight: f64,
}

impl From<ActivityDetailResponse> for ReclassificationActivity {
    fn from(payload: ActivityDetailResponse) -> Self {
        Self {
            id: payload.activity_id,
            header: BatchHeader {
                establishment_id: payload.establishment_id,
                user_id: payload.user_id,
                date: payload.date,
                time: payload.time,
                note: payload.note,
            },
            lines: payload
                .detail_lines
                .into_iter()
                .map(|line| ActivityLine {
                    lot_id: line.lot_id,
                    category_from: line.category_from,
                    category_to: line.category_to,
                    quantity: line.quantity,
                    average_weight: line.average_weight,
                })
                .collect(),
            reversed: payload.reversed,
            reversed_at: payload.reversed_at,
            reversed_by: payload.reversed_by_user_id,
        }
    }
}

/// `rpc/mark_activity_reversed` request.
#[derive(Debug, Serialize)]
pub struct MarkReversedRequest {
    pub activity_id: ActivityId,
    pub reversed_at: DateTime<Utc>,
    pub reversed_by_user_id: UserId,
}
