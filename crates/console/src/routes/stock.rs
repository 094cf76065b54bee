//! Stock snapshot route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use estancia_core::{CategoryId, CompanyId, EstablishmentId};

use crate::middleware::RequireUser;
use crate::models::{Category, LotWithStock};
use crate::services::stock::{StockSnapshotService, destination_categories};
use crate::state::AppState;

/// Query parameters for destination choices.
#[derive(Debug, Deserialize)]
pub struct DestinationQuery {
    /// Company whose category catalogue applies.
    pub company_id: CompanyId,
}

/// `GET /api/establishments/{id}/stock`
///
/// Fresh snapshot for a planning session. Backend failure degrades to an
/// empty list so the UI shows "no data" instead of an error page.
#[instrument(skip(state, _user))]
pub async fn establishment_stock(
    State(state): State<AppState>,
    RequireUser(_user): RequireUser,
    Path(establishment_id): Path<EstablishmentId>,
) -> Json<Vec<LotWithStock>> {
    let service = StockSnapshotService::new(state.backend().clone());
    Json(service.list_lots_with_stock(establishment_id).await)
}

/// `GET /api/categories/{id}/destinations?company_id=N`
///
/// Destination choices for a reclassification from the given category:
/// same sex axis, source excluded.
#[instrument(skip(state, _user))]
pub async fn destination_choices(
    State(state): State<AppState>,
    RequireUser(_user): RequireUser,
    Path(category_id): Path<CategoryId>,
    Query(query): Query<DestinationQuery>,
) -> Json<Vec<Category>> {
    let service = StockSnapshotService::new(state.backend().clone());
    let categories = service.list_categories(query.company_id).await;
    Json(destination_categories(&categories, category_id))
}
