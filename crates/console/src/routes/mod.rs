//! HTTP route handlers for the console.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                                 - Liveness check
//! GET  /health/ready                           - Readiness check (pings backend)
//!
//! # Stock (read from backend)
//! GET  /api/establishments/{id}/stock          - Snapshot for planning
//! GET  /api/categories/{id}/destinations       - Sex-axis filtered choices
//!
//! # Reclassification
//! POST /api/reclassifications                  - Validate and commit a batch
//!
//! # Activities
//! GET  /api/activities/{id}                    - Persisted activity detail
//! POST /api/activities/{id}/undo               - Undo a committed activity
//! ```
//!
//! Every `/api` handler requires an authenticated user via
//! [`crate::middleware::RequireUser`]; mutating handlers additionally gate
//! on `can_reclassify`.

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

pub mod activities;
pub mod reclassification;
pub mod stock;

/// Build the console router.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Stock
        .route(
            "/api/establishments/{id}/stock",
            get(stock::establishment_stock),
        )
        .route(
            "/api/categories/{id}/destinations",
            get(stock::destination_choices),
        )
        // Reclassification
        .route("/api/reclassifications", post(reclassification::submit))
        // Activities
        .route("/api/activities/{id}", get(activities::detail))
        .route("/api/activities/{id}/undo", post(activities::undo))
}
