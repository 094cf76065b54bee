//! Client for the managed relational backend.
//!
//! Every durable mutation in the system is a stored procedure on the
//! backend, exposed over PostgREST-style HTTP RPC endpoints. This module
//! treats the backend as opaque: it owns stock truth and per-line
//! transactionality; the console never compensates or retries on its own.
//!
//! # Architecture
//!
//! - [`ReclassificationBackend`] - the logical operations the console
//!   depends on, implemented by [`BackendClient`] over HTTP and by scripted
//!   fakes in tests
//! - [`types`] - wire payloads, separate from the domain models

mod client;
pub mod types;

pub use client::BackendClient;

use estancia_core::{ActivityId, CompanyId, EstablishmentId, UserId};

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::{
    BatchHeader, Category, LotWithStock, ReclassificationActivity, ReclassificationOp,
};

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP transport failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Service key rejected.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// A stored procedure reported failure (e.g., insufficient stock).
    #[error("procedure error: {0}")]
    Rpc(String),
}

/// The logical backend operations the reclassification workflow consumes.
///
/// One implementation speaks HTTP ([`BackendClient`]); tests substitute
/// in-memory fakes. No method retries automatically; the caller owns the
/// fail-fast policy.
#[allow(async_fn_in_trait)]
pub trait ReclassificationBackend {
    /// Fetch lots with their current stock composition for an establishment.
    async fn fetch_lots_with_stock(
        &self,
        establishment_id: EstablishmentId,
    ) -> Result<Vec<LotWithStock>, BackendError>;

    /// Fetch the animal categories configured for a company.
    async fn fetch_categories(&self, company_id: CompanyId)
    -> Result<Vec<Category>, BackendError>;

    /// Execute one reclassification operation.
    ///
    /// The backend is the unit of atomicity for this single line: on `Ok`
    /// the stock mutation is durable, on `Err` nothing changed.
    async fn commit_reclassification_line(
        &self,
        op: &ReclassificationOp,
    ) -> Result<(), BackendError>;

    /// Persist the activity record for a fully committed batch.
    async fn persist_activity(
        &self,
        header: &BatchHeader,
        lines: &[ReclassificationOp],
    ) -> Result<ActivityId, BackendError>;

    /// Fetch a persisted activity with its detail lines.
    async fn fetch_activity(
        &self,
        activity_id: ActivityId,
    ) -> Result<ReclassificationActivity, BackendError>;

    /// Mark an activity as reversed with an audit timestamp and actor.
    async fn mark_activity_reversed(
        &self,
        activity_id: ActivityId,
        reversed_at: DateTime<Utc>,
        reversed_by: UserId,
    ) -> Result<(), BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_display() {
        let err = BackendError::NotFound("activity 12".to_string());
        assert_eq!(err.to_string(), "not found: activity 12");

        let err = BackendError::Rpc("stock insuficiente".to_string());
        assert_eq!(err.to_string(), "procedure error: stock insuficiente");
    }
}
