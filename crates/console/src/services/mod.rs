//! Workflow services for the console.
//!
//! - [`stock`] - stock snapshot provider (pure reads, degrade-to-empty)
//! - [`reclassification`] - batch commit orchestrator (sequential,
//!   fail-fast, no compensation)
//! - [`undo`] - undo coordinator (inverse batch through the same commit
//!   path, reversed mark only after full success)

pub mod reclassification;
pub mod stock;
pub mod undo;

pub use reclassification::{CommitError, CommitOutcome, ReclassificationService};
pub use stock::StockSnapshotService;
pub use undo::{UndoCoordinator, UndoError, UndoOutcome};
