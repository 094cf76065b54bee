//! Domain models for the console.
//!
//! Models are split by lifecycle:
//!
//! - [`stock`] - read-only snapshots owned by the backend
//! - [`category`] - animal category definitions owned by the backend
//! - [`plan`] - the in-memory reclassification plan, a pure value type
//! - [`activity`] - the persisted record of a committed batch

pub mod activity;
pub mod category;
pub mod plan;
pub mod stock;

pub use activity::{ActivityLine, ReclassificationActivity};
pub use category::Category;
pub use plan::{BatchHeader, PlanLine, PlanSession, ReclassificationOp, ValidationError};
pub use stock::{LotWithStock, StockLine};
