//! Persisted reclassification activities.
//!
//! An activity is the durable record the backend creates after a batch
//! commits in full. Its detail lines mirror commit order, which matters for
//! undo: the inverse pairing comes from what was recorded at commit time,
//! never from a re-derived plan.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use estancia_core::{ActivityId, CategoryId, LotId, UserId};

use super::plan::{BatchHeader, ReclassificationOp};

/// One committed detail line of a reclassification activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityLine {
    /// Lot the animals moved within.
    pub lot_id: LotId,
    /// Category the animals left.
    pub category_from: CategoryId,
    /// Category the animals joined.
    pub category_to: CategoryId,
    /// Heads moved.
    pub quantity: u32,
    /// Average weight per head at commit time.
    pub average_weight: f64,
}

impl ActivityLine {
    /// The inverse operation: animals move back where they came from.
    #[must_use]
    pub const fn inverse(&self) -> ReclassificationOp {
        ReclassificationOp {
            lot_id: self.lot_id,
            source_category: self.category_to,
            destination_category: self.category_from,
            quantity: self.quantity,
            average_weight: self.average_weight,
        }
    }
}

impl From<&ReclassificationOp> for ActivityLine {
    fn from(op: &ReclassificationOp) -> Self {
        Self {
            lot_id: op.lot_id,
            category_from: op.source_category,
            category_to: op.destination_category,
            quantity: op.quantity,
            average_weight: op.average_weight,
        }
    }
}

/// The persisted record of a committed reclassification batch.
///
/// Once `reversed` is true the activity is terminal: it can never be
/// reversed again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReclassificationActivity {
    /// Activity ID assigned by the backend.
    pub id: ActivityId,
    /// Batch header recorded at commit time.
    pub header: BatchHeader,
    /// Detail lines in commit order.
    pub lines: Vec<ActivityLine>,
    /// Whether the activity has been undone.
    pub reversed: bool,
    /// When the activity was undone.
    pub reversed_at: Option<DateTime<Utc>>,
    /// Who undid the activity.
    pub reversed_by: Option<UserId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverse_swaps_categories_only() {
        let line = ActivityLine {
            lot_id: LotId::new(7),
            category_from: CategoryId::new(3),
            category_to: CategoryId::new(5),
            quantity: 10,
            average_weight: 250.0,
        };

        let inverse = line.inverse();
        assert_eq!(inverse.lot_id, LotId::new(7));
        assert_eq!(inverse.source_category, CategoryId::new(5));
        assert_eq!(inverse.destination_category, CategoryId::new(3));
        assert_eq!(inverse.quantity, 10);
        assert!((inverse.average_weight - 250.0).abs() < f64::EPSILON);
    }
}
