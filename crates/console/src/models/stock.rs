//! Stock snapshot models.
//!
//! Stock is owned exclusively by the backend; these types are read-only
//! views fetched at the start of a planning session and never cached across
//! a commit boundary.

use serde::{Deserialize, Serialize};

use estancia_core::{CategoryId, LotId, PaddockId};

/// Available animals of one category within one lot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockLine {
    /// Lot holding the animals.
    pub lot_id: LotId,
    /// Animal category.
    pub category_id: CategoryId,
    /// Head count (never negative).
    pub head_count: u32,
    /// Total live weight in kilograms (never negative).
    pub total_weight: f64,
}

impl StockLine {
    /// Average weight per head, or 0 when the line is empty.
    #[must_use]
    pub fn average_weight(&self) -> f64 {
        if self.head_count == 0 {
            0.0
        } else {
            self.total_weight / f64::from(self.head_count)
        }
    }
}

/// A lot together with its current stock composition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LotWithStock {
    /// Lot ID.
    pub id: LotId,
    /// Lot display name.
    pub name: String,
    /// Paddock the lot currently grazes, if assigned.
    pub paddock_id: Option<PaddockId>,
    /// Inactive lots are excluded from planning.
    pub inactive: bool,
    /// Stock lines, sorted by category ID ascending.
    pub stock: Vec<StockLine>,
}

impl LotWithStock {
    /// Whether the lot has at least one line with animals present.
    #[must_use]
    pub fn has_available_stock(&self) -> bool {
        self.stock.iter().any(|line| line.head_count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_weight() {
        let line = StockLine {
            lot_id: LotId::new(1),
            category_id: CategoryId::new(2),
            head_count: 20,
            total_weight: 4000.0,
        };
        assert!((line.average_weight() - 200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_average_weight_empty_line() {
        let line = StockLine {
            lot_id: LotId::new(1),
            category_id: CategoryId::new(2),
            head_count: 0,
            total_weight: 0.0,
        };
        assert!((line.average_weight() - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_has_available_stock() {
        let mut lot = LotWithStock {
            id: LotId::new(1),
            name: "Lote Norte".to_string(),
            paddock_id: None,
            inactive: false,
            stock: vec![StockLine {
                lot_id: LotId::new(1),
                category_id: CategoryId::new(2),
                head_count: 0,
                total_weight: 0.0,
            }],
        };
        assert!(!lot.has_available_stock());

        lot.stock.push(StockLine {
            lot_id: LotId::new(1),
            category_id: CategoryId::new(3),
            head_count: 5,
            total_weight: 1100.0,
        });
        assert!(lot.has_available_stock());
    }
}
