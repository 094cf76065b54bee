//! The in-memory reclassification plan.
//!
//! A [`PlanSession`] is a pure value type built from a fresh stock snapshot.
//! It is never a cache of server truth: nothing here mutates stock, and the
//! plan is discarded on cancel or after a successful submit. Quantities are
//! clamped against the snapshot at edit time so the common over-stock case
//! is caught before the backend ever sees it; concurrent-modification races
//! remain the backend's to reject.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use estancia_core::{CategoryId, EstablishmentId, LotId, UserId};

use super::stock::LotWithStock;

/// Header fields shared by a submitted batch and its persisted activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchHeader {
    /// Establishment the batch belongs to.
    pub establishment_id: EstablishmentId,
    /// User submitting the batch.
    pub user_id: UserId,
    /// Activity date.
    pub date: NaiveDate,
    /// Activity time.
    pub time: NaiveTime,
    /// Free-form note.
    pub note: Option<String>,
}

/// One planned reclassification line, tied to a stock line at plan time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanLine {
    /// Source lot.
    pub lot_id: LotId,
    /// Source category.
    pub category_id: CategoryId,
    /// Destination category, unset until the user picks one.
    pub destination: Option<CategoryId>,
    /// Heads to move, always within `[0, available]`.
    pub quantity: u32,
    /// Heads available in the source stock line at plan time.
    pub available: u32,
    /// Average weight per head carried from the stock line at plan time.
    pub average_weight: f64,
    /// Unselected lines are excluded from commit.
    pub selected: bool,
}

/// A single reclassification operation as submitted to the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReclassificationOp {
    /// Lot the animals move within.
    pub lot_id: LotId,
    /// Category the animals leave.
    pub source_category: CategoryId,
    /// Category the animals join.
    pub destination_category: CategoryId,
    /// Heads to move.
    pub quantity: u32,
    /// Average weight per head.
    pub average_weight: f64,
}

/// A validation failure for the plan as a whole or for one line.
///
/// `validate` collects every failing line so the user corrects everything
/// in one pass; checks are never short-circuited.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationError {
    /// No line is selected at all.
    #[error("no lines selected")]
    NoLinesSelected,
    /// A selected line has quantity zero.
    #[error("lot {lot_id}, category {category_id}: selected with zero quantity")]
    ZeroQuantitySelected {
        lot_id: LotId,
        category_id: CategoryId,
    },
    /// A selected line with quantity > 0 has no destination category.
    #[error("lot {lot_id}, category {category_id}: destination category missing")]
    MissingDestination {
        lot_id: LotId,
        category_id: CategoryId,
    },
    /// A selected line points back at its own source category.
    #[error("lot {lot_id}, category {category_id}: destination equals source")]
    DestinationSameAsSource {
        lot_id: LotId,
        category_id: CategoryId,
    },
}

/// An in-progress reclassification plan over a stock snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanSession {
    header: BatchHeader,
    lines: Vec<PlanLine>,
}

impl PlanSession {
    /// Begin a planning session over a fresh stock snapshot.
    ///
    /// One plan line is created per stock line with animals present, in the
    /// order the snapshot presents them (lots ascending, categories
    /// ascending within a lot). Inactive lots and empty lines are skipped.
    #[must_use]
    pub fn from_snapshot(header: BatchHeader, lots: &[LotWithStock]) -> Self {
        let lines = lots
            .iter()
            .filter(|lot| !lot.inactive)
            .flat_map(|lot| lot.stock.iter())
            .filter(|line| line.head_count > 0)
            .map(|line| PlanLine {
                lot_id: line.lot_id,
                category_id: line.category_id,
                destination: None,
                quantity: 0,
                available: line.head_count,
                average_weight: line.average_weight(),
                selected: false,
            })
            .collect();

        Self { header, lines }
    }

    /// The batch header.
    #[must_use]
    pub const fn header(&self) -> &BatchHeader {
        &self.header
    }

    /// All plan lines in presentation order.
    #[must_use]
    pub fn lines(&self) -> &[PlanLine] {
        &self.lines
    }

    /// Select or deselect every line of a lot.
    ///
    /// Selecting takes the whole lot: every line's quantity is set to its
    /// full available head count. Deselecting zeroes all quantities.
    pub fn toggle_lot(&mut self, lot_id: LotId, checked: bool) {
        for line in self.lines.iter_mut().filter(|l| l.lot_id == lot_id) {
            line.selected = checked;
            line.quantity = if checked { line.available } else { 0 };
        }
    }

    /// Select or deselect a single category line within a lot.
    ///
    /// Same semantics as [`Self::toggle_lot`] at line granularity.
    pub fn toggle_category(&mut self, lot_id: LotId, category_id: CategoryId, checked: bool) {
        if let Some(line) = self.line_mut(lot_id, category_id) {
            line.selected = checked;
            line.quantity = if checked { line.available } else { 0 };
        }
    }

    /// Set a line's quantity from raw user input.
    ///
    /// Non-numeric input leaves the line unchanged; a parsed value is
    /// clamped to `[0, available]`. Unknown (lot, category) pairs are
    /// ignored.
    pub fn set_quantity(&mut self, lot_id: LotId, category_id: CategoryId, raw: &str) {
        let Ok(value) = raw.trim().parse::<i64>() else {
            return;
        };
        if let Some(line) = self.line_mut(lot_id, category_id) {
            #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
            {
                line.quantity = value.clamp(0, i64::from(line.available)) as u32;
            }
        }
    }

    /// Record a line's destination category.
    ///
    /// No validation happens here; it is deferred to [`Self::validate`].
    pub fn set_destination(
        &mut self,
        lot_id: LotId,
        category_id: CategoryId,
        destination: Option<CategoryId>,
    ) {
        if let Some(line) = self.line_mut(lot_id, category_id) {
            line.destination = destination;
        }
    }

    /// Validate the plan for submission, collecting every failure.
    #[must_use]
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        let selected: Vec<&PlanLine> = self.lines.iter().filter(|l| l.selected).collect();
        if selected.is_empty() {
            errors.push(ValidationError::NoLinesSelected);
        }

        for line in &selected {
            if line.quantity == 0 {
                errors.push(ValidationError::ZeroQuantitySelected {
                    lot_id: line.lot_id,
                    category_id: line.category_id,
                });
            }
            if line.quantity > 0 {
                match line.destination {
                    None => errors.push(ValidationError::MissingDestination {
                        lot_id: line.lot_id,
                        category_id: line.category_id,
                    }),
                    Some(dest) if dest == line.category_id => {
                        errors.push(ValidationError::DestinationSameAsSource {
                            lot_id: line.lot_id,
                            category_id: line.category_id,
                        });
                    }
                    Some(_) => {}
                }
            }
        }

        errors
    }

    /// The operations a commit would submit, in presentation order.
    ///
    /// Only meaningful after [`Self::validate`] returned no errors; lines
    /// that would fail validation are skipped here.
    #[must_use]
    pub fn ops(&self) -> Vec<ReclassificationOp> {
        self.lines
            .iter()
            .filter(|l| l.selected && l.quantity > 0)
            .filter_map(|l| {
                let destination = l.destination.filter(|&d| d != l.category_id)?;
                Some(ReclassificationOp {
                    lot_id: l.lot_id,
                    source_category: l.category_id,
                    destination_category: destination,
                    quantity: l.quantity,
                    average_weight: l.average_weight,
                })
            })
            .collect()
    }

    fn line_mut(&mut self, lot_id: LotId, category_id: CategoryId) -> Option<&mut PlanLine> {
        self.lines
            .iter_mut()
            .find(|l| l.lot_id == lot_id && l.category_id == category_id)
    }
}
