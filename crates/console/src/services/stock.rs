//! Stock snapshot provider.
//!
//! Pure reads against the backend. A failed fetch is surfaced as a warning
//! and an empty list so the UI renders "no data" instead of crashing; every
//! planning session re-fetches a fresh snapshot rather than reusing one
//! across a commit boundary.

use tracing::{instrument, warn};

use estancia_core::{CategoryId, CompanyId, EstablishmentId};

use crate::backend::ReclassificationBackend;
use crate::models::{Category, LotWithStock};

/// Read-only provider of stock snapshots and category listings.
pub struct StockSnapshotService<B> {
    backend: B,
}

impl<B: ReclassificationBackend> StockSnapshotService<B> {
    /// Create a new snapshot service over a backend.
    pub const fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Active lots with at least one non-empty stock line.
    ///
    /// Lots are sorted by lot ID ascending and each lot's lines by category
    /// ID ascending. Backend failure degrades to an empty list.
    #[instrument(skip(self))]
    pub async fn list_lots_with_stock(
        &self,
        establishment_id: EstablishmentId,
    ) -> Vec<LotWithStock> {
        let mut lots = match self.backend.fetch_lots_with_stock(establishment_id).await {
            Ok(lots) => lots,
            Err(e) => {
                warn!(error = %e, %establishment_id, "stock snapshot fetch failed, returning empty");
                return Vec::new();
            }
        };

        lots.retain(|lot| !lot.inactive && lot.has_available_stock());
        for lot in &mut lots {
            lot.stock.retain(|line| line.head_count > 0);
            lot.stock.sort_by_key(|line| line.category_id);
        }
        lots.sort_by_key(|lot| lot.id);
        lots
    }

    /// Categories configured for a company.
    ///
    /// Backend failure degrades to an empty list, same as the snapshot.
    #[instrument(skip(self))]
    pub async fn list_categories(&self, company_id: CompanyId) -> Vec<Category> {
        match self.backend.fetch_categories(company_id).await {
            Ok(categories) => categories,
            Err(e) => {
                warn!(error = %e, %company_id, "category fetch failed, returning empty");
                Vec::new()
            }
        }
    }
}

/// Destination choices for a reclassification from `source`.
///
/// Only categories on the same sex axis qualify, and the source itself is
/// excluded, so a reclassification can never silently change an animal's
/// recorded sex. An unknown source yields no choices.
#[must_use]
pub fn destination_categories(categories: &[Category], source: CategoryId) -> Vec<Category> {
    let Some(source_category) = categories.iter().find(|c| c.id == source) else {
        return Vec::new();
    };

    categories
        .iter()
        .filter(|c| c.id != source && c.sex.same_axis(source_category.sex))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use estancia_core::{AgeBracket, Sex};

    fn category(id: i32, name: &str, sex: Sex, age: AgeBracket) -> Category {
        Category {
            id: CategoryId::new(id),
            name: name.to_string(),
            sex,
            age,
        }
    }

    fn herd() -> Vec<Category> {
        vec![
            category(1, "Ternera", Sex::Hembra, AgeBracket::Calf),
            category(2, "Vaquillona", Sex::Hembra, AgeBracket::Young),
            category(3, "Vaca", Sex::Hembra, AgeBracket::Adult),
            category(4, "Ternero", Sex::Macho, AgeBracket::Calf),
            category(5, "Novillo", Sex::Macho, AgeBracket::Young),
            category(6, "Toro", Sex::Macho, AgeBracket::Adult),
        ]
    }

    #[test]
    fn test_destinations_stay_on_sex_axis() {
        let destinations = destination_categories(&herd(), CategoryId::new(2));
        let ids: Vec<i32> = destinations.iter().map(|c| c.id.as_i32()).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(destinations.iter().all(|c| c.sex == Sex::Hembra));
    }

    #[test]
    fn test_destinations_exclude_source() {
        let destinations = destination_categories(&herd(), CategoryId::new(5));
        assert!(destinations.iter().all(|c| c.id != CategoryId::new(5)));
        assert!(destinations.iter().all(|c| c.sex == Sex::Macho));
    }

    #[test]
    fn test_destinations_unknown_source_is_empty() {
        assert!(destination_categories(&herd(), CategoryId::new(99)).is_empty());
    }
}
