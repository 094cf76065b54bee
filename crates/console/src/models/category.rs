//! Animal category definitions, fetched per company from the backend.

use serde::{Deserialize, Serialize};

use estancia_core::{AgeBracket, CategoryId, Sex};

/// An animal category as configured for a company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category ID.
    pub id: CategoryId,
    /// Display name (e.g., "Vaquillona", "Novillo").
    pub name: String,
    /// Sex classification.
    pub sex: Sex,
    /// Age bracket.
    pub age: AgeBracket,
}
