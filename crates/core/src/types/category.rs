//! Animal category classifications.
//!
//! Categories classify animals along two axes: sex and age bracket. A
//! reclassification may move animals across age brackets but never across
//! the sex axis, so [`Sex`] equality is the gate for destination choices.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sex classification of an animal category.
///
/// Serialized with the Spanish labels the backend uses (`HEMBRA`/`MACHO`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sex {
    /// Female (hembra).
    Hembra,
    /// Male (macho).
    Macho,
}

impl Sex {
    /// Whether two categories sit on the same sex axis.
    #[must_use]
    pub const fn same_axis(self, other: Self) -> bool {
        matches!(
            (self, other),
            (Self::Hembra, Self::Hembra) | (Self::Macho, Self::Macho)
        )
    }
}

impl std::fmt::Display for Sex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hembra => write!(f, "HEMBRA"),
            Self::Macho => write!(f, "MACHO"),
        }
    }
}

impl std::str::FromStr for Sex {
    type Err = SexParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "HEMBRA" => Ok(Self::Hembra),
            "MACHO" => Ok(Self::Macho),
            other => Err(SexParseError(other.to_string())),
        }
    }
}

/// Error returned when a sex label is not recognized.
#[derive(Debug, Error)]
#[error("unknown sex classification: {0}")]
pub struct SexParseError(pub String);

/// Age bracket of an animal category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgeBracket {
    /// Calves (terneros/terneras).
    Calf,
    /// Young stock (novillos/vaquillonas).
    Young,
    /// Adult stock (vacas/toros).
    Adult,
}
