//! Core types for Estancia.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod category;
pub mod id;

pub use category::{AgeBracket, Sex, SexParseError};
pub use id::*;
