//! Estancia Core - Shared types library.
//!
//! This crate provides common types used across all Estancia components:
//! - `console` - The web-based management console for livestock operations
//! - `integration-tests` - Cross-crate workflow tests
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and domain classifications

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
