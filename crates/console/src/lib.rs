//! Estancia Console library.
//!
//! This crate provides the console functionality as a library,
//! allowing it to be tested and reused.
//!
//! # Architecture
//!
//! The console owns no data of record. Every durable fact - stock per lot
//! and category, committed activities, category definitions - lives in the
//! managed relational backend and is reached through [`backend`]. What this
//! crate owns is the in-memory reclassification plan ([`models::plan`]),
//! its validation, and the orchestration of commits and undos against the
//! backend's per-line stored procedures ([`services`]).

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backend;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
