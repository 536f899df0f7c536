//! # tr-core
//!
//! Core types, traits, and utilities for Issue Tracker RS.
//!
//! This crate provides the foundational building blocks used across all other crates:
//! - The error taxonomy shared by the workflow engines
//! - Result type aliases
//! - Entity traits (Identifiable, Timestamped, Entity)
//! - Sorting types for list queries
//! - Configuration types

pub mod error;
pub mod result;
pub mod traits;
pub mod types;
pub mod config;

pub use error::*;
pub use result::*;
pub use traits::*;
pub use types::*;
