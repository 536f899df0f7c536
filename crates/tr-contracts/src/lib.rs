//! # tr-contracts
//!
//! Authorization and validation contracts for Issue Tracker RS.
//!
//! Contracts decide whether an actor may perform an operation and whether
//! the submitted data is acceptable, before anything is written. Permission
//! failures and invalid input are reported as distinct `TrackerError` kinds.

pub mod base;
pub mod projects;
pub mod issues;

pub use base::*;
