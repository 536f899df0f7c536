//! # tr-services
//!
//! Project and issue workflow services for Issue Tracker RS.
//!
//! Each service is a short-lived struct holding the acting user and the
//! persistence gateway. `call` runs the contract, writes through the
//! gateway, and returns a `ServiceResult`. User-facing refusals become a
//! failed result; infrastructure errors are returned as `Err`.

pub mod base;
pub mod result;
pub mod projects;
pub mod issues;
pub mod queries;

#[cfg(test)]
pub(crate) mod test_support;

pub use queries::{LandingPage, ProjectDetail, ProjectSummary, QueryService};
pub use result::ServiceResult;

#[cfg(test)]
mod scenarios;
