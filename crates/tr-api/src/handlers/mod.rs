//! API handlers

pub mod issues;
pub mod projects;
pub mod qa;
pub mod session;

use serde::Deserialize;

/// Body of the status endpoints
#[derive(Debug, Deserialize)]
pub struct StatusBody {
    pub status: String,
}
