//! # tr-api
//!
//! JSON HTTP API for Issue Tracker RS.
//!
//! Every route maps onto one workflow or query operation. Callers identify
//! themselves with a bearer JWT; the body of every response is the
//! operation's result object.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod routes;

pub use extractors::AppState;
pub use routes::router;

#[cfg(test)]
mod tests;
