//! Issue contracts

mod base;
mod create;
mod raise;
mod status;

pub use base::IssueBaseContract;
pub use create::{candidate_role, CreateIssueContract};
pub use raise::RaiseIssueContract;
pub use status::UpdateIssueStatusContract;
