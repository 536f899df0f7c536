//! Project contracts
//!
//! One contract per project workflow operation. Permission is checked
//! before any field validation runs.

mod base;
mod create;
mod update;
mod delete;
mod pick;
mod status;
mod testing;

pub use base::{can_manage, ProjectBaseContract};
pub use create::CreateProjectContract;
pub use update::UpdateProjectContract;
pub use delete::DeleteProjectContract;
pub use pick::PickProjectContract;
pub use status::UpdateProjectStatusContract;
pub use testing::{QaPickProjectContract, StartTestingContract};
