//! Delete contract for projects

use tr_core::error::TrackerError;
use tr_models::Project;

use super::base::can_manage;
use crate::base::{Contract, UserContext, ValidationResult};

/// Contract for deleting a project together with its issues
pub struct DeleteProjectContract<'a, U: UserContext> {
    user: &'a U,
}

impl<'a, U: UserContext> DeleteProjectContract<'a, U> {
    pub fn new(user: &'a U) -> Self {
        Self { user }
    }
}

impl<'a, U: UserContext> Contract<Project> for DeleteProjectContract<'a, U> {
    fn validate(&self, entity: &Project) -> ValidationResult {
        if can_manage(self.user, entity) {
            Ok(())
        } else {
            Err(TrackerError::permission_denied(
                "You are not authorized to delete this project",
            ))
        }
    }
}
