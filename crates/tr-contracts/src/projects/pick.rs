//! Pick contract for projects

use tr_core::error::TrackerError;
use tr_models::{Project, Role};

use crate::base::{Contract, UserContext, ValidationResult};

/// A Developer takes an unpicked project
pub struct PickProjectContract<'a, U: UserContext> {
    user: &'a U,
}

impl<'a, U: UserContext> PickProjectContract<'a, U> {
    pub fn new(user: &'a U) -> Self {
        Self { user }
    }
}

impl<'a, U: UserContext> Contract<Project> for PickProjectContract<'a, U> {
    fn validate(&self, entity: &Project) -> ValidationResult {
        if !self.user.has_role(Role::Developer) {
            return Err(TrackerError::permission_denied(
                "Only developers can pick projects",
            ));
        }

        if entity.is_picked() {
            return Err(TrackerError::condition_failed(
                "This project has already been picked.",
            ));
        }

        Ok(())
    }

    fn is_writable(&self, attribute: &str) -> bool {
        attribute == "picked_by_id"
    }
}
