//! Status contract for issues

use tr_core::error::TrackerError;
use tr_models::Issue;

use crate::base::{Contract, UserContext, ValidationResult};

/// Only the assignee may change an issue's status
pub struct UpdateIssueStatusContract<'a, U: UserContext> {
    user: &'a U,
}

impl<'a, U: UserContext> UpdateIssueStatusContract<'a, U> {
    pub fn new(user: &'a U) -> Self {
        Self { user }
    }
}

impl<'a, U: UserContext> Contract<Issue> for UpdateIssueStatusContract<'a, U> {
    fn validate(&self, entity: &Issue) -> ValidationResult {
        if entity.is_assigned_to(self.user.id()) {
            Ok(())
        } else {
            Err(TrackerError::permission_denied(
                "You are not authorized to update the status of this issue",
            ))
        }
    }

    fn is_writable(&self, attribute: &str) -> bool {
        attribute == "status"
    }
}
