//! Create contract for issues

use tr_core::error::TrackerError;
use tr_core::traits::Id;
use tr_models::{CreateIssueDto, Role};

use super::base::IssueBaseContract;
use crate::base::{Contract, UserContext, ValidationResult};

/// Group the assignee must belong to when this user creates an issue.
///
/// QA members may only hand issues to Developers; everybody else may pick
/// any active user.
pub fn candidate_role<U: UserContext>(user: &U) -> Option<Role> {
    user.has_role(Role::Qa).then_some(Role::Developer)
}

/// Contract for creating an issue through the issue form
pub struct CreateIssueContract<'a, U: UserContext> {
    user: &'a U,
    candidates: &'a [Id],
}

impl<'a, U: UserContext> CreateIssueContract<'a, U> {
    /// `candidates` are the ids the assignee may be chosen from
    pub fn new(user: &'a U, candidates: &'a [Id]) -> Self {
        Self { user, candidates }
    }

    /// QA members and Managers may create issues
    pub fn user_allowed(&self) -> bool {
        self.user.has_role(Role::Qa) || self.user.has_role(Role::Manager)
    }
}

impl<'a, U: UserContext> Contract<CreateIssueDto> for CreateIssueContract<'a, U> {
    fn validate(&self, entity: &CreateIssueDto) -> ValidationResult {
        if !self.user_allowed() {
            return Err(TrackerError::permission_denied(
                "Only QA or Manager can create issues.",
            ));
        }

        let mut errors = IssueBaseContract::validate_fields(entity);
        if let Some(assignee) = entity.assigned_to_id {
            if !self.candidates.contains(&assignee) {
                errors.add(
                    "assigned_to",
                    "Select a valid choice. That choice is not one of the available choices.",
                );
            }
        }
        errors.into_result()
    }
}
