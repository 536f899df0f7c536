//! Raise contract for issues

use tr_core::error::TrackerError;
use tr_models::{CreateIssueDto, Project};

use super::base::IssueBaseContract;
use crate::base::{Contract, UserContext, ValidationResult};

/// The QA member testing a project reports an issue against it
pub struct RaiseIssueContract<'a, U: UserContext> {
    user: &'a U,
    project: &'a Project,
}

impl<'a, U: UserContext> RaiseIssueContract<'a, U> {
    pub fn new(user: &'a U, project: &'a Project) -> Self {
        Self { user, project }
    }
}

impl<'a, U: UserContext> Contract<CreateIssueDto> for RaiseIssueContract<'a, U> {
    fn validate(&self, entity: &CreateIssueDto) -> ValidationResult {
        if !self.project.is_qa_assigned_to(self.user.id()) {
            return Err(TrackerError::permission_denied(
                "You are not authorized to raise issues for this project",
            ));
        }

        IssueBaseContract::validate_fields(entity).into_result()
    }
}
