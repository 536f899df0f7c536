//! Edit contract for projects

use tr_core::error::{TrackerError, ValidationErrors};
use tr_models::{EditProjectDto, Project};

use super::base::{can_manage, ProjectBaseContract};
use crate::base::{Contract, UserContext, ValidationResult};

/// Contract for editing an existing project
pub struct UpdateProjectContract<'a, U: UserContext> {
    user: &'a U,
    project: &'a Project,
}

impl<'a, U: UserContext> UpdateProjectContract<'a, U> {
    pub fn new(user: &'a U, project: &'a Project) -> Self {
        Self { user, project }
    }
}

impl<'a, U: UserContext> Contract<EditProjectDto> for UpdateProjectContract<'a, U> {
    fn validate(&self, entity: &EditProjectDto) -> ValidationResult {
        if !can_manage(self.user, self.project) {
            return Err(TrackerError::permission_denied(
                "You are not authorized to edit this project",
            ));
        }

        let mut errors = ValidationErrors::new();
        if let Some(name) = &entity.name {
            ProjectBaseContract::validate_name(name, &mut errors);
        }
        ProjectBaseContract::validate_lengths(entity, &mut errors);
        errors.into_result()
    }

    fn is_writable(&self, attribute: &str) -> bool {
        matches!(attribute, "name" | "description" | "has_issues" | "team")
    }
}
