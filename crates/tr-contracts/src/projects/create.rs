//! Create contract for projects

use tr_core::error::{TrackerError, ValidationErrors};
use tr_models::{CreateProjectDto, Role};

use super::base::ProjectBaseContract;
use crate::base::{Contract, UserContext, ValidationResult};

/// Contract for creating a new project
pub struct CreateProjectContract<'a, U: UserContext> {
    user: &'a U,
}

impl<'a, U: UserContext> CreateProjectContract<'a, U> {
    pub fn new(user: &'a U) -> Self {
        Self { user }
    }

    /// Superusers and Managers may create projects
    pub fn user_allowed(&self) -> bool {
        self.user.is_superuser() || self.user.has_role(Role::Manager)
    }
}

impl<'a, U: UserContext> Contract<CreateProjectDto> for CreateProjectContract<'a, U> {
    fn validate(&self, entity: &CreateProjectDto) -> ValidationResult {
        if !self.user_allowed() {
            return Err(TrackerError::permission_denied(
                "Only managers can create projects",
            ));
        }

        let mut errors = ValidationErrors::new();
        ProjectBaseContract::validate_name(&entity.name, &mut errors);
        ProjectBaseContract::validate_lengths(entity, &mut errors);
        errors.into_result()
    }
}
