//! Status contract for projects

use tr_core::error::TrackerError;
use tr_models::Project;

use crate::base::{Contract, UserContext, ValidationResult};

/// Only the developer who picked a project may move its status
pub struct UpdateProjectStatusContract<'a, U: UserContext> {
    user: &'a U,
}

impl<'a, U: UserContext> UpdateProjectStatusContract<'a, U> {
    pub fn new(user: &'a U) -> Self {
        Self { user }
    }
}

impl<'a, U: UserContext> Contract<Project> for UpdateProjectStatusContract<'a, U> {
    fn validate(&self, entity: &Project) -> ValidationResult {
        if entity.is_picked_by(self.user.id()) {
            Ok(())
        } else {
            Err(TrackerError::permission_denied(
                "You cannot update the status of a project you haven't picked.",
            ))
        }
    }

    fn is_writable(&self, attribute: &str) -> bool {
        attribute == "status"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::test_support::MockUser;
    use chrono::Utc;
    use tr_models::{CreateProjectDto, Role};

    #[test]
    fn test_only_picker() {
        let mut project = CreateProjectDto::new("Apollo", "", 1).into_project(10, Utc::now());

        let manager = MockUser::with_roles(1, &[Role::Manager]);
        assert!(UpdateProjectStatusContract::new(&manager).validate(&project).is_err());

        project.picked_by_id = Some(2);
        let picker = MockUser::with_roles(2, &[]);
        assert!(UpdateProjectStatusContract::new(&picker).validate(&project).is_ok());
        assert!(UpdateProjectStatusContract::new(&manager).validate(&project).is_err());
    }
}
