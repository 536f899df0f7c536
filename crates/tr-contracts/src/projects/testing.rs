//! QA contracts for projects: taking a project for testing and forcing it
//! into progress.

use tr_core::error::TrackerError;
use tr_models::{Project, Role};

use crate::base::{Contract, UserContext, ValidationResult};

fn require_qa<U: UserContext>(user: &U, action: &str) -> ValidationResult {
    if user.has_role(Role::Qa) {
        Ok(())
    } else {
        Err(TrackerError::permission_denied(format!(
            "Only QA members can {}.",
            action
        )))
    }
}

/// A QA member takes a project nobody is testing yet
pub struct QaPickProjectContract<'a, U: UserContext> {
    user: &'a U,
}

impl<'a, U: UserContext> QaPickProjectContract<'a, U> {
    pub fn new(user: &'a U) -> Self {
        Self { user }
    }
}

impl<'a, U: UserContext> Contract<Project> for QaPickProjectContract<'a, U> {
    fn validate(&self, entity: &Project) -> ValidationResult {
        require_qa(self.user, "pick projects")?;

        if entity.is_qa_assigned() {
            return Err(TrackerError::condition_failed(
                "This project is already assigned to a QA.",
            ));
        }

        Ok(())
    }

    fn is_writable(&self, attribute: &str) -> bool {
        matches!(attribute, "qa_assigned_id" | "status")
    }
}

/// Any QA member may force a project into progress
pub struct StartTestingContract<'a, U: UserContext> {
    user: &'a U,
}

impl<'a, U: UserContext> StartTestingContract<'a, U> {
    pub fn new(user: &'a U) -> Self {
        Self { user }
    }
}

impl<'a, U: UserContext> Contract<Project> for StartTestingContract<'a, U> {
    fn validate(&self, _entity: &Project) -> ValidationResult {
        require_qa(self.user, "start testing")
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
    use tr_models::CreateProjectDto;

    fn project() -> Project {
        CreateProjectDto::new("Apollo", "", 1).into_project(10, Utc::now())
    }

    #[test]
    fn test_qa_pick() {
        let qa = MockUser::with_roles(4, &[Role::Qa]);
        assert!(QaPickProjectContract::new(&qa).validate(&project()).is_ok());

        let mut assigned = project();
        assigned.qa_assigned_id = Some(5);
        let err = QaPickProjectContract::new(&qa).validate(&assigned).unwrap_err();
        assert!(matches!(err, TrackerError::ConditionFailed { .. }));
    }

    #[test]
    fn test_qa_pick_requires_role() {
        let dev = MockUser::with_roles(2, &[Role::Developer]);
        let err = QaPickProjectContract::new(&dev).validate(&project()).unwrap_err();
        assert!(matches!(err, TrackerError::PermissionDenied { .. }));
    }

    #[test]
    fn test_start_testing() {
        let qa = MockUser::with_roles(4, &[Role::Qa]);
        assert!(StartTestingContract::new(&qa).validate(&project()).is_ok());

        let manager = MockUser::with_roles(1, &[Role::Manager]);
        assert!(StartTestingContract::new(&manager).validate(&project()).is_err());
    }
}
