//! Base contract for projects

use tr_core::error::ValidationErrors;
use tr_models::{Project, Role};
use validator::Validate;

use crate::base::{collect_validator_errors, validate_present, UserContext};

/// Creator of the project, or any Manager
pub fn can_manage<U: UserContext>(user: &U, project: &Project) -> bool {
    project.is_created_by(user.id()) || user.has_role(Role::Manager)
}

/// Field validations shared by create and edit
pub struct ProjectBaseContract;

impl ProjectBaseContract {
    /// Validate name is present
    pub fn validate_name(name: &str, errors: &mut ValidationErrors) {
        validate_present("name", name, errors);
    }

    /// Run the derive-based length checks of a DTO
    pub fn validate_lengths<T: Validate>(dto: &T, errors: &mut ValidationErrors) {
        collect_validator_errors(dto.validate(), errors);
    }
}
