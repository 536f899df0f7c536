//! Base contract system

use tr_core::error::{TrackerError, ValidationErrors};
use tr_core::traits::Id;
use tr_models::Role;

/// Result of contract validation
pub type ValidationResult = Result<(), TrackerError>;

/// Identity and role membership of the acting user.
///
/// Role checks never fail: a missing membership is simply `false`.
pub trait UserContext: Send + Sync {
    fn id(&self) -> Id;
    fn is_superuser(&self) -> bool;
    fn is_active(&self) -> bool;
    fn has_group(&self, group: &str) -> bool;

    fn has_role(&self, role: Role) -> bool {
        self.has_group(role.group_name())
    }
}

/// Base contract trait
pub trait Contract<T>: Send + Sync {
    /// Validate the entity
    fn validate(&self, entity: &T) -> ValidationResult;

    /// Check if an attribute is writable
    fn is_writable(&self, _attribute: &str) -> bool {
        true
    }

    /// Refuse a write that touches an attribute this contract keeps closed
    fn validate_writable(&self, changed: &[&str]) -> ValidationResult {
        let mut errors = ValidationErrors::new();
        for attribute in changed.iter().filter(|attribute| !self.is_writable(attribute)) {
            errors.add(*attribute, "was attempted to be written but is not writable");
        }
        errors.into_result()
    }
}

/// Add a "can't be blank" error when the value is empty or whitespace
pub fn validate_present(field: &str, value: &str, errors: &mut ValidationErrors) {
    if value.trim().is_empty() {
        errors.add(field, "can't be blank");
    }
}

/// Copy derive-based validator failures into our error collection
pub fn collect_validator_errors(
    result: Result<(), validator::ValidationErrors>,
    errors: &mut ValidationErrors,
) {
    let Err(failures) = result else {
        return;
    };

    for (field, field_errors) in failures.field_errors() {
        for error in field_errors {
            let message = error
                .message
                .as_ref()
                .map(|message| message.to_string())
                .unwrap_or_else(|| format!("is invalid ({})", error.code));
            errors.add(field, message);
        }
    }
}
