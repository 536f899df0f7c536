//! Base contract for issues

use tr_core::error::ValidationErrors;
use tr_models::CreateIssueDto;
use validator::Validate;

use crate::base::{collect_validator_errors, validate_present};

/// Field validations shared by create and raise
pub struct IssueBaseContract;

impl IssueBaseContract {
    pub fn validate_fields(dto: &CreateIssueDto) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        validate_present("title", &dto.title, &mut errors);
        validate_present("description", &dto.description, &mut errors);
        collect_validator_errors(dto.validate(), &mut errors);
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_and_description_required() {
        let errors = IssueBaseContract::validate_fields(&CreateIssueDto::new(1, 1, "", " "));
        assert!(errors.has_error("title"));
        assert!(errors.has_error("description"));
    }

    #[test]
    fn test_title_too_long() {
        let errors =
            IssueBaseContract::validate_fields(&CreateIssueDto::new(1, 1, "t".repeat(201), "d"));
        assert!(errors.has_error("title"));
        assert!(!errors.has_error("description"));
    }
}
