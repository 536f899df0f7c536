//! Service Result type

use serde::Serialize;
use std::fmt;
use tr_core::error::{ErrorKind, TrackerError, ValidationErrors};
use tr_core::result::TrackerResult;

/// Represents the result of a service call
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceResult<T> {
    /// Whether the service call was successful
    success: bool,
    /// The result of the service call
    result: Option<T>,
    /// Message for display
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    /// Why the call failed
    #[serde(skip_serializing_if = "Option::is_none")]
    error_kind: Option<ErrorKind>,
    /// Field errors from the service call
    errors: ValidationErrors,
}

impl<T> ServiceResult<T> {
    /// Create a successful service result
    pub fn success(result: T) -> Self {
        Self {
            success: true,
            result: Some(result),
            message: None,
            error_kind: None,
            errors: ValidationErrors::new(),
        }
    }

    /// Create a successful service result with a message
    pub fn success_with_message(result: T, message: impl Into<String>) -> Self {
        Self::success(result).with_message(message)
    }

    /// Create a failed service result from field errors
    pub fn failure(errors: ValidationErrors) -> Self {
        Self {
            success: false,
            result: None,
            message: Some(errors.full_messages().join(", ")),
            error_kind: Some(ErrorKind::InvalidArgument),
            errors,
        }
    }

    /// Create a failed service result from a user-facing error
    pub fn refused(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            success: false,
            result: None,
            message: Some(message.into()),
            error_kind: Some(kind),
            errors: ValidationErrors::new(),
        }
    }

    /// Fold an operation outcome into a result.
    ///
    /// Domain errors become a failed result. Infrastructure errors stay
    /// `Err` and propagate to the caller.
    pub fn capture(outcome: TrackerResult<T>) -> TrackerResult<Self> {
        match outcome {
            Ok(value) => Ok(Self::success(value)),
            Err(TrackerError::InvalidArgument(errors)) => Ok(Self::failure(errors)),
            Err(err) => match err.kind() {
                Some(kind) => Ok(Self::refused(kind, err.to_string())),
                None => Err(err),
            },
        }
    }

    /// Check if the service call was successful
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Check if the service call failed
    pub fn is_failure(&self) -> bool {
        !self.success
    }

    /// Get the result (if successful)
    pub fn result(&self) -> Option<&T> {
        self.result.as_ref()
    }

    /// Take the result (consuming it)
    pub fn into_result(self) -> Option<T> {
        self.result
    }

    /// Get the errors
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Get the message
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error_kind
    }

    /// Set the message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Set the message only when the call succeeded
    pub fn with_success_message(self, message: impl Into<String>) -> Self {
        if self.success {
            self.with_message(message)
        } else {
            self
        }
    }

    /// Full error messages
    pub fn full_messages(&self) -> Vec<String> {
        self.errors.full_messages()
    }

    /// Map the result if successful
    pub fn map<U, F>(self, f: F) -> ServiceResult<U>
    where
        F: FnOnce(T) -> U,
    {
        ServiceResult {
            success: self.success,
            result: self.result.map(f),
            message: self.message,
            error_kind: self.error_kind,
            errors: self.errors,
        }
    }
}

impl<T> From<ServiceResult<T>> for Result<T, TrackerError> {
    fn from(result: ServiceResult<T>) -> Self {
        match (result.success, result.result) {
            (true, Some(value)) => Ok(value),
            (true, None) => Err(TrackerError::Internal(
                "Service succeeded but no result was returned".to_string(),
            )),
            (false, _) => Err(match result.error_kind {
                Some(ErrorKind::InvalidArgument) | None if !result.errors.is_empty() => {
                    TrackerError::InvalidArgument(result.errors)
                }
                kind => TrackerError::refusal(
                    kind.unwrap_or(ErrorKind::InvalidArgument),
                    result.message.unwrap_or_default(),
                ),
            }),
        }
    }
}

impl<T: fmt::Display> fmt::Display for ServiceResult<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.result, self.success) {
            (Some(result), true) => write!(f, "Success: {}", result),
            (None, true) => write!(f, "Success"),
            _ => write!(f, "Failure: {}", self.message.as_deref().unwrap_or_default()),
        }
    }
}
