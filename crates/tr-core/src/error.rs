//! Core error types for Issue Tracker RS
//!
//! The four domain kinds (`PermissionDenied`, `NotFound`, `InvalidArgument`,
//! `ConditionFailed`) are user-facing and never fatal. Everything else is an
//! infrastructure failure that propagates past the workflow boundary.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Core error type for all tracker operations
#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("{message}")]
    NotFound { message: String },

    #[error("{message}")]
    PermissionDenied { message: String },

    #[error("{0}")]
    InvalidArgument(ValidationErrors),

    #[error("{message}")]
    ConditionFailed { message: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// User-facing failure categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    PermissionDenied,
    NotFound,
    InvalidArgument,
    ConditionFailed,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PermissionDenied => "permission_denied",
            Self::NotFound => "not_found",
            Self::InvalidArgument => "invalid_argument",
            Self::ConditionFailed => "condition_failed",
        }
    }
}

impl TrackerError {
    pub fn not_found(entity: &'static str, id: impl std::fmt::Display) -> Self {
        TrackerError::NotFound {
            message: format!("{} with id {} not found", entity, id),
        }
    }

    /// Rebuild a user-facing refusal from its kind and message.
    /// `InvalidArgument` carries the message as a base error.
    pub fn refusal(kind: ErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        match kind {
            ErrorKind::NotFound => TrackerError::NotFound { message },
            ErrorKind::PermissionDenied => TrackerError::PermissionDenied { message },
            ErrorKind::ConditionFailed => TrackerError::ConditionFailed { message },
            ErrorKind::InvalidArgument => {
                let mut errors = ValidationErrors::new();
                errors.add_base(message);
                TrackerError::InvalidArgument(errors)
            }
        }
    }

    pub fn permission_denied(message: impl Into<String>) -> Self {
        TrackerError::PermissionDenied {
            message: message.into(),
        }
    }

    pub fn condition_failed(message: impl Into<String>) -> Self {
        TrackerError::ConditionFailed {
            message: message.into(),
        }
    }

    /// Single-field invalid argument
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = ValidationErrors::new();
        errors.add(field, message);
        TrackerError::InvalidArgument(errors)
    }

    /// The domain kind, or `None` for infrastructure failures
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            TrackerError::NotFound { .. } => Some(ErrorKind::NotFound),
            TrackerError::PermissionDenied { .. } => Some(ErrorKind::PermissionDenied),
            TrackerError::InvalidArgument(_) => Some(ErrorKind::InvalidArgument),
            TrackerError::ConditionFailed { .. } => Some(ErrorKind::ConditionFailed),
            TrackerError::Database(_) | TrackerError::Internal(_) | TrackerError::Config(_) => None,
        }
    }

    pub fn is_infrastructure(&self) -> bool {
        self.kind().is_none()
    }

    /// HTTP status code mapping
    pub fn status_code(&self) -> u16 {
        match self {
            TrackerError::NotFound { .. } => 404,
            TrackerError::PermissionDenied { .. } => 403,
            TrackerError::InvalidArgument(_) => 422,
            TrackerError::ConditionFailed { .. } => 409,
            TrackerError::Database(_) | TrackerError::Internal(_) | TrackerError::Config(_) => 500,
        }
    }
}

/// Field-level validation messages
#[derive(Error, Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{}", self.full_messages().join(", "))]
pub struct ValidationErrors {
    /// Field-specific errors: field_name -> messages
    pub errors: BTreeMap<String, Vec<String>>,
    /// Errors not tied to a specific field
    pub base_errors: Vec<String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn add_base(&mut self, message: impl Into<String>) {
        self.base_errors.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.base_errors.is_empty()
    }

    /// Check if there are errors for a specific field
    pub fn has_error(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    /// Get errors for a specific field
    pub fn get(&self, field: &str) -> Option<&Vec<String>> {
        self.errors.get(field)
    }

    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, messages) in other.errors {
            self.errors.entry(field).or_default().extend(messages);
        }
        self.base_errors.extend(other.base_errors);
    }

    pub fn full_messages(&self) -> Vec<String> {
        let mut messages = self.base_errors.clone();
        for (field, field_messages) in &self.errors {
            for msg in field_messages {
                messages.push(format!("{} {}", field, msg));
            }
        }
        messages
    }

    /// `Ok(())` when empty, otherwise an `InvalidArgument` error
    pub fn into_result(self) -> Result<(), TrackerError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(TrackerError::InvalidArgument(self))
        }
    }
}
