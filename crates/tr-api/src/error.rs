//! API error handling
//!
//! Failed results keep the `ServiceResult` shape so clients parse a single
//! body format. Status codes follow the error kind.

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tr_core::error::{ErrorKind, TrackerError, ValidationErrors};
use tr_services::ServiceResult;

/// API error types
#[derive(Debug)]
pub enum ApiError {
    Unauthorized(String),
    /// The request body or path could not be read
    Rejected { status: StatusCode, message: String },
    Tracker(TrackerError),
}

impl ApiError {
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        ApiError::Unauthorized(msg.into())
    }

    pub fn rejected(status: StatusCode, msg: impl Into<String>) -> Self {
        ApiError::Rejected {
            status,
            message: msg.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Rejected { status, .. } => *status,
            ApiError::Tracker(err) => match err.kind() {
                Some(kind) => kind_status(kind),
                None => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl From<TrackerError> for ApiError {
    fn from(err: TrackerError) -> Self {
        ApiError::Tracker(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::rejected(rejection.status(), rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::rejected(rejection.status(), rejection.body_text())
    }
}

/// HTTP status for a refused operation
pub fn kind_status(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::PermissionDenied => StatusCode::FORBIDDEN,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::InvalidArgument => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::ConditionFailed => StatusCode::CONFLICT,
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    success: bool,
    result: Option<()>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_kind: Option<ErrorKind>,
    errors: ValidationErrors,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            ApiError::Unauthorized(message) => ErrorBody {
                success: false,
                result: None,
                message,
                error_kind: None,
                errors: ValidationErrors::new(),
            },
            // An unreadable body is an invalid argument; bad syntax or media type has no kind
            ApiError::Rejected { status, message } => {
                let error_kind = (status == StatusCode::UNPROCESSABLE_ENTITY)
                    .then_some(ErrorKind::InvalidArgument);
                let mut errors = ValidationErrors::new();
                errors.add_base(message.clone());
                ErrorBody {
                    success: false,
                    result: None,
                    message,
                    error_kind,
                    errors,
                }
            }
            ApiError::Tracker(err) => {
                if err.is_infrastructure() {
                    tracing::error!(error = %err, "Request failed");
                }
                let error_kind = err.kind();
                let message = if error_kind.is_some() {
                    err.to_string()
                } else {
                    "Internal server error".to_string()
                };
                let errors = match err {
                    TrackerError::InvalidArgument(errors) => errors,
                    _ => ValidationErrors::new(),
                };
                ErrorBody {
                    success: false,
                    result: None,
                    message,
                    error_kind,
                    errors,
                }
            }
        };

        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// A service result rendered as JSON.
///
/// Success is `200 OK`, or `201 Created` for [`ServiceResponse::created`];
/// a failed result takes the status of its error kind.
pub struct ServiceResponse<T: Serialize> {
    result: ServiceResult<T>,
    success_status: StatusCode,
}

impl<T: Serialize> ServiceResponse<T> {
    pub fn ok(result: ServiceResult<T>) -> Self {
        Self {
            result,
            success_status: StatusCode::OK,
        }
    }

    pub fn created(result: ServiceResult<T>) -> Self {
        Self {
            result,
            success_status: StatusCode::CREATED,
        }
    }
}

impl<T: Serialize> IntoResponse for ServiceResponse<T> {
    fn into_response(self) -> Response {
        let status = if self.result.is_success() {
            self.success_status
        } else {
            self.result
                .error_kind()
                .map(kind_status)
                .unwrap_or(StatusCode::UNPROCESSABLE_ENTITY)
        };

        (status, Json(self.result)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::from(TrackerError::permission_denied("no")).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::from(TrackerError::not_found("Project", 1)).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(TrackerError::invalid("status", "bad")).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::from(TrackerError::condition_failed("taken")).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(TrackerError::Database("down".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::unauthorized("who?").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::rejected(StatusCode::BAD_REQUEST, "bad json").status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_service_response_status() {
        let created = ServiceResponse::created(ServiceResult::success(1)).into_response();
        assert_eq!(created.status(), StatusCode::CREATED);

        let refused: ServiceResult<i32> =
            ServiceResult::refused(ErrorKind::ConditionFailed, "taken");
        let response = ServiceResponse::created(refused).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
