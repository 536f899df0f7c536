//! Result type aliases

use crate::error::TrackerError;
use crate::traits::Id;

/// Standard Result type for tracker operations
pub type TrackerResult<T> = Result<T, TrackerError>;

/// Turns an optional lookup into a `NotFound` error
pub trait OptionExt<T> {
    fn or_not_found(self, entity: &'static str, id: Id) -> TrackerResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn or_not_found(self, entity: &'static str, id: Id) -> TrackerResult<T> {
        self.ok_or_else(|| TrackerError::not_found(entity, id))
    }
}
