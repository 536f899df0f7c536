//! Repository traits and base implementations
//!
//! Provides the generic CRUD surface shared by every gateway backend.

use async_trait::async_trait;
use sqlx::PgPool;
use tr_core::error::TrackerError;
use tr_core::traits::{Entity, Id};

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: Id },

    /// A conditional update found the row but its guard no longer held
    #[error("{0}")]
    ConditionFailed(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored value could not be mapped back into the domain
    #[error("Corrupt row: {0}")]
    Corrupt(String),
}

impl RepositoryError {
    pub fn not_found<E: Entity>(id: Id) -> Self {
        RepositoryError::NotFound {
            entity: E::TYPE_NAME,
            id,
        }
    }
}

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl From<RepositoryError> for TrackerError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => TrackerError::not_found(entity, id),
            RepositoryError::ConditionFailed(message) => TrackerError::condition_failed(message),
            RepositoryError::Database(e) => TrackerError::Database(e.to_string()),
            RepositoryError::Corrupt(message) => TrackerError::Database(message),
        }
    }
}

/// Base repository trait for CRUD operations
#[async_trait]
pub trait Repository<T, CreateDto, UpdateDto, Filter>: Send + Sync {
    /// Find an entity by ID
    async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<T>>;

    /// All entities matching the filter, in the filter's sort order
    async fn query(&self, filter: Filter) -> RepositoryResult<Vec<T>>;

    /// Count entities matching the filter
    async fn count(&self, filter: Filter) -> RepositoryResult<i64>;

    /// Create a new entity
    async fn create(&self, dto: CreateDto) -> RepositoryResult<T>;

    /// Update an existing entity.
    ///
    /// Fails with `NotFound` for an unknown id and with `ConditionFailed`
    /// when the DTO carries a guard that no longer holds. Nothing is written
    /// in either case.
    async fn update(&self, id: Id, dto: UpdateDto) -> RepositoryResult<T>;

    /// Delete an entity by ID
    async fn delete(&self, id: Id) -> RepositoryResult<()>;

    /// Check if an entity exists
    async fn exists(&self, id: Id) -> RepositoryResult<bool>;
}

/// `DELETE` by primary key from `E`'s table
pub(crate) async fn delete_row<E: Entity>(pool: &PgPool, id: Id) -> RepositoryResult<()> {
    let sql = format!("DELETE FROM {} WHERE id = $1", E::TABLE_NAME);
    let result = sqlx::query(&sql).bind(id).execute(pool).await?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::not_found::<E>(id));
    }
    Ok(())
}

pub(crate) async fn row_exists<E: Entity>(pool: &PgPool, id: Id) -> RepositoryResult<bool> {
    let sql = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1)", E::TABLE_NAME);
    Ok(sqlx::query_scalar::<_, bool>(&sql).bind(id).fetch_one(pool).await?)
}

/// Guard on a conditional update: the write happens only while the named
/// field is still unset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateCondition {
    PickedByUnset,
    QaUnassigned,
}

impl UpdateCondition {
    pub fn failure_message(&self) -> &'static str {
        match self {
            Self::PickedByUnset => "This project has already been picked.",
            Self::QaUnassigned => "This project is already assigned to a QA.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tr_core::error::ErrorKind;

    #[test]
    fn test_into_tracker_error() {
        let err: TrackerError = RepositoryError::NotFound { entity: "Project", id: 4 }.into();
        assert_eq!(err.kind(), Some(ErrorKind::NotFound));
        assert_eq!(err.to_string(), "Project with id 4 not found");

        let err: TrackerError =
            RepositoryError::ConditionFailed(UpdateCondition::PickedByUnset.failure_message().into())
                .into();
        assert_eq!(err.kind(), Some(ErrorKind::ConditionFailed));

        let err: TrackerError = RepositoryError::Corrupt("status 'x'".into()).into();
        assert!(err.is_infrastructure());
    }
}
