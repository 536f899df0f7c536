//! Base service plumbing
//!
//! Every service holds a [`ServiceContext`]: the acting user plus the
//! persistence gateway.

use tr_contracts::UserContext;
use tr_core::error::TrackerError;
use tr_core::result::{OptionExt, TrackerResult};
use tr_core::traits::{Entity, Id};
use tr_db::Store;
use tr_models::{Issue, Project};

use crate::result::ServiceResult;

/// Service context for managing service execution
pub struct ServiceContext<'a, U: UserContext> {
    pub user: &'a U,
    pub store: &'a Store,
}

impl<'a, U: UserContext> ServiceContext<'a, U> {
    pub fn new(user: &'a U, store: &'a Store) -> Self {
        Self { user, store }
    }

    pub fn user_id(&self) -> Id {
        self.user.id()
    }

    pub async fn load_project(&self, id: Id) -> TrackerResult<Project> {
        load_project(self.store, id).await
    }

    pub async fn load_issue(&self, id: Id) -> TrackerResult<Issue> {
        load_issue(self.store, id).await
    }

    /// Log the outcome of `operation` and fold it into a `ServiceResult`
    pub fn finish<T>(
        &self,
        operation: &'static str,
        outcome: TrackerResult<T>,
    ) -> TrackerResult<ServiceResult<T>> {
        finish(operation, self.user_id(), outcome)
    }
}

pub async fn load_project(store: &Store, id: Id) -> TrackerResult<Project> {
    store.projects.find_by_id(id).await?.or_not_found(Project::TYPE_NAME, id)
}

pub async fn load_issue(store: &Store, id: Id) -> TrackerResult<Issue> {
    store.issues.find_by_id(id).await?.or_not_found(Issue::TYPE_NAME, id)
}

/// Refusals are logged at `warn`, infrastructure failures at `error`.
pub fn finish<T>(
    operation: &'static str,
    user_id: Id,
    outcome: TrackerResult<T>,
) -> TrackerResult<ServiceResult<T>> {
    if let Err(err) = &outcome {
        log_failure(operation, user_id, err);
    }
    ServiceResult::capture(outcome)
}

fn log_failure(operation: &'static str, user_id: Id, err: &TrackerError) {
    match err.kind() {
        Some(kind) => tracing::warn!(
            operation,
            user_id,
            kind = kind.as_str(),
            error = %err,
            "Operation refused"
        ),
        None => tracing::error!(operation, user_id, error = %err, "Operation failed"),
    }
}
