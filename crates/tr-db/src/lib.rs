//! # tr-db
//!
//! Persistence gateway for Issue Tracker RS.
//!
//! - Connection pool management and schema bootstrap (PostgreSQL via SQLx)
//! - Repository pattern for projects and issues, with conditional updates
//! - A read-only user directory
//! - An in-memory implementation of all of the above
//!
//! ## Example
//!
//! ```ignore
//! use tr_db::{Database, DatabaseConfig, Store};
//!
//! let db = Database::connect(&DatabaseConfig::with_url(url)).await?;
//! db.bootstrap().await?;
//!
//! let store = Store::postgres(&db);
//! let project = store.projects.find_by_id(1).await?;
//! ```

use std::sync::Arc;

use tr_models::{CreateIssueDto, CreateProjectDto, Issue, Project};

pub mod pool;
pub mod repository;
pub mod schema;
pub mod projects;
pub mod issues;
pub mod users;
pub mod memory;

// Re-exports
pub use pool::{Database, DatabaseConfig, PoolStats};
pub use repository::{Repository, RepositoryError, RepositoryResult, UpdateCondition};
pub use projects::{PgProjectRepository, ProjectFilter, ProjectRow, UpdateProjectDto};
pub use issues::{IssueFilter, IssueRow, PgIssueRepository, UpdateIssueDto};
pub use users::{PgUserDirectory, UserDirectory, UserRow};
pub use memory::MemoryStore;

/// Object-safe project repository
pub type ProjectRepository =
    dyn Repository<Project, CreateProjectDto, UpdateProjectDto, ProjectFilter>;

/// Object-safe issue repository
pub type IssueRepository = dyn Repository<Issue, CreateIssueDto, UpdateIssueDto, IssueFilter>;

/// The gateway handed to the workflow engines
#[derive(Clone)]
pub struct Store {
    pub projects: Arc<ProjectRepository>,
    pub issues: Arc<IssueRepository>,
    pub users: Arc<dyn UserDirectory>,
}

impl Store {
    pub fn postgres(db: &Database) -> Self {
        let pool = db.pool().clone();
        Self {
            projects: Arc::new(PgProjectRepository::new(pool.clone())),
            issues: Arc::new(PgIssueRepository::new(pool.clone())),
            users: Arc::new(PgUserDirectory::new(pool)),
        }
    }

    pub fn memory(store: &MemoryStore) -> Self {
        Self {
            projects: Arc::new(store.projects()),
            issues: Arc::new(store.issues()),
            users: Arc::new(store.users()),
        }
    }
}
