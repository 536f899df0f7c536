//! Issue repository
//!
//! Database operations for issues.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tr_core::traits::Id;
use tr_core::types::SortOrder;
use tr_models::{CreateIssueDto, Issue, IssuePriority, IssueStatus, Project};

use crate::repository::{delete_row, row_exists, Repository, RepositoryError, RepositoryResult};

const COLUMNS: &str = "id, title, description, status, priority, project_id, created_by_id, \
                       assigned_to_id, created_at, updated_at, reported_by_id";

/// Issue database entity
#[derive(Debug, Clone, FromRow)]
pub struct IssueRow {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub status: String,
    pub priority: String,
    pub project_id: i64,
    pub created_by_id: i64,
    pub assigned_to_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub reported_by_id: Option<i64>,
}

impl TryFrom<IssueRow> for Issue {
    type Error = RepositoryError;

    fn try_from(row: IssueRow) -> Result<Self, Self::Error> {
        let status: IssueStatus = row
            .status
            .parse()
            .map_err(|_| RepositoryError::Corrupt(format!("issue status '{}'", row.status)))?;
        let priority: IssuePriority = row
            .priority
            .parse()
            .map_err(|_| RepositoryError::Corrupt(format!("issue priority '{}'", row.priority)))?;

        Ok(Issue {
            id: row.id,
            title: row.title,
            description: row.description,
            status,
            priority,
            project_id: row.project_id,
            created_by_id: row.created_by_id,
            assigned_to_id: row.assigned_to_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
            reported_by_id: row.reported_by_id,
        })
    }
}

/// DTO for updating an issue. Every update refreshes `updated_at`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateIssueDto {
    pub status: Option<IssueStatus>,
}

impl UpdateIssueDto {
    pub fn status(status: IssueStatus) -> Self {
        Self {
            status: Some(status),
        }
    }

    /// Names of the attributes this update writes
    pub fn changed_attributes(&self) -> Vec<&'static str> {
        self.status.map(|_| "status").into_iter().collect()
    }
}

/// Issue list filter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IssueFilter {
    pub project_id: Option<Id>,
    pub assigned_to_id: Option<Id>,
    pub status: Option<IssueStatus>,
    /// `Some(true)` keeps only issues raised by QA, `Some(false)` only the rest
    pub reported: Option<bool>,
    /// Issues of projects picked by this user
    pub project_picked_by_id: Option<Id>,
    pub sort: SortOrder,
}

impl IssueFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn for_project(project_id: Id) -> Self {
        Self {
            project_id: Some(project_id),
            ..Default::default()
        }
    }

    pub fn open_in_project(project_id: Id) -> Self {
        Self {
            project_id: Some(project_id),
            status: Some(IssueStatus::Open),
            ..Default::default()
        }
    }

    pub fn assigned_to(user_id: Id) -> Self {
        Self {
            assigned_to_id: Some(user_id),
            ..Default::default()
        }
    }

    /// Issues raised by QA and handed to this developer
    pub fn reported_to(user_id: Id) -> Self {
        Self {
            assigned_to_id: Some(user_id),
            reported: Some(true),
            ..Default::default()
        }
    }

    pub fn in_projects_picked_by(user_id: Id) -> Self {
        Self {
            project_picked_by_id: Some(user_id),
            ..Default::default()
        }
    }

    /// In-process equivalent of the SQL `WHERE` clause. `project` is the
    /// issue's project, needed for the picker filter.
    pub fn matches(&self, issue: &Issue, project: Option<&Project>) -> bool {
        self.project_id.map_or(true, |id| issue.project_id == id)
            && self.assigned_to_id.map_or(true, |id| issue.assigned_to_id == Some(id))
            && self.status.map_or(true, |status| issue.status == status)
            && self.reported.map_or(true, |reported| issue.is_reported() == reported)
            && self.project_picked_by_id.map_or(true, |id| {
                project.map_or(false, |project| project.is_picked_by(id))
            })
    }
}

/// PostgreSQL issue repository
pub struct PgIssueRepository {
    pool: PgPool,
}

impl PgIssueRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const FILTER_CLAUSE: &str = r#"
    WHERE ($1::BIGINT IS NULL OR project_id = $1)
      AND ($2::BIGINT IS NULL OR assigned_to_id = $2)
      AND ($3::TEXT IS NULL OR status = $3)
      AND ($4::BOOLEAN IS NULL OR (reported_by_id IS NOT NULL) = $4)
      AND ($5::BIGINT IS NULL OR project_id IN (SELECT id FROM projects WHERE picked_by_id = $5))
"#;

#[async_trait]
impl Repository<Issue, CreateIssueDto, UpdateIssueDto, IssueFilter> for PgIssueRepository {
    async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<Issue>> {
        let row = sqlx::query_as::<_, IssueRow>(&format!(
            "SELECT {} FROM issues WHERE id = $1",
            COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Issue::try_from).transpose()
    }

    async fn query(&self, filter: IssueFilter) -> RepositoryResult<Vec<Issue>> {
        let sql = format!(
            "SELECT {} FROM issues {} ORDER BY {}",
            COLUMNS,
            FILTER_CLAUSE,
            filter.sort.sql()
        );

        let rows = sqlx::query_as::<_, IssueRow>(&sql)
            .bind(filter.project_id)
            .bind(filter.assigned_to_id)
            .bind(filter.status.map(|status| status.as_str()))
            .bind(filter.reported)
            .bind(filter.project_picked_by_id)
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!(count = rows.len(), "Queried issues");
        rows.into_iter().map(Issue::try_from).collect()
    }

    async fn count(&self, filter: IssueFilter) -> RepositoryResult<i64> {
        let sql = format!("SELECT COUNT(*) FROM issues {}", FILTER_CLAUSE);

        let count = sqlx::query_scalar::<_, i64>(&sql)
            .bind(filter.project_id)
            .bind(filter.assigned_to_id)
            .bind(filter.status.map(|status| status.as_str()))
            .bind(filter.reported)
            .bind(filter.project_picked_by_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn create(&self, dto: CreateIssueDto) -> RepositoryResult<Issue> {
        let row = sqlx::query_as::<_, IssueRow>(&format!(
            r#"
            INSERT INTO issues (
                title, description, status, priority, project_id,
                created_by_id, assigned_to_id, reported_by_id, created_at, updated_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, NOW(), NOW()
            )
            RETURNING {}
            "#,
            COLUMNS
        ))
        .bind(&dto.title)
        .bind(&dto.description)
        .bind(IssueStatus::Open.as_str())
        .bind(dto.priority.as_str())
        .bind(dto.project_id)
        .bind(dto.created_by_id)
        .bind(dto.assigned_to_id)
        .bind(dto.reported_by_id)
        .fetch_one(&self.pool)
        .await?;

        Issue::try_from(row)
    }

    async fn update(&self, id: Id, dto: UpdateIssueDto) -> RepositoryResult<Issue> {
        let row = sqlx::query_as::<_, IssueRow>(&format!(
            r#"
            UPDATE issues SET
                status = COALESCE($1, status),
                updated_at = NOW()
            WHERE id = $2
            RETURNING {}
            "#,
            COLUMNS
        ))
        .bind(dto.status.map(|status| status.as_str()))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::not_found::<Issue>(id))?;

        Issue::try_from(row)
    }

    async fn delete(&self, id: Id) -> RepositoryResult<()> {
        delete_row::<Issue>(&self.pool, id).await
    }

    async fn exists(&self, id: Id) -> RepositoryResult<bool> {
        row_exists::<Issue>(&self.pool, id).await
    }
}
