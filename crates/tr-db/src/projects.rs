//! Project repository
//!
//! Database operations for projects. Team membership lives in
//! `project_team` and is loaded alongside each row.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tr_core::traits::Id;
use tr_core::types::SortOrder;
use tr_models::{CreateProjectDto, EditProjectDto, Project, ProjectStatus};

use crate::repository::{
    delete_row, row_exists, Repository, RepositoryError, RepositoryResult, UpdateCondition,
};

const COLUMNS: &str = "id, name, description, created_by_id, created_at, picked_by_id, \
                       has_issues, status, qa_assigned_id";

/// Project database entity
#[derive(Debug, Clone, FromRow)]
pub struct ProjectRow {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub created_by_id: i64,
    pub created_at: DateTime<Utc>,
    pub picked_by_id: Option<i64>,
    pub has_issues: bool,
    pub status: String,
    pub qa_assigned_id: Option<i64>,
}

impl ProjectRow {
    pub fn into_project(self, team: Vec<Id>) -> RepositoryResult<Project> {
        let status: ProjectStatus = self
            .status
            .parse()
            .map_err(|_| RepositoryError::Corrupt(format!("project status '{}'", self.status)))?;

        Ok(Project {
            id: self.id,
            name: self.name,
            description: self.description,
            created_by_id: self.created_by_id,
            created_at: self.created_at,
            picked_by_id: self.picked_by_id,
            has_issues: self.has_issues,
            team,
            status,
            qa_assigned_id: self.qa_assigned_id,
        })
    }
}

/// DTO for updating a project.
///
/// `None` leaves a field unchanged. `condition` turns the write into a
/// compare-and-set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateProjectDto {
    pub name: Option<String>,
    pub description: Option<String>,
    pub has_issues: Option<bool>,
    pub team: Option<Vec<Id>>,
    pub status: Option<ProjectStatus>,
    pub picked_by_id: Option<Id>,
    pub qa_assigned_id: Option<Id>,
    pub condition: Option<UpdateCondition>,
}

impl UpdateProjectDto {
    /// Set the picker, only if nobody picked the project yet
    pub fn pick(user_id: Id) -> Self {
        Self {
            picked_by_id: Some(user_id),
            condition: Some(UpdateCondition::PickedByUnset),
            ..Default::default()
        }
    }

    /// Assign the QA member and start progress, only if no QA member is assigned
    pub fn qa_pick(user_id: Id) -> Self {
        Self {
            qa_assigned_id: Some(user_id),
            status: Some(ProjectStatus::InProgress),
            condition: Some(UpdateCondition::QaUnassigned),
            ..Default::default()
        }
    }

    pub fn status(status: ProjectStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn flag_issues() -> Self {
        Self {
            has_issues: Some(true),
            ..Default::default()
        }
    }

    /// Names of the attributes this update writes
    pub fn changed_attributes(&self) -> Vec<&'static str> {
        [
            ("name", self.name.is_some()),
            ("description", self.description.is_some()),
            ("has_issues", self.has_issues.is_some()),
            ("team", self.team.is_some()),
            ("status", self.status.is_some()),
            ("picked_by_id", self.picked_by_id.is_some()),
            ("qa_assigned_id", self.qa_assigned_id.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, set)| set.then_some(name))
        .collect()
    }
}

impl From<EditProjectDto> for UpdateProjectDto {
    fn from(edit: EditProjectDto) -> Self {
        Self {
            name: edit.name,
            description: edit.description,
            has_issues: edit.has_issues,
            team: edit.team,
            ..Default::default()
        }
    }
}

/// Project list filter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectFilter {
    pub picked_by_id: Option<Id>,
    pub qa_assigned_id: Option<Id>,
    /// Match any of these statuses
    pub statuses: Option<Vec<ProjectStatus>>,
    /// Restrict to these ids
    pub ids: Option<Vec<Id>>,
    pub sort: SortOrder,
}

impl ProjectFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn picked_by(user_id: Id) -> Self {
        Self {
            picked_by_id: Some(user_id),
            ..Default::default()
        }
    }

    pub fn qa_assigned_to(user_id: Id) -> Self {
        Self {
            qa_assigned_id: Some(user_id),
            ..Default::default()
        }
    }

    pub fn with_statuses(statuses: &[ProjectStatus]) -> Self {
        Self {
            statuses: Some(statuses.to_vec()),
            ..Default::default()
        }
    }

    pub fn with_ids(ids: Vec<Id>) -> Self {
        Self {
            ids: Some(ids),
            ..Default::default()
        }
    }

    /// In-process equivalent of the SQL `WHERE` clause
    pub fn matches(&self, project: &Project) -> bool {
        self.picked_by_id.map_or(true, |id| project.picked_by_id == Some(id))
            && self.qa_assigned_id.map_or(true, |id| project.qa_assigned_id == Some(id))
            && self
                .statuses
                .as_ref()
                .map_or(true, |statuses| statuses.contains(&project.status))
            && self.ids.as_ref().map_or(true, |ids| ids.contains(&project.id))
    }

    fn status_names(&self) -> Option<Vec<String>> {
        self.statuses
            .as_ref()
            .map(|statuses| statuses.iter().map(|s| s.as_str().to_string()).collect())
    }
}

/// PostgreSQL project repository
pub struct PgProjectRepository {
    pool: PgPool,
}

impl PgProjectRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_teams(&self, project_ids: &[Id]) -> RepositoryResult<HashMap<Id, Vec<Id>>> {
        let pairs = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT project_id, user_id
            FROM project_team
            WHERE project_id = ANY($1)
            ORDER BY user_id
            "#,
        )
        .bind(project_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut teams: HashMap<Id, Vec<Id>> = HashMap::new();
        for (project_id, user_id) in pairs {
            teams.entry(project_id).or_default().push(user_id);
        }
        Ok(teams)
    }

    async fn hydrate(&self, rows: Vec<ProjectRow>) -> RepositoryResult<Vec<Project>> {
        let ids: Vec<Id> = rows.iter().map(|row| row.id).collect();
        let mut teams = self.load_teams(&ids).await?;

        rows.into_iter()
            .map(|row| {
                let team = teams.remove(&row.id).unwrap_or_default();
                row.into_project(team)
            })
            .collect()
    }
}

#[async_trait]
impl Repository<Project, CreateProjectDto, UpdateProjectDto, ProjectFilter> for PgProjectRepository {
    async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<Project>> {
        let row = sqlx::query_as::<_, ProjectRow>(&format!(
            "SELECT {} FROM projects WHERE id = $1",
            COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(self.hydrate(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn query(&self, filter: ProjectFilter) -> RepositoryResult<Vec<Project>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM projects
            WHERE ($1::BIGINT IS NULL OR picked_by_id = $1)
              AND ($2::BIGINT IS NULL OR qa_assigned_id = $2)
              AND ($3::TEXT[] IS NULL OR status = ANY($3))
              AND ($4::BIGINT[] IS NULL OR id = ANY($4))
            ORDER BY {}
            "#,
            COLUMNS,
            filter.sort.sql()
        );

        let rows = sqlx::query_as::<_, ProjectRow>(&sql)
            .bind(filter.picked_by_id)
            .bind(filter.qa_assigned_id)
            .bind(filter.status_names())
            .bind(filter.ids.clone())
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!(count = rows.len(), "Queried projects");
        self.hydrate(rows).await
    }

    async fn count(&self, filter: ProjectFilter) -> RepositoryResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM projects
            WHERE ($1::BIGINT IS NULL OR picked_by_id = $1)
              AND ($2::BIGINT IS NULL OR qa_assigned_id = $2)
              AND ($3::TEXT[] IS NULL OR status = ANY($3))
              AND ($4::BIGINT[] IS NULL OR id = ANY($4))
            "#,
        )
        .bind(filter.picked_by_id)
        .bind(filter.qa_assigned_id)
        .bind(filter.status_names())
        .bind(filter.ids.clone())
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn create(&self, dto: CreateProjectDto) -> RepositoryResult<Project> {
        let row = sqlx::query_as::<_, ProjectRow>(&format!(
            r#"
            INSERT INTO projects (name, description, created_by_id, status, has_issues, created_at)
            VALUES ($1, $2, $3, $4, FALSE, NOW())
            RETURNING {}
            "#,
            COLUMNS
        ))
        .bind(&dto.name)
        .bind(&dto.description)
        .bind(dto.created_by_id)
        .bind(ProjectStatus::Open.as_str())
        .fetch_one(&self.pool)
        .await?;

        row.into_project(Vec::new())
    }

    async fn update(&self, id: Id, dto: UpdateProjectDto) -> RepositoryResult<Project> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, ProjectRow>(&format!(
            r#"
            UPDATE projects SET
                name = COALESCE($1, name),
                description = COALESCE($2, description),
                has_issues = COALESCE($3, has_issues),
                status = COALESCE($4, status),
                picked_by_id = COALESCE($5, picked_by_id),
                qa_assigned_id = COALESCE($6, qa_assigned_id)
            WHERE id = $7
              AND (NOT $8 OR picked_by_id IS NULL)
              AND (NOT $9 OR qa_assigned_id IS NULL)
            RETURNING {}
            "#,
            COLUMNS
        ))
        .bind(&dto.name)
        .bind(&dto.description)
        .bind(dto.has_issues)
        .bind(dto.status.map(|status| status.as_str()))
        .bind(dto.picked_by_id)
        .bind(dto.qa_assigned_id)
        .bind(id)
        .bind(dto.condition == Some(UpdateCondition::PickedByUnset))
        .bind(dto.condition == Some(UpdateCondition::QaUnassigned))
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            tx.rollback().await?;
            return match dto.condition {
                Some(condition) if self.exists(id).await? => {
                    Err(RepositoryError::ConditionFailed(condition.failure_message().to_string()))
                }
                _ => Err(RepositoryError::not_found::<Project>(id)),
            };
        };

        if let Some(team) = &dto.team {
            sqlx::query("DELETE FROM project_team WHERE project_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;

            for user_id in team {
                sqlx::query(
                    "INSERT INTO project_team (project_id, user_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
                )
                .bind(id)
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;

        let team = self.load_teams(&[id]).await?.remove(&id).unwrap_or_default();
        row.into_project(team)
    }

    async fn delete(&self, id: Id) -> RepositoryResult<()> {
        // Issues and team rows go with it (ON DELETE CASCADE)
        delete_row::<Project>(&self.pool, id).await
    }

    async fn exists(&self, id: Id) -> RepositoryResult<bool> {
        row_exists::<Project>(&self.pool, id).await
    }
}
