//! Schema bootstrap
//!
//! Creates the tracker tables when they are missing. Statements are
//! idempotent, so bootstrapping an existing database is a no-op.

use sqlx::PgPool;
use tr_models::Role;

use crate::repository::RepositoryResult;

const STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id BIGSERIAL PRIMARY KEY,
        username VARCHAR(150) NOT NULL UNIQUE,
        email VARCHAR(254) NOT NULL DEFAULT '',
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        is_superuser BOOLEAN NOT NULL DEFAULT FALSE,
        date_joined TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS groups (
        id BIGSERIAL PRIMARY KEY,
        name VARCHAR(150) NOT NULL UNIQUE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS user_groups (
        user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        group_id BIGINT NOT NULL REFERENCES groups(id) ON DELETE CASCADE,
        PRIMARY KEY (user_id, group_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS projects (
        id BIGSERIAL PRIMARY KEY,
        name VARCHAR(200) NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        created_by_id BIGINT NOT NULL REFERENCES users(id),
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        picked_by_id BIGINT REFERENCES users(id) ON DELETE SET NULL,
        has_issues BOOLEAN NOT NULL DEFAULT FALSE,
        status VARCHAR(20) NOT NULL DEFAULT 'open',
        qa_assigned_id BIGINT REFERENCES users(id) ON DELETE SET NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS project_team (
        project_id BIGINT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
        user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        PRIMARY KEY (project_id, user_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS issues (
        id BIGSERIAL PRIMARY KEY,
        title VARCHAR(200) NOT NULL,
        description TEXT NOT NULL,
        status VARCHAR(20) NOT NULL DEFAULT 'open',
        priority VARCHAR(20) NOT NULL DEFAULT 'medium',
        project_id BIGINT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
        created_by_id BIGINT NOT NULL REFERENCES users(id),
        assigned_to_id BIGINT REFERENCES users(id) ON DELETE SET NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        reported_by_id BIGINT REFERENCES users(id) ON DELETE SET NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_projects_picked_by ON projects(picked_by_id)",
    "CREATE INDEX IF NOT EXISTS idx_projects_qa_assigned ON projects(qa_assigned_id)",
    "CREATE INDEX IF NOT EXISTS idx_issues_project ON issues(project_id)",
    "CREATE INDEX IF NOT EXISTS idx_issues_assigned_to ON issues(assigned_to_id)",
];

/// Create missing tables and the role groups
pub async fn bootstrap(pool: &PgPool) -> RepositoryResult<()> {
    for statement in STATEMENTS {
        sqlx::query(statement).execute(pool).await?;
    }

    for role in Role::ALL {
        sqlx::query("INSERT INTO groups (name) VALUES ($1) ON CONFLICT (name) DO NOTHING")
            .bind(role.group_name())
            .execute(pool)
            .await?;
    }

    tracing::info!(tables = STATEMENTS.len(), "Database schema ready");
    Ok(())
}
