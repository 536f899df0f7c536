//! User directory
//!
//! Read-only access to accounts and their group memberships. The tracker
//! never creates or edits users through this interface.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tr_core::traits::Id;
use tr_models::{Role, User};

use crate::repository::RepositoryResult;

/// User database entity
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub is_active: bool,
    pub is_superuser: bool,
    pub date_joined: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            email: row.email,
            is_active: row.is_active,
            is_superuser: row.is_superuser,
        }
    }
}

/// Lookup of users and the groups that grant their roles
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_user(&self, id: Id) -> RepositoryResult<Option<User>>;

    /// Names of every group the user belongs to
    async fn groups_of(&self, user_id: Id) -> RepositoryResult<Vec<String>>;

    /// Active users, ordered by username. `Some(role)` restricts the list to
    /// members of that role's group.
    async fn active_users(&self, role: Option<Role>) -> RepositoryResult<Vec<User>>;
}

/// PostgreSQL user directory
pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn find_user(&self, id: Id) -> RepositoryResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, email, is_active, is_superuser, date_joined
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn groups_of(&self, user_id: Id) -> RepositoryResult<Vec<String>> {
        let names = sqlx::query_scalar::<_, String>(
            r#"
            SELECT g.name
            FROM groups g
            INNER JOIN user_groups ug ON ug.group_id = g.id
            WHERE ug.user_id = $1
            ORDER BY g.name
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(names)
    }

    async fn active_users(&self, role: Option<Role>) -> RepositoryResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT u.id, u.username, u.email, u.is_active, u.is_superuser, u.date_joined
            FROM users u
            WHERE u.is_active = TRUE
              AND (
                $1::TEXT IS NULL OR EXISTS (
                    SELECT 1
                    FROM user_groups ug
                    INNER JOIN groups g ON g.id = ug.group_id
                    WHERE ug.user_id = u.id AND g.name = $1
                )
              )
            ORDER BY u.username
            "#,
        )
        .bind(role.map(|role| role.group_name()))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_into_user() {
        let user = User::from(UserRow {
            id: 7,
            username: "dev1".into(),
            email: "dev1@example.com".into(),
            is_active: true,
            is_superuser: false,
            date_joined: Utc::now(),
        });
        assert_eq!(user, User::new(7, "dev1"));
    }

    #[tokio::test]
    async fn test_mock_directory() {
        let mut directory = MockUserDirectory::new();
        directory
            .expect_groups_of()
            .withf(|id| *id == 3)
            .returning(|_| Ok(vec!["QA".to_string()]));

        let groups = directory.groups_of(3).await.unwrap();
        assert_eq!(groups, vec!["QA"]);
    }
}
