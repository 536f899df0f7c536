//! Role resolution
//!
//! Turns an authenticated user id into a `CurrentUser` with its groups.

use std::sync::Arc;

use async_trait::async_trait;
use tr_core::result::TrackerResult;
use tr_core::traits::Id;
use tr_db::UserDirectory;

use crate::current_user::CurrentUser;

/// Loads the acting user
#[async_trait]
pub trait RoleResolver: Send + Sync {
    /// `None` when the user is unknown or inactive
    async fn resolve(&self, user_id: Id) -> TrackerResult<Option<CurrentUser>>;
}

/// Resolver backed by the user directory of the persistence gateway
pub struct DirectoryRoleResolver {
    directory: Arc<dyn UserDirectory>,
}

impl DirectoryRoleResolver {
    pub fn new(directory: Arc<dyn UserDirectory>) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl RoleResolver for DirectoryRoleResolver {
    async fn resolve(&self, user_id: Id) -> TrackerResult<Option<CurrentUser>> {
        let Some(user) = self.directory.find_user(user_id).await? else {
            tracing::debug!(user_id, "Unknown user");
            return Ok(None);
        };

        if !user.is_active {
            tracing::debug!(user_id, "Inactive user");
            return Ok(None);
        }

        let groups = self.directory.groups_of(user_id).await?;
        Ok(Some(CurrentUser::from_user(user, groups)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tr_contracts::UserContext;
    use tr_db::{MemoryStore, RepositoryError, RepositoryResult};
    use tr_models::{Role, User};

    mockall::mock! {
        Directory {}

        #[async_trait]
        impl UserDirectory for Directory {
            async fn find_user(&self, id: Id) -> RepositoryResult<Option<User>>;
            async fn groups_of(&self, user_id: Id) -> RepositoryResult<Vec<String>>;
            async fn active_users(&self, role: Option<Role>) -> RepositoryResult<Vec<User>>;
        }
    }

    fn resolver(store: &MemoryStore) -> DirectoryRoleResolver {
        DirectoryRoleResolver::new(Arc::new(store.users()))
    }

    #[tokio::test]
    async fn test_resolves_groups() {
        let store = MemoryStore::new();
        store.add_user_with_roles(3, "qa1", &[Role::Qa]);

        let user = resolver(&store).resolve(3).await.unwrap().unwrap();
        assert_eq!(user.username, "qa1");
        assert!(user.has_role(Role::Qa));
        assert!(!user.has_role(Role::Developer));
    }

    #[tokio::test]
    async fn test_unknown_and_inactive_users() {
        let store = MemoryStore::new();
        store.add_user(User::new(4, "gone").inactive(), &["Developers"]);

        let resolver = resolver(&store);
        assert!(resolver.resolve(4).await.unwrap().is_none());
        assert!(resolver.resolve(99).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_directory_failure_propagates() {
        let mut directory = MockDirectory::new();
        directory
            .expect_find_user()
            .returning(|_| Err(RepositoryError::Corrupt("broken row".into())));

        let resolver = DirectoryRoleResolver::new(Arc::new(directory));
        let err = resolver.resolve(1).await.unwrap_err();
        assert!(err.is_infrastructure());
    }

    #[tokio::test]
    async fn test_groups_not_loaded_for_unknown_user() {
        let mut directory = MockDirectory::new();
        directory.expect_find_user().returning(|_| Ok(None));
        directory.expect_groups_of().never();

        let resolver = DirectoryRoleResolver::new(Arc::new(directory));
        assert!(resolver.resolve(1).await.unwrap().is_none());
    }
}
