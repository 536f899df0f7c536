//! The acting user
//!
//! Roles are derived from group names on demand; a user may hold several.

use std::collections::BTreeSet;

use tr_contracts::UserContext;
use tr_core::traits::Id;
use tr_models::{Role, User};

/// Current user with group memberships
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: Id,
    pub username: String,
    pub email: String,
    pub is_superuser: bool,
    pub is_active: bool,
    groups: BTreeSet<String>,
}

impl CurrentUser {
    /// Create a new active user without any groups
    pub fn new(id: Id, username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            email: email.into(),
            is_superuser: false,
            is_active: true,
            groups: BTreeSet::new(),
        }
    }

    /// Build from a directory entry and its group names
    pub fn from_user(user: User, groups: impl IntoIterator<Item = String>) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            is_superuser: user.is_superuser,
            is_active: user.is_active,
            groups: groups.into_iter().collect(),
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.add_group(role.group_name());
        self
    }

    pub fn add_group(&mut self, group: impl Into<String>) {
        self.groups.insert(group.into());
    }

    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(String::as_str)
    }

    /// Roles granted by the user's groups, in `Role::ALL` order
    pub fn roles(&self) -> Vec<Role> {
        Role::ALL
            .into_iter()
            .filter(|role| self.groups.contains(role.group_name()))
            .collect()
    }
}

impl UserContext for CurrentUser {
    fn id(&self) -> Id {
        self.id
    }

    fn is_superuser(&self) -> bool {
        self.is_superuser
    }

    fn is_active(&self) -> bool {
        self.is_active
    }

    fn has_group(&self, group: &str) -> bool {
        self.groups.contains(group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_user() {
        let user = CurrentUser::new(1, "mgr", "mgr@example.com");
        assert_eq!(user.id(), 1);
        assert!(user.is_active());
        assert!(!user.is_superuser());
        assert!(user.roles().is_empty());
    }

    #[test]
    fn test_roles_from_groups() {
        let user = CurrentUser::from_user(
            User::new(2, "dq"),
            vec!["QA".to_string(), "Developers".to_string(), "Book Club".to_string()],
        );

        assert_eq!(user.roles(), vec![Role::Developer, Role::Qa]);
        assert!(user.has_role(Role::Qa));
        assert!(!user.has_role(Role::Manager));
        assert!(user.has_group("Book Club"));
        assert_eq!(user.groups().count(), 3);
    }

    #[test]
    fn test_superuser_flag_carries_over() {
        let user = CurrentUser::from_user(User::new(3, "root").superuser(), Vec::new());
        assert!(user.is_superuser());
        assert!(!user.has_role(Role::Manager));
    }
}
