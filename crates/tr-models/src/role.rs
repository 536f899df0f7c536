//! Role model
//!
//! Roles are group memberships. A user may belong to any number of them.

use serde::{Deserialize, Serialize};
use tr_core::error::TrackerError;

/// Tracker role, backed by a named group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Manager,
    Developer,
    Qa,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Manager, Role::Developer, Role::Qa];

    /// Name of the group that grants this role
    pub fn group_name(&self) -> &'static str {
        match self {
            Self::Manager => "Manager",
            Self::Developer => "Developers",
            Self::Qa => "QA",
        }
    }

    /// Resolve a group name to a role
    pub fn from_group_name(name: &str) -> Option<Role> {
        Self::ALL.into_iter().find(|role| role.group_name() == name)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.group_name())
    }
}

impl std::str::FromStr for Role {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_group_name(s)
            .ok_or_else(|| TrackerError::invalid("role", format!("'{}' is not a known role", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_names() {
        assert_eq!(Role::Manager.group_name(), "Manager");
        assert_eq!(Role::Developer.group_name(), "Developers");
        assert_eq!(Role::Qa.group_name(), "QA");
    }

    #[test]
    fn test_from_group_name() {
        assert_eq!(Role::from_group_name("Developers"), Some(Role::Developer));
        assert_eq!(Role::from_group_name("developers"), None);
        assert!("Testers".parse::<Role>().is_err());
    }
}
