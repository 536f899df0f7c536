//! User model
//!
//! Users live in an external identity store. The tracker only reads them.

use serde::{Deserialize, Serialize};
use tr_core::traits::{Id, Identifiable};

/// User account as seen by the tracker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Id,

    /// Login name (unique)
    pub username: String,

    pub email: String,

    /// Inactive users cannot act and cannot be assigned issues
    pub is_active: bool,

    /// Superusers may create projects without the Manager role
    pub is_superuser: bool,
}

impl User {
    pub fn new(id: Id, username: impl Into<String>) -> Self {
        let username = username.into();
        Self {
            id,
            email: format!("{}@example.com", username),
            username,
            is_active: true,
            is_superuser: false,
        }
    }

    pub fn superuser(mut self) -> Self {
        self.is_superuser = true;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }
}

impl Identifiable for User {
    fn id(&self) -> Id {
        self.id
    }
}
