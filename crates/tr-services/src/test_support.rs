//! Shared fixtures for service tests

use tr_auth::CurrentUser;
use tr_db::{MemoryStore, Store};
use tr_models::{CreateProjectDto, Project, Role, User};

pub const MANAGER: i64 = 1;
pub const DEV1: i64 = 2;
pub const DEV2: i64 = 3;
pub const QA1: i64 = 4;
pub const QA2: i64 = 5;
pub const OUTSIDER: i64 = 6;

pub struct Fixture {
    pub store: Store,
}

impl Fixture {
    /// A store seeded with one manager, two developers, two QA members and
    /// one user without any role
    pub fn new() -> Self {
        let memory = MemoryStore::new();
        memory.add_user_with_roles(MANAGER, "manager", &[Role::Manager]);
        memory.add_user_with_roles(DEV1, "dev1", &[Role::Developer]);
        memory.add_user_with_roles(DEV2, "dev2", &[Role::Developer]);
        memory.add_user_with_roles(QA1, "qa1", &[Role::Qa]);
        memory.add_user_with_roles(QA2, "qa2", &[Role::Qa]);
        memory.add_user_with_roles(OUTSIDER, "outsider", &[]);
        memory.add_user(User::new(7, "former-dev").inactive(), &[Role::Developer.group_name()]);

        Self {
            store: Store::memory(&memory),
        }
    }

    pub fn user(&self, id: i64) -> CurrentUser {
        let (name, role) = match id {
            MANAGER => ("manager", Some(Role::Manager)),
            DEV1 => ("dev1", Some(Role::Developer)),
            DEV2 => ("dev2", Some(Role::Developer)),
            QA1 => ("qa1", Some(Role::Qa)),
            QA2 => ("qa2", Some(Role::Qa)),
            _ => ("outsider", None),
        };
        let user = CurrentUser::new(id, name, format!("{}@example.com", name));
        match role {
            Some(role) => user.with_role(role),
            None => user,
        }
    }

    pub fn manager(&self) -> CurrentUser {
        self.user(MANAGER)
    }

    pub async fn project(&self, name: &str) -> Project {
        self.store
            .projects
            .create(CreateProjectDto::new(name, "Test project", MANAGER))
            .await
            .unwrap()
    }
}
