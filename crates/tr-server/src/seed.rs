//! Users for the in-memory gateway
//!
//! The in-memory gateway starts without a user directory, so every bearer
//! token would name an unknown user. `TRACKER_SEED_USERS` points at a JSON
//! array of users and their groups:
//!
//! ```json
//! [
//!   { "id": 1, "username": "manager", "groups": ["Manager"] },
//!   { "id": 2, "username": "dev1", "email": "dev1@corp.test", "groups": ["Developers"] },
//!   { "id": 3, "username": "qa1", "groups": ["QA"], "isActive": true }
//! ]
//! ```

use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use tr_core::traits::Id;
use tr_db::MemoryStore;
use tr_models::{Role, User};
use tracing::{info, warn};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedUser {
    pub id: Id,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default = "active_by_default")]
    pub is_active: bool,
    #[serde(default)]
    pub is_superuser: bool,
    #[serde(default)]
    pub groups: Vec<String>,
}

fn active_by_default() -> bool {
    true
}

impl SeedUser {
    fn user(&self) -> User {
        let mut user = User::new(self.id, self.username.clone());
        if let Some(email) = &self.email {
            user.email = email.clone();
        }
        user.is_active = self.is_active;
        user.is_superuser = self.is_superuser;
        user
    }
}

pub fn parse_seed(json: &str) -> anyhow::Result<Vec<SeedUser>> {
    serde_json::from_str(json).context("seed users must be a JSON array of users")
}

pub fn load_seed_file(path: impl AsRef<Path>) -> anyhow::Result<Vec<SeedUser>> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read seed users from {}", path.display()))?;
    parse_seed(&json).with_context(|| format!("invalid seed users in {}", path.display()))
}

/// Register every seed user. Returns how many were added.
pub fn seed_memory_store(memory: &MemoryStore, users: &[SeedUser]) -> usize {
    for seed in users {
        for group in &seed.groups {
            if Role::from_group_name(group).is_none() {
                warn!(user = %seed.username, group = %group, "Seed group grants no role");
            }
        }
        let groups: Vec<&str> = seed.groups.iter().map(String::as_str).collect();
        memory.add_user(seed.user(), &groups);
    }
    users.len()
}

/// An in-memory gateway holding the configured seed users
pub fn seeded_memory_store(seed_path: Option<&str>) -> anyhow::Result<MemoryStore> {
    let memory = MemoryStore::new();
    match seed_path {
        Some(path) => {
            let users = load_seed_file(path)?;
            let count = seed_memory_store(&memory, &users);
            info!(path = %path, users = count, "Seeded in-memory user directory");
            if count == 0 {
                warn!(path = %path, "Seed file holds no users; every request will be rejected");
            }
        }
        None => {
            warn!("In-memory storage without TRACKER_SEED_USERS; every request will be rejected")
        }
    }
    Ok(memory)
}
