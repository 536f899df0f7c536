//! In-memory gateway
//!
//! Same contract as the PostgreSQL repositories, backed by maps behind one
//! `RwLock`. Used by tests and by storage-less server runs. Conditional
//! updates check and write under a single write lock, so concurrent picks
//! have exactly one winner.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use tr_core::traits::{Entity, Id};
use tr_core::types::SortOrder;
use tr_models::{CreateIssueDto, CreateProjectDto, Issue, Project, Role, User};

use crate::issues::{IssueFilter, UpdateIssueDto};
use crate::projects::{ProjectFilter, UpdateProjectDto};
use crate::repository::{Repository, RepositoryError, RepositoryResult, UpdateCondition};
use crate::users::UserDirectory;

#[derive(Debug, Default)]
struct State {
    last_project_id: Id,
    last_issue_id: Id,
    projects: BTreeMap<Id, Project>,
    issues: BTreeMap<Id, Issue>,
    users: BTreeMap<Id, User>,
    groups: HashMap<Id, BTreeSet<String>>,
}

/// Shared in-memory storage. Cloning shares the same data.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<State>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn projects(&self) -> MemoryProjectRepository {
        MemoryProjectRepository { store: self.clone() }
    }

    pub fn issues(&self) -> MemoryIssueRepository {
        MemoryIssueRepository { store: self.clone() }
    }

    pub fn users(&self) -> MemoryUserDirectory {
        MemoryUserDirectory { store: self.clone() }
    }

    /// Register a user with the given group memberships
    pub fn add_user(&self, user: User, groups: &[&str]) {
        let mut state = self.state.write();
        state
            .groups
            .insert(user.id, groups.iter().map(|g| g.to_string()).collect());
        state.users.insert(user.id, user);
    }

    /// Register an active user holding the given roles
    pub fn add_user_with_roles(&self, id: Id, username: &str, roles: &[Role]) -> User {
        let user = User::new(id, username);
        let groups: Vec<&str> = roles.iter().map(|role| role.group_name()).collect();
        self.add_user(user.clone(), &groups);
        user
    }
}

fn sort_by_creation<T: Entity>(items: &mut [T], order: SortOrder) {
    items.sort_by(|a, b| {
        let ordering = (a.created_at(), a.id()).cmp(&(b.created_at(), b.id()));
        if order.is_descending() {
            ordering.reverse()
        } else {
            ordering
        }
    });
}

/// Project repository over [`MemoryStore`]
pub struct MemoryProjectRepository {
    store: MemoryStore,
}

#[async_trait]
impl Repository<Project, CreateProjectDto, UpdateProjectDto, ProjectFilter>
    for MemoryProjectRepository
{
    async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<Project>> {
        Ok(self.store.state.read().projects.get(&id).cloned())
    }

    async fn query(&self, filter: ProjectFilter) -> RepositoryResult<Vec<Project>> {
        let mut projects: Vec<Project> = self
            .store
            .state
            .read()
            .projects
            .values()
            .filter(|project| filter.matches(project))
            .cloned()
            .collect();

        sort_by_creation(&mut projects, filter.sort);
        Ok(projects)
    }

    async fn count(&self, filter: ProjectFilter) -> RepositoryResult<i64> {
        let state = self.store.state.read();
        Ok(state.projects.values().filter(|p| filter.matches(p)).count() as i64)
    }

    async fn create(&self, dto: CreateProjectDto) -> RepositoryResult<Project> {
        let mut state = self.store.state.write();
        state.last_project_id += 1;
        let project = dto.into_project(state.last_project_id, Utc::now());
        state.projects.insert(project.id, project.clone());
        Ok(project)
    }

    async fn update(&self, id: Id, dto: UpdateProjectDto) -> RepositoryResult<Project> {
        let mut state = self.store.state.write();
        let project = state
            .projects
            .get_mut(&id)
            .ok_or(RepositoryError::not_found::<Project>(id))?;

        let guard_holds = match dto.condition {
            Some(UpdateCondition::PickedByUnset) => !project.is_picked(),
            Some(UpdateCondition::QaUnassigned) => !project.is_qa_assigned(),
            None => true,
        };
        if !guard_holds {
            let message = dto
                .condition
                .map(|condition| condition.failure_message())
                .unwrap_or_default();
            return Err(RepositoryError::ConditionFailed(message.to_string()));
        }

        if let Some(name) = dto.name {
            project.name = name;
        }
        if let Some(description) = dto.description {
            project.description = description;
        }
        if let Some(has_issues) = dto.has_issues {
            project.has_issues = has_issues;
        }
        if let Some(mut team) = dto.team {
            team.sort_unstable();
            team.dedup();
            project.team = team;
        }
        if let Some(status) = dto.status {
            project.status = status;
        }
        if let Some(picked_by_id) = dto.picked_by_id {
            project.picked_by_id = Some(picked_by_id);
        }
        if let Some(qa_assigned_id) = dto.qa_assigned_id {
            project.qa_assigned_id = Some(qa_assigned_id);
        }

        Ok(project.clone())
    }

    async fn delete(&self, id: Id) -> RepositoryResult<()> {
        let mut state = self.store.state.write();
        if state.projects.remove(&id).is_none() {
            return Err(RepositoryError::not_found::<Project>(id));
        }
        state.issues.retain(|_, issue| issue.project_id != id);
        Ok(())
    }

    async fn exists(&self, id: Id) -> RepositoryResult<bool> {
        Ok(self.store.state.read().projects.contains_key(&id))
    }
}

/// Issue repository over [`MemoryStore`]
pub struct MemoryIssueRepository {
    store: MemoryStore,
}

#[async_trait]
impl Repository<Issue, CreateIssueDto, UpdateIssueDto, IssueFilter> for MemoryIssueRepository {
    async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<Issue>> {
        Ok(self.store.state.read().issues.get(&id).cloned())
    }

    async fn query(&self, filter: IssueFilter) -> RepositoryResult<Vec<Issue>> {
        let state = self.store.state.read();
        let mut issues: Vec<Issue> = state
            .issues
            .values()
            .filter(|issue| filter.matches(issue, state.projects.get(&issue.project_id)))
            .cloned()
            .collect();

        sort_by_creation(&mut issues, filter.sort);
        Ok(issues)
    }

    async fn count(&self, filter: IssueFilter) -> RepositoryResult<i64> {
        let state = self.store.state.read();
        let count = state
            .issues
            .values()
            .filter(|issue| filter.matches(issue, state.projects.get(&issue.project_id)))
            .count();
        Ok(count as i64)
    }

    async fn create(&self, dto: CreateIssueDto) -> RepositoryResult<Issue> {
        let mut state = self.store.state.write();
        if !state.projects.contains_key(&dto.project_id) {
            return Err(RepositoryError::not_found::<Project>(dto.project_id));
        }

        state.last_issue_id += 1;
        let issue = dto.into_issue(state.last_issue_id, Utc::now());
        state.issues.insert(issue.id, issue.clone());
        Ok(issue)
    }

    async fn update(&self, id: Id, dto: UpdateIssueDto) -> RepositoryResult<Issue> {
        let mut state = self.store.state.write();
        let issue = state
            .issues
            .get_mut(&id)
            .ok_or(RepositoryError::not_found::<Issue>(id))?;

        if let Some(status) = dto.status {
            issue.status = status;
        }
        issue.updated_at = Utc::now();

        Ok(issue.clone())
    }

    async fn delete(&self, id: Id) -> RepositoryResult<()> {
        match self.store.state.write().issues.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepositoryError::not_found::<Issue>(id)),
        }
    }

    async fn exists(&self, id: Id) -> RepositoryResult<bool> {
        Ok(self.store.state.read().issues.contains_key(&id))
    }
}

/// User directory over [`MemoryStore`]
pub struct MemoryUserDirectory {
    store: MemoryStore,
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn find_user(&self, id: Id) -> RepositoryResult<Option<User>> {
        Ok(self.store.state.read().users.get(&id).cloned())
    }

    async fn groups_of(&self, user_id: Id) -> RepositoryResult<Vec<String>> {
        let state = self.store.state.read();
        Ok(state
            .groups
            .get(&user_id)
            .map(|groups| groups.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn active_users(&self, role: Option<Role>) -> RepositoryResult<Vec<User>> {
        let state = self.store.state.read();
        let mut users: Vec<User> = state
            .users
            .values()
            .filter(|user| user.is_active)
            .filter(|user| {
                role.map_or(true, |role| {
                    state
                        .groups
                        .get(&user.id)
                        .map_or(false, |groups| groups.contains(role.group_name()))
                })
            })
            .cloned()
            .collect();

        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(users)
    }
}
