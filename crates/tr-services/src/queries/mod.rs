//! Read-only views over projects and issues
//!
//! Lists are newest first unless a method says otherwise.

use serde::Serialize;
use tr_contracts::UserContext;
use tr_db::Store;
use tr_models::{Issue, Project, Role};

use crate::base::ServiceContext;

mod issues;
mod projects;

/// A project with its issues, as shown on the detail page
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetail {
    pub project: Project,
    pub issues: Vec<Issue>,
    /// The viewer may edit or delete the project
    pub can_edit: bool,
}

/// A picked project with the number of its open issues
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    #[serde(flatten)]
    pub project: Project,
    pub open_issues: i64,
}

/// Where a user lands after signing in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LandingPage {
    ProjectList,
    AvailableProjects,
    QaDashboard,
}

impl LandingPage {
    /// Manager, then Developer, then QA; users without a role see the
    /// project list.
    pub fn for_user<U: UserContext>(user: &U) -> Self {
        if user.has_role(Role::Manager) {
            LandingPage::ProjectList
        } else if user.has_role(Role::Developer) {
            LandingPage::AvailableProjects
        } else if user.has_role(Role::Qa) {
            LandingPage::QaDashboard
        } else {
            LandingPage::ProjectList
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            LandingPage::ProjectList => "/projects",
            LandingPage::AvailableProjects => "/projects/available",
            LandingPage::QaDashboard => "/qa/dashboard",
        }
    }
}

/// Query service for one viewer
///
/// # Example
/// ```ignore
/// let queries = QueryService::new(&user, &store);
/// let mine = queries.my_projects().await?;
/// ```
pub struct QueryService<'a, U: UserContext> {
    ctx: ServiceContext<'a, U>,
}

impl<'a, U: UserContext> QueryService<'a, U> {
    pub fn new(user: &'a U, store: &'a Store) -> Self {
        Self {
            ctx: ServiceContext::new(user, store),
        }
    }

    pub fn landing_page(&self) -> LandingPage {
        LandingPage::for_user(self.ctx.user)
    }
}
