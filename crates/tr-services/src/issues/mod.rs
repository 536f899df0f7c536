//! Issue workflow services

use serde::Deserialize;
use tr_core::traits::Id;

pub mod candidates;
pub mod create;
pub mod raise;
pub mod status;

pub use candidates::AssigneeCandidatesService;
pub use create::CreateIssueService;
pub use raise::RaiseIssueService;
pub use status::UpdateIssueStatusService;

/// Parameters for the issue form
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueParams {
    pub title: String,
    pub description: String,
    /// Defaults to medium when absent
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<Id>,
}

impl IssueParams {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    pub fn with_assignee(mut self, user_id: Id) -> Self {
        self.assigned_to = Some(user_id);
        self
    }
}

/// Parameters for an issue raised by the QA member testing a project
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RaiseIssueParams {
    pub title: String,
    pub description: String,
}

impl RaiseIssueParams {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}
