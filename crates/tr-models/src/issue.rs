//! Issue model
//!
//! Table: issues (cascades with its project)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tr_core::error::TrackerError;
use tr_core::traits::{Entity, Id, Identifiable, Timestamped};
use validator::Validate;

/// Issue status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IssueStatus {
    #[default]
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl IssueStatus {
    pub const ALL: [IssueStatus; 4] = [Self::Open, Self::InProgress, Self::Resolved, Self::Closed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::InProgress => "In Progress",
            Self::Resolved => "Resolved",
            Self::Closed => "Closed",
        }
    }
}

impl std::fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for IssueStatus {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                TrackerError::invalid(
                    "status",
                    format!("'{}' is not one of the available choices", s),
                )
            })
    }
}

/// Issue priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IssuePriority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl IssuePriority {
    pub const ALL: [IssuePriority; 4] = [Self::Low, Self::Medium, Self::High, Self::Critical];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl std::fmt::Display for IssuePriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for IssuePriority {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|priority| priority.as_str() == s)
            .ok_or_else(|| {
                TrackerError::invalid(
                    "priority",
                    format!("'{}' is not one of the available choices", s),
                )
            })
    }
}

/// Issue entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub id: Id,
    pub title: String,
    pub description: String,
    pub status: IssueStatus,
    pub priority: IssuePriority,
    pub project_id: Id,
    pub created_by_id: Id,

    /// Only this user may change the status
    pub assigned_to_id: Option<Id>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// QA member who raised the issue, if it was raised through testing
    pub reported_by_id: Option<Id>,
}

impl Issue {
    pub fn is_assigned_to(&self, user_id: Id) -> bool {
        self.assigned_to_id == Some(user_id)
    }

    pub fn is_reported(&self) -> bool {
        self.reported_by_id.is_some()
    }

    /// `[Open] Crash on load`
    pub fn display_title(&self) -> String {
        format!("[{}] {}", self.status.label(), self.title)
    }
}

impl Identifiable for Issue {
    fn id(&self) -> Id {
        self.id
    }
}

impl Timestamped for Issue {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl Entity for Issue {
    const TABLE_NAME: &'static str = "issues";
    const TYPE_NAME: &'static str = "Issue";
}

/// DTO for creating a new issue
#[derive(Debug, Clone, PartialEq, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateIssueDto {
    #[validate(length(max = 200, message = "is too long (maximum is 200 characters)"))]
    pub title: String,

    pub description: String,

    #[serde(default)]
    pub priority: IssuePriority,

    pub project_id: Id,
    pub created_by_id: Id,
    pub assigned_to_id: Option<Id>,
    pub reported_by_id: Option<Id>,
}

impl CreateIssueDto {
    pub fn new(
        project_id: Id,
        created_by_id: Id,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            priority: IssuePriority::default(),
            project_id,
            created_by_id,
            assigned_to_id: None,
            reported_by_id: None,
        }
    }

    pub fn with_priority(mut self, priority: IssuePriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_assignee(mut self, assigned_to_id: Option<Id>) -> Self {
        self.assigned_to_id = assigned_to_id;
        self
    }

    pub fn reported_by(mut self, reported_by_id: Id) -> Self {
        self.reported_by_id = Some(reported_by_id);
        self
    }

    /// Materialize the issue a store would persist for this DTO
    pub fn into_issue(self, id: Id, now: DateTime<Utc>) -> Issue {
        Issue {
            id,
            title: self.title,
            description: self.description,
            status: IssueStatus::Open,
            priority: self.priority,
            project_id: self.project_id,
            created_by_id: self.created_by_id,
            assigned_to_id: self.assigned_to_id,
            created_at: now,
            updated_at: now,
            reported_by_id: self.reported_by_id,
        }
    }
}
