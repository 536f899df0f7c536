//! Project model
//!
//! Table: projects (team members in project_team)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tr_core::error::TrackerError;
use tr_core::traits::{Entity, Id, Identifiable, Timestamped};
use validator::Validate;

/// Project status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    Open,
    InProgress,
    Completed,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 3] = [Self::Open, Self::InProgress, Self::Completed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProjectStatus {
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

/// Project entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Id,

    /// Display name
    pub name: String,

    /// Free-form description, may be empty
    pub description: String,

    /// Manager (or superuser) who created the project
    pub created_by_id: Id,

    pub created_at: DateTime<Utc>,

    /// Developer who picked the project. Set at most once.
    pub picked_by_id: Option<Id>,

    pub has_issues: bool,

    /// Team member user ids
    #[serde(default)]
    pub team: Vec<Id>,

    pub status: ProjectStatus,

    /// QA member testing the project. Set at most once.
    pub qa_assigned_id: Option<Id>,
}

impl Project {
    pub fn is_created_by(&self, user_id: Id) -> bool {
        self.created_by_id == user_id
    }

    pub fn is_picked(&self) -> bool {
        self.picked_by_id.is_some()
    }

    pub fn is_picked_by(&self, user_id: Id) -> bool {
        self.picked_by_id == Some(user_id)
    }

    pub fn is_qa_assigned(&self) -> bool {
        self.qa_assigned_id.is_some()
    }

    pub fn is_qa_assigned_to(&self, user_id: Id) -> bool {
        self.qa_assigned_id == Some(user_id)
    }

    /// Open or in progress, i.e. still worth testing
    pub fn is_active(&self) -> bool {
        matches!(self.status, ProjectStatus::Open | ProjectStatus::InProgress)
    }
}

impl Identifiable for Project {
    fn id(&self) -> Id {
        self.id
    }
}

impl Timestamped for Project {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Entity for Project {
    const TABLE_NAME: &'static str = "projects";
    const TYPE_NAME: &'static str = "Project";
}

/// DTO for creating a new project
#[derive(Debug, Clone, PartialEq, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectDto {
    #[validate(length(max = 200, message = "is too long (maximum is 200 characters)"))]
    pub name: String,

    #[serde(default)]
    pub description: String,

    pub created_by_id: Id,
}

impl CreateProjectDto {
    pub fn new(name: impl Into<String>, description: impl Into<String>, created_by_id: Id) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            created_by_id,
        }
    }

    /// Materialize the project a store would persist for this DTO
    pub fn into_project(self, id: Id, created_at: DateTime<Utc>) -> Project {
        Project {
            id,
            name: self.name,
            description: self.description,
            created_by_id: self.created_by_id,
            created_at,
            picked_by_id: None,
            has_issues: false,
            team: Vec::new(),
            status: ProjectStatus::Open,
            qa_assigned_id: None,
        }
    }
}

/// Fields the creator or a Manager may change after creation.
///
/// Picker, QA assignee, status and creator change only through the pick and
/// status workflows.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EditProjectDto {
    #[validate(length(max = 200, message = "is too long (maximum is 200 characters)"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub has_issues: Option<bool>,
    pub team: Option<Vec<Id>>,
}

impl EditProjectDto {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.has_issues.is_none()
            && self.team.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip_names() {
        assert_eq!("in_progress".parse::<ProjectStatus>().unwrap(), ProjectStatus::InProgress);
        assert_eq!(ProjectStatus::Completed.to_string(), "completed");
        assert_eq!(ProjectStatus::InProgress.label(), "In Progress");
    }

    #[test]
    fn test_invalid_status() {
        let err = "archived".parse::<ProjectStatus>().unwrap_err();
        match err {
            TrackerError::InvalidArgument(errors) => assert!(errors.has_error("status")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_new_project_defaults() {
        let project = CreateProjectDto::new("Apollo", "", 1).into_project(10, Utc::now());
        assert_eq!(project.status, ProjectStatus::Open);
        assert!(!project.is_picked());
        assert!(!project.is_qa_assigned());
        assert!(!project.has_issues);
        assert!(project.is_created_by(1));
        assert!(project.is_active());
    }

    #[test]
    fn test_name_length_validation() {
        let dto = CreateProjectDto::new("x".repeat(201), "", 1);
        assert!(dto.validate().is_err());

        let dto = CreateProjectDto::new("x".repeat(200), "", 1);
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_edit_dto() {
        assert!(EditProjectDto::default().is_empty());

        let edit: EditProjectDto = serde_json::from_str(r#"{"hasIssues": true}"#).unwrap();
        assert_eq!(edit.has_issues, Some(true));
        assert!(!edit.is_empty());

        let edit = EditProjectDto {
            name: Some("y".repeat(201)),
            ..Default::default()
        };
        assert!(edit.validate().is_err());
    }

    #[test]
    fn test_serializes_camel_case() {
        let project = CreateProjectDto::new("Apollo", "Moon", 1).into_project(10, Utc::now());
        let json = serde_json::to_value(&project).unwrap();
        assert_eq!(json["pickedById"], serde_json::Value::Null);
        assert_eq!(json["status"], "open");
    }
}
