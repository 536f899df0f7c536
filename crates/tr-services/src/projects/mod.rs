//! Project workflow services

use serde::Deserialize;

pub mod create;
pub mod update;
pub mod delete;
pub mod pick;
pub mod status;
pub mod testing;

pub use create::CreateProjectService;
pub use delete::DeleteProjectService;
pub use pick::PickProjectService;
pub use status::UpdateProjectStatusService;
pub use testing::{QaPickProjectService, StartTestingService};
pub use update::UpdateProjectService;

/// Parameters for creating a project
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectParams {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl ProjectParams {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}
