//! Create Service for Projects

use tr_contracts::projects::CreateProjectContract;
use tr_contracts::{Contract, UserContext};
use tr_core::result::TrackerResult;
use tr_db::Store;
use tr_models::{CreateProjectDto, Project};

use super::ProjectParams;
use crate::base::ServiceContext;
use crate::result::ServiceResult;

/// Service for creating projects
///
/// # Example
/// ```ignore
/// let service = CreateProjectService::new(&user, &store);
/// let params = ProjectParams::new("Apollo").with_description("Moon shot");
/// let result = service.call(params).await?;
/// ```
pub struct CreateProjectService<'a, U: UserContext> {
    ctx: ServiceContext<'a, U>,
}

impl<'a, U: UserContext> CreateProjectService<'a, U> {
    pub fn new(user: &'a U, store: &'a Store) -> Self {
        Self {
            ctx: ServiceContext::new(user, store),
        }
    }

    /// Execute the create operation
    pub async fn call(self, params: ProjectParams) -> TrackerResult<ServiceResult<Project>> {
        let outcome = self.create(params).await;
        Ok(self
            .ctx
            .finish("create_project", outcome)?
            .with_success_message("Project created successfully."))
    }

    async fn create(&self, params: ProjectParams) -> TrackerResult<Project> {
        let dto = CreateProjectDto::new(params.name, params.description, self.ctx.user_id());
        CreateProjectContract::new(self.ctx.user).validate(&dto)?;

        let project = self.ctx.store.projects.create(dto).await?;
        tracing::info!(
            project_id = project.id,
            user_id = self.ctx.user_id(),
            "Project created"
        );
        Ok(project)
    }
}
