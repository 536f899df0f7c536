//! Status Service for Projects

use tr_contracts::projects::UpdateProjectStatusContract;
use tr_contracts::{Contract, UserContext};
use tr_core::result::TrackerResult;
use tr_core::traits::Id;
use tr_db::{Store, UpdateProjectDto};
use tr_models::{Project, ProjectStatus};

use crate::base::ServiceContext;
use crate::result::ServiceResult;

/// The picking developer moves a project between open, in progress and
/// completed, in any direction.
pub struct UpdateProjectStatusService<'a, U: UserContext> {
    ctx: ServiceContext<'a, U>,
}

impl<'a, U: UserContext> UpdateProjectStatusService<'a, U> {
    pub fn new(user: &'a U, store: &'a Store) -> Self {
        Self {
            ctx: ServiceContext::new(user, store),
        }
    }

    /// `status` is the submitted value, e.g. `"completed"`
    pub async fn call(self, project_id: Id, status: &str) -> TrackerResult<ServiceResult<Project>> {
        let outcome = self.update(project_id, status).await;
        Ok(self
            .ctx
            .finish("update_project_status", outcome)?
            .with_success_message("Project status updated successfully!"))
    }

    async fn update(&self, project_id: Id, status: &str) -> TrackerResult<Project> {
        let project = self.ctx.load_project(project_id).await?;
        let contract = UpdateProjectStatusContract::new(self.ctx.user);
        contract.validate(&project)?;
        let status: ProjectStatus = status.parse()?;

        let dto = UpdateProjectDto::status(status);
        contract.validate_writable(&dto.changed_attributes())?;
        let project = self.ctx.store.projects.update(project_id, dto).await?;
        tracing::info!(
            project_id,
            user_id = self.ctx.user_id(),
            status = status.as_str(),
            "Project status updated"
        );
        Ok(project)
    }
}
