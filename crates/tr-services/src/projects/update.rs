//! Update Service for Projects

use tr_contracts::projects::UpdateProjectContract;
use tr_contracts::{Contract, UserContext};
use tr_core::result::TrackerResult;
use tr_core::traits::Id;
use tr_db::{Store, UpdateProjectDto};
use tr_models::{EditProjectDto, Project};

use crate::base::ServiceContext;
use crate::result::ServiceResult;

/// Edits name, description, the issue flag and the team.
pub struct UpdateProjectService<'a, U: UserContext> {
    ctx: ServiceContext<'a, U>,
}

impl<'a, U: UserContext> UpdateProjectService<'a, U> {
    pub fn new(user: &'a U, store: &'a Store) -> Self {
        Self {
            ctx: ServiceContext::new(user, store),
        }
    }

    pub async fn call(
        self,
        project_id: Id,
        params: EditProjectDto,
    ) -> TrackerResult<ServiceResult<Project>> {
        let outcome = self.update(project_id, params).await;
        Ok(self
            .ctx
            .finish("edit_project", outcome)?
            .with_success_message("Project updated successfully."))
    }

    async fn update(&self, project_id: Id, params: EditProjectDto) -> TrackerResult<Project> {
        let project = self.ctx.load_project(project_id).await?;
        let contract = UpdateProjectContract::new(self.ctx.user, &project);
        contract.validate(&params)?;

        if params.is_empty() {
            return Ok(project);
        }

        let dto = UpdateProjectDto::from(params);
        contract.validate_writable(&dto.changed_attributes())?;
        let project = self.ctx.store.projects.update(project_id, dto).await?;
        tracing::info!(project_id, user_id = self.ctx.user_id(), "Project edited");
        Ok(project)
    }
}
