//! Delete Service for Projects

use tr_contracts::projects::DeleteProjectContract;
use tr_contracts::{Contract, UserContext};
use tr_core::result::TrackerResult;
use tr_core::traits::Id;
use tr_db::Store;
use tr_models::Project;

use crate::base::ServiceContext;
use crate::result::ServiceResult;

/// Deletes a project together with all of its issues.
///
/// Returns the project as it was before deletion.
pub struct DeleteProjectService<'a, U: UserContext> {
    ctx: ServiceContext<'a, U>,
}

impl<'a, U: UserContext> DeleteProjectService<'a, U> {
    pub fn new(user: &'a U, store: &'a Store) -> Self {
        Self {
            ctx: ServiceContext::new(user, store),
        }
    }

    pub async fn call(self, project_id: Id) -> TrackerResult<ServiceResult<Project>> {
        let outcome = self.delete(project_id).await;
        Ok(self
            .ctx
            .finish("delete_project", outcome)?
            .with_success_message("Project deleted successfully."))
    }

    async fn delete(&self, project_id: Id) -> TrackerResult<Project> {
        let project = self.ctx.load_project(project_id).await?;
        DeleteProjectContract::new(self.ctx.user).validate(&project)?;

        self.ctx.store.projects.delete(project_id).await?;
        tracing::info!(project_id, user_id = self.ctx.user_id(), "Project deleted");
        Ok(project)
    }
}
