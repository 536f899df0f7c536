//! QA services for projects

use tr_contracts::projects::{QaPickProjectContract, StartTestingContract};
use tr_contracts::{Contract, UserContext};
use tr_core::result::TrackerResult;
use tr_core::traits::Id;
use tr_db::{Store, UpdateProjectDto};
use tr_models::{Project, ProjectStatus};

use crate::base::ServiceContext;
use crate::result::ServiceResult;

/// A QA member forces a project into progress, whatever its current status.
pub struct StartTestingService<'a, U: UserContext> {
    ctx: ServiceContext<'a, U>,
}

impl<'a, U: UserContext> StartTestingService<'a, U> {
    pub fn new(user: &'a U, store: &'a Store) -> Self {
        Self {
            ctx: ServiceContext::new(user, store),
        }
    }

    pub async fn call(self, project_id: Id) -> TrackerResult<ServiceResult<Project>> {
        let outcome = self.start(project_id).await;
        Ok(self
            .ctx
            .finish("start_testing", outcome)?
            .with_success_message("You have started testing the project."))
    }

    async fn start(&self, project_id: Id) -> TrackerResult<Project> {
        let project = self.ctx.load_project(project_id).await?;
        let contract = StartTestingContract::new(self.ctx.user);
        contract.validate(&project)?;

        let dto = UpdateProjectDto::status(ProjectStatus::InProgress);
        contract.validate_writable(&dto.changed_attributes())?;
        let project = self.ctx.store.projects.update(project_id, dto).await?;
        tracing::info!(project_id, user_id = self.ctx.user_id(), "Testing started");
        Ok(project)
    }
}

/// A QA member takes a project for testing.
///
/// Assignment and the move to in progress happen in one conditional write.
pub struct QaPickProjectService<'a, U: UserContext> {
    ctx: ServiceContext<'a, U>,
}

impl<'a, U: UserContext> QaPickProjectService<'a, U> {
    pub fn new(user: &'a U, store: &'a Store) -> Self {
        Self {
            ctx: ServiceContext::new(user, store),
        }
    }

    pub async fn call(self, project_id: Id) -> TrackerResult<ServiceResult<Project>> {
        let outcome = self.pick(project_id).await;
        Ok(self
            .ctx
            .finish("qa_pick_project", outcome)?
            .with_success_message("Project assigned to you and marked as In Progress."))
    }

    async fn pick(&self, project_id: Id) -> TrackerResult<Project> {
        let project = self.ctx.load_project(project_id).await?;
        let contract = QaPickProjectContract::new(self.ctx.user);
        contract.validate(&project)?;

        let user_id = self.ctx.user_id();
        let dto = UpdateProjectDto::qa_pick(user_id);
        contract.validate_writable(&dto.changed_attributes())?;
        let project = self.ctx.store.projects.update(project_id, dto).await?;
        tracing::info!(project_id, user_id, "Project assigned to QA");
        Ok(project)
    }
}
