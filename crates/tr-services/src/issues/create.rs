//! Create Service for Issues

use tr_contracts::issues::CreateIssueContract;
use tr_contracts::{Contract, UserContext};
use tr_core::error::TrackerError;
use tr_core::result::TrackerResult;
use tr_core::traits::Id;
use tr_db::{Store, UpdateProjectDto};
use tr_models::{CreateIssueDto, Issue, IssuePriority, Project};

use super::candidates::AssigneeCandidatesService;
use super::IssueParams;
use crate::base::ServiceContext;
use crate::result::ServiceResult;

/// Creates an issue through the issue form. QA members and Managers only.
pub struct CreateIssueService<'a, U: UserContext> {
    ctx: ServiceContext<'a, U>,
}

impl<'a, U: UserContext> CreateIssueService<'a, U> {
    pub fn new(user: &'a U, store: &'a Store) -> Self {
        Self {
            ctx: ServiceContext::new(user, store),
        }
    }

    pub async fn call(
        self,
        project_id: Id,
        params: IssueParams,
    ) -> TrackerResult<ServiceResult<Issue>> {
        let outcome = self.create(project_id, params).await;
        Ok(self
            .ctx
            .finish("create_issue", outcome)?
            .with_success_message("Issue created successfully."))
    }

    async fn create(&self, project_id: Id, params: IssueParams) -> TrackerResult<Issue> {
        if !CreateIssueContract::new(self.ctx.user, &[]).user_allowed() {
            return Err(TrackerError::permission_denied(
                "Only QA or Manager can create issues.",
            ));
        }

        let project = self.ctx.load_project(project_id).await?;
        let priority = match params.priority.as_deref() {
            Some(priority) => priority.parse()?,
            None => IssuePriority::default(),
        };

        let candidates: Vec<Id> = AssigneeCandidatesService::new(self.ctx.user, self.ctx.store)
            .candidates()
            .await?
            .iter()
            .map(|user| user.id)
            .collect();

        let dto = CreateIssueDto::new(
            project_id,
            self.ctx.user_id(),
            params.title,
            params.description,
        )
        .with_priority(priority)
        .with_assignee(params.assigned_to);
        CreateIssueContract::new(self.ctx.user, &candidates).validate(&dto)?;

        let issue = self.ctx.store.issues.create(dto).await?;
        flag_issues(self.ctx.store, &project).await?;
        tracing::info!(
            issue_id = issue.id,
            project_id,
            user_id = self.ctx.user_id(),
            "Issue created"
        );
        Ok(issue)
    }
}

/// Mark the project as having issues, once
pub(crate) async fn flag_issues(store: &Store, project: &Project) -> TrackerResult<()> {
    if !project.has_issues {
        store
            .projects
            .update(project.id, UpdateProjectDto::flag_issues())
            .await?;
    }
    Ok(())
}
