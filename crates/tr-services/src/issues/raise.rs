//! Raise Service for Issues

use tr_contracts::issues::RaiseIssueContract;
use tr_contracts::{Contract, UserContext};
use tr_core::result::TrackerResult;
use tr_core::traits::Id;
use tr_db::Store;
use tr_models::{CreateIssueDto, Issue, IssuePriority};

use super::create::flag_issues;
use super::RaiseIssueParams;
use crate::base::ServiceContext;
use crate::result::ServiceResult;

/// The QA member assigned to a project reports an issue against it.
///
/// Raised issues start open with medium priority and remember their reporter.
pub struct RaiseIssueService<'a, U: UserContext> {
    ctx: ServiceContext<'a, U>,
}

impl<'a, U: UserContext> RaiseIssueService<'a, U> {
    pub fn new(user: &'a U, store: &'a Store) -> Self {
        Self {
            ctx: ServiceContext::new(user, store),
        }
    }

    pub async fn call(
        self,
        project_id: Id,
        params: RaiseIssueParams,
    ) -> TrackerResult<ServiceResult<Issue>> {
        let outcome = self.raise(project_id, params).await;
        Ok(self
            .ctx
            .finish("raise_issue", outcome)?
            .with_success_message("Issue raised successfully."))
    }

    async fn raise(&self, project_id: Id, params: RaiseIssueParams) -> TrackerResult<Issue> {
        let project = self.ctx.load_project(project_id).await?;

        let user_id = self.ctx.user_id();
        let dto = CreateIssueDto::new(project_id, user_id, params.title, params.description)
            .with_priority(IssuePriority::Medium)
            .reported_by(user_id);
        RaiseIssueContract::new(self.ctx.user, &project).validate(&dto)?;

        let issue = self.ctx.store.issues.create(dto).await?;
        flag_issues(self.ctx.store, &project).await?;
        tracing::info!(issue_id = issue.id, project_id, user_id, "Issue raised");
        Ok(issue)
    }
}
