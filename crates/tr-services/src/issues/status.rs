//! Status Service for Issues

use tr_contracts::issues::UpdateIssueStatusContract;
use tr_contracts::{Contract, UserContext};
use tr_core::result::TrackerResult;
use tr_core::traits::Id;
use tr_db::{Store, UpdateIssueDto};
use tr_models::{Issue, IssueStatus};

use crate::base::ServiceContext;
use crate::result::ServiceResult;

/// The assignee moves an issue through open, in progress, resolved and closed
pub struct UpdateIssueStatusService<'a, U: UserContext> {
    ctx: ServiceContext<'a, U>,
}

impl<'a, U: UserContext> UpdateIssueStatusService<'a, U> {
    pub fn new(user: &'a U, store: &'a Store) -> Self {
        Self {
            ctx: ServiceContext::new(user, store),
        }
    }

    pub async fn call(self, issue_id: Id, status: &str) -> TrackerResult<ServiceResult<Issue>> {
        let outcome = self.update(issue_id, status).await;
        Ok(self
            .ctx
            .finish("update_issue_status", outcome)?
            .with_success_message("Issue status updated successfully."))
    }

    async fn update(&self, issue_id: Id, status: &str) -> TrackerResult<Issue> {
        let issue = self.ctx.load_issue(issue_id).await?;
        let contract = UpdateIssueStatusContract::new(self.ctx.user);
        contract.validate(&issue)?;
        let status: IssueStatus = status.parse()?;

        let dto = UpdateIssueDto::status(status);
        contract.validate_writable(&dto.changed_attributes())?;
        let issue = self.ctx.store.issues.update(issue_id, dto).await?;
        tracing::info!(
            issue_id,
            user_id = self.ctx.user_id(),
            status = status.as_str(),
            "Issue status updated"
        );
        Ok(issue)
    }
}
