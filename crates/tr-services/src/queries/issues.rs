use tr_contracts::UserContext;
use tr_core::result::TrackerResult;
use tr_core::traits::Id;
use tr_db::IssueFilter;
use tr_models::Issue;

use super::QueryService;
use crate::result::ServiceResult;

impl<'a, U: UserContext> QueryService<'a, U> {
    /// Issues in the projects the viewer picked
    pub async fn developer_issues(&self) -> TrackerResult<ServiceResult<Vec<Issue>>> {
        let outcome = self
            .issues(IssueFilter::in_projects_picked_by(self.ctx.user_id()))
            .await;
        self.ctx.finish("developer_issues", outcome)
    }

    /// The viewer's queue: every issue assigned to them
    pub async fn assigned_issues(&self) -> TrackerResult<ServiceResult<Vec<Issue>>> {
        let outcome = self
            .issues(IssueFilter::assigned_to(self.ctx.user_id()))
            .await;
        self.ctx.finish("assigned_issues", outcome)
    }

    /// Issues raised by QA and assigned to the viewer. Developers only.
    pub async fn qa_reported_issues(&self) -> TrackerResult<ServiceResult<Vec<Issue>>> {
        let outcome = match self.require_developer() {
            Ok(()) => {
                self.issues(IssueFilter::reported_to(self.ctx.user_id()))
                    .await
            }
            Err(err) => Err(err),
        };
        self.ctx.finish("qa_reported_issues", outcome)
    }

    /// Every issue
    pub async fn qa_dashboard(&self) -> TrackerResult<ServiceResult<Vec<Issue>>> {
        let outcome = self.issues(IssueFilter::all()).await;
        self.ctx.finish("qa_dashboard", outcome)
    }

    pub async fn issue_detail(&self, issue_id: Id) -> TrackerResult<ServiceResult<Issue>> {
        let outcome = self.ctx.load_issue(issue_id).await;
        self.ctx.finish("issue_detail", outcome)
    }

    pub async fn issues_for_project(
        &self,
        project_id: Id,
    ) -> TrackerResult<ServiceResult<Vec<Issue>>> {
        let outcome = match self.ctx.load_project(project_id).await {
            Ok(_) => self.issues(IssueFilter::for_project(project_id)).await,
            Err(err) => Err(err),
        };
        self.ctx.finish("issues_for_project", outcome)
    }

    async fn issues(&self, filter: IssueFilter) -> TrackerResult<Vec<Issue>> {
        let issues = self.ctx.store.issues.query(filter).await?;
        tracing::debug!(count = issues.len(), "Listed issues");
        Ok(issues)
    }
}
