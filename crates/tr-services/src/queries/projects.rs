use tr_contracts::projects::can_manage;
use tr_contracts::UserContext;
use tr_core::error::TrackerError;
use tr_core::result::TrackerResult;
use tr_core::traits::{Entity, Id};
use tr_db::{IssueFilter, ProjectFilter};
use tr_models::{Project, ProjectStatus, Role};

use super::{ProjectDetail, ProjectSummary, QueryService};
use crate::result::ServiceResult;

impl<'a, U: UserContext> QueryService<'a, U> {
    /// Every project
    pub async fn all_projects(&self) -> TrackerResult<ServiceResult<Vec<Project>>> {
        let outcome = self.projects(ProjectFilter::all()).await;
        self.ctx.finish("all_projects", outcome)
    }

    /// Projects a developer may browse and pick. Developers only.
    pub async fn available_projects(&self) -> TrackerResult<ServiceResult<Vec<Project>>> {
        let outcome = match self.require_developer() {
            Ok(()) => self.projects(ProjectFilter::all()).await,
            Err(err) => Err(err),
        };
        self.ctx.finish("available_projects", outcome)
    }

    pub async fn project_detail(&self, project_id: Id) -> TrackerResult<ServiceResult<ProjectDetail>> {
        let outcome = self.detail(project_id, false).await;
        self.ctx.finish("project_detail", outcome)
    }

    /// Projects the viewer picked, with their open issue counts
    pub async fn my_projects(&self) -> TrackerResult<ServiceResult<Vec<ProjectSummary>>> {
        let outcome = self.summaries().await;
        self.ctx.finish("my_projects", outcome)
    }

    /// Distinct projects of the issues QA raised and assigned to the viewer.
    /// Developers only.
    pub async fn qa_reported_projects(&self) -> TrackerResult<ServiceResult<Vec<Project>>> {
        let outcome = self.reported_projects().await;
        self.ctx.finish("qa_reported_projects", outcome)
    }

    /// Projects still open for testing
    pub async fn qa_available_projects(&self) -> TrackerResult<ServiceResult<Vec<Project>>> {
        let filter = ProjectFilter::with_statuses(&[ProjectStatus::Open, ProjectStatus::InProgress]);
        let outcome = self.projects(filter).await;
        self.ctx.finish("qa_available_projects", outcome)
    }

    /// Projects the viewer is testing
    pub async fn qa_projects(&self) -> TrackerResult<ServiceResult<Vec<Project>>> {
        let outcome = self
            .projects(ProjectFilter::qa_assigned_to(self.ctx.user_id()))
            .await;
        self.ctx.finish("qa_projects", outcome)
    }

    /// Like [`Self::project_detail`], but a project the viewer is not testing
    /// is reported as missing.
    pub async fn qa_project_detail(
        &self,
        project_id: Id,
    ) -> TrackerResult<ServiceResult<ProjectDetail>> {
        let outcome = self.detail(project_id, true).await;
        self.ctx.finish("qa_project_detail", outcome)
    }

    pub(super) fn require_developer(&self) -> TrackerResult<()> {
        if self.ctx.user.has_role(Role::Developer) {
            Ok(())
        } else {
            Err(TrackerError::permission_denied(
                "Only developers can view this page",
            ))
        }
    }

    async fn projects(&self, filter: ProjectFilter) -> TrackerResult<Vec<Project>> {
        let projects = self.ctx.store.projects.query(filter).await?;
        tracing::debug!(count = projects.len(), "Listed projects");
        Ok(projects)
    }

    async fn detail(&self, project_id: Id, tested_only: bool) -> TrackerResult<ProjectDetail> {
        let project = self.ctx.load_project(project_id).await?;
        if tested_only && !project.is_qa_assigned_to(self.ctx.user_id()) {
            return Err(TrackerError::not_found(Project::TYPE_NAME, project_id));
        }

        let issues = self
            .ctx
            .store
            .issues
            .query(IssueFilter::for_project(project_id))
            .await?;
        let can_edit = can_manage(self.ctx.user, &project);

        Ok(ProjectDetail {
            project,
            issues,
            can_edit,
        })
    }

    async fn summaries(&self) -> TrackerResult<Vec<ProjectSummary>> {
        let projects = self
            .projects(ProjectFilter::picked_by(self.ctx.user_id()))
            .await?;

        let mut summaries = Vec::with_capacity(projects.len());
        for project in projects {
            let open_issues = self
                .ctx
                .store
                .issues
                .count(IssueFilter::open_in_project(project.id))
                .await?;
            summaries.push(ProjectSummary {
                project,
                open_issues,
            });
        }
        Ok(summaries)
    }

    async fn reported_projects(&self) -> TrackerResult<Vec<Project>> {
        self.require_developer()?;

        let issues = self
            .ctx
            .store
            .issues
            .query(IssueFilter::reported_to(self.ctx.user_id()))
            .await?;
        let mut ids: Vec<Id> = issues.iter().map(|issue| issue.project_id).collect();
        ids.sort_unstable();
        ids.dedup();

        self.projects(ProjectFilter::with_ids(ids)).await
    }
}

#[cfg(test)]
mod tests {
    use crate::projects::{PickProjectService, QaPickProjectService};
    use crate::queries::QueryService;
    use crate::test_support::{Fixture, DEV1, DEV2, MANAGER, QA1, QA2};
    use tr_core::error::ErrorKind;
    use tr_db::{UpdateIssueDto, UpdateProjectDto};
    use tr_models::{CreateIssueDto, IssueStatus, ProjectStatus};

    #[tokio::test]
    async fn test_all_projects_newest_first() {
        let fixture = Fixture::new();
        let first = fixture.project("First").await;
        let second = fixture.project("Second").await;
        let outsider = fixture.user(crate::test_support::OUTSIDER);

        let result = QueryService::new(&outsider, &fixture.store)
            .all_projects()
            .await
            .unwrap();
        let ids: Vec<_> = result.result().unwrap().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn test_available_projects_developers_only() {
        let fixture = Fixture::new();
        fixture.project("P1").await;

        let dev = fixture.user(DEV1);
        let result = QueryService::new(&dev, &fixture.store)
            .available_projects()
            .await
            .unwrap();
        assert_eq!(result.result().unwrap().len(), 1);

        let qa = fixture.user(QA1);
        let result = QueryService::new(&qa, &fixture.store)
            .available_projects()
            .await
            .unwrap();
        assert_eq!(result.error_kind(), Some(ErrorKind::PermissionDenied));
    }

    #[tokio::test]
    async fn test_project_detail_can_edit() {
        let fixture = Fixture::new();
        let project = fixture.project("P1").await;
        fixture
            .store
            .issues
            .create(CreateIssueDto::new(project.id, MANAGER, "Crash", "Boom"))
            .await
            .unwrap();

        let manager = fixture.manager();
        let detail = QueryService::new(&manager, &fixture.store)
            .project_detail(project.id)
            .await
            .unwrap()
            .into_result()
            .unwrap();
        assert!(detail.can_edit);
        assert_eq!(detail.issues.len(), 1);

        let dev = fixture.user(DEV1);
        let detail = QueryService::new(&dev, &fixture.store)
            .project_detail(project.id)
            .await
            .unwrap()
            .into_result()
            .unwrap();
        assert!(!detail.can_edit);
    }

    #[tokio::test]
    async fn test_my_projects_counts_open_issues() {
        let fixture = Fixture::new();
        let project = fixture.project("P1").await;
        fixture.project("P2").await;
        let dev = fixture.user(DEV1);
        PickProjectService::new(&dev, &fixture.store)
            .call(project.id)
            .await
            .unwrap();

        let issues = &fixture.store.issues;
        let open = issues
            .create(CreateIssueDto::new(project.id, MANAGER, "A", "a"))
            .await
            .unwrap();
        let closed = issues
            .create(CreateIssueDto::new(project.id, MANAGER, "B", "b"))
            .await
            .unwrap();
        issues
            .update(closed.id, UpdateIssueDto::status(IssueStatus::Closed))
            .await
            .unwrap();

        let summaries = QueryService::new(&dev, &fixture.store)
            .my_projects()
            .await
            .unwrap()
            .into_result()
            .unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].project.id, open.project_id);
        assert_eq!(summaries[0].open_issues, 1);
    }

    #[tokio::test]
    async fn test_qa_reported_projects_are_distinct() {
        let fixture = Fixture::new();
        let p1 = fixture.project("P1").await;
        let p2 = fixture.project("P2").await;
        let p3 = fixture.project("P3").await;

        let issues = &fixture.store.issues;
        for (project_id, assignee) in [(p1.id, DEV1), (p1.id, DEV1), (p2.id, DEV2), (p3.id, DEV1)] {
            issues
                .create(
                    CreateIssueDto::new(project_id, QA1, "Crash", "Boom")
                        .with_assignee(Some(assignee))
                        .reported_by(QA1),
                )
                .await
                .unwrap();
        }
        issues
            .create(CreateIssueDto::new(p2.id, MANAGER, "Unreported", "x").with_assignee(Some(DEV1)))
            .await
            .unwrap();

        let dev = fixture.user(DEV1);
        let projects = QueryService::new(&dev, &fixture.store)
            .qa_reported_projects()
            .await
            .unwrap()
            .into_result()
            .unwrap();
        let ids: Vec<_> = projects.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![p3.id, p1.id]);
    }

    #[tokio::test]
    async fn test_qa_available_projects_skip_completed() {
        let fixture = Fixture::new();
        let open = fixture.project("Open").await;
        let done = fixture.project("Done").await;
        fixture
            .store
            .projects
            .update(done.id, UpdateProjectDto::status(ProjectStatus::Completed))
            .await
            .unwrap();

        let qa = fixture.user(QA1);
        let projects = QueryService::new(&qa, &fixture.store)
            .qa_available_projects()
            .await
            .unwrap()
            .into_result()
            .unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].id, open.id);
    }

    #[tokio::test]
    async fn test_qa_project_detail_scoped_to_tester() {
        let fixture = Fixture::new();
        let project = fixture.project("P1").await;
        let (qa1, qa2) = (fixture.user(QA1), fixture.user(QA2));
        QaPickProjectService::new(&qa1, &fixture.store)
            .call(project.id)
            .await
            .unwrap();

        let mine = QueryService::new(&qa1, &fixture.store)
            .qa_projects()
            .await
            .unwrap()
            .into_result()
            .unwrap();
        assert_eq!(mine.len(), 1);

        let detail = QueryService::new(&qa1, &fixture.store)
            .qa_project_detail(project.id)
            .await
            .unwrap();
        assert!(detail.is_success());

        let hidden = QueryService::new(&qa2, &fixture.store)
            .qa_project_detail(project.id)
            .await
            .unwrap();
        assert_eq!(hidden.error_kind(), Some(ErrorKind::NotFound));
    }
}
