//! End-to-end workflows across the services

use crate::issues::{RaiseIssueParams, RaiseIssueService, UpdateIssueStatusService};
use crate::projects::{
    CreateProjectService, DeleteProjectService, PickProjectService, ProjectParams,
    QaPickProjectService,
};
use crate::queries::QueryService;
use crate::test_support::{Fixture, DEV1, DEV2, QA1, QA2};
use tr_core::error::ErrorKind;
use tr_db::IssueFilter;
use tr_models::{IssueStatus, ProjectStatus};

#[tokio::test]
async fn test_manager_developer_qa_flow() {
    let fixture = Fixture::new();
    let store = &fixture.store;
    let (manager, dev1, dev2) = (fixture.manager(), fixture.user(DEV1), fixture.user(DEV2));
    let (qa1, qa2) = (fixture.user(QA1), fixture.user(QA2));

    let p1 = CreateProjectService::new(&manager, store)
        .call(ProjectParams::new("P1"))
        .await
        .unwrap()
        .into_result()
        .unwrap();
    assert_eq!(p1.status, ProjectStatus::Open);

    let picked = PickProjectService::new(&dev1, store).call(p1.id).await.unwrap();
    assert!(picked.is_success());
    let lost = PickProjectService::new(&dev2, store).call(p1.id).await.unwrap();
    assert!(lost.is_failure());

    let tested = QaPickProjectService::new(&qa1, store).call(p1.id).await.unwrap();
    let tested = tested.result().unwrap();
    assert_eq!(tested.qa_assigned_id, Some(QA1));
    assert_eq!(tested.status, ProjectStatus::InProgress);
    assert_eq!(tested.picked_by_id, Some(DEV1));
    let late = QaPickProjectService::new(&qa2, store).call(p1.id).await.unwrap();
    assert_eq!(late.error_kind(), Some(ErrorKind::ConditionFailed));

    let issue = RaiseIssueService::new(&qa1, store)
        .call(p1.id, RaiseIssueParams::new("Crash", "App crashes on load"))
        .await
        .unwrap()
        .into_result()
        .unwrap();
    assert_eq!(issue.reported_by_id, Some(QA1));
    assert_eq!(issue.status, IssueStatus::Open);

    let denied = UpdateIssueStatusService::new(&dev1, store)
        .call(issue.id, "resolved")
        .await
        .unwrap();
    assert_eq!(denied.error_kind(), Some(ErrorKind::PermissionDenied));
    let stored = store.issues.find_by_id(issue.id).await.unwrap().unwrap();
    assert_eq!(stored.status, IssueStatus::Open);

    let detail = QueryService::new(&qa1, store)
        .qa_project_detail(p1.id)
        .await
        .unwrap()
        .into_result()
        .unwrap();
    assert!(detail.project.has_issues);
    assert_eq!(detail.issues.len(), 1);

    let deleted = DeleteProjectService::new(&manager, store).call(p1.id).await.unwrap();
    assert!(deleted.is_success());
    assert_eq!(store.issues.count(IssueFilter::all()).await.unwrap(), 0);
}
