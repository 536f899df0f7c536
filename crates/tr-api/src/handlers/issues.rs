//! Issue API handlers

use axum::{extract::State, response::IntoResponse};
use tr_core::traits::Id;
use tr_services::issues::{AssigneeCandidatesService, UpdateIssueStatusService};
use tr_services::QueryService;

use super::StatusBody;
use crate::error::{ApiResult, ServiceResponse};
use crate::extractors::{ApiJson, ApiPath, AppState, AuthenticatedUser};

/// GET /api/v1/issues/:id
pub async fn get_issue(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ApiPath(id): ApiPath<Id>,
) -> ApiResult<impl IntoResponse> {
    let result = QueryService::new(&*user, &state.store)
        .issue_detail(id)
        .await?;
    Ok(ServiceResponse::ok(result))
}

/// POST /api/v1/issues/:id/status
pub async fn update_issue_status(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ApiPath(id): ApiPath<Id>,
    ApiJson(body): ApiJson<StatusBody>,
) -> ApiResult<impl IntoResponse> {
    let result = UpdateIssueStatusService::new(&*user, &state.store)
        .call(id, &body.status)
        .await?;
    Ok(ServiceResponse::ok(result))
}

/// GET /api/v1/issues/assigned
pub async fn assigned_issues(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<impl IntoResponse> {
    let result = QueryService::new(&*user, &state.store)
        .assigned_issues()
        .await?;
    Ok(ServiceResponse::ok(result))
}

/// GET /api/v1/issues/developer
pub async fn developer_issues(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<impl IntoResponse> {
    let result = QueryService::new(&*user, &state.store)
        .developer_issues()
        .await?;
    Ok(ServiceResponse::ok(result))
}

/// GET /api/v1/issues/qa-reported
pub async fn qa_reported_issues(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<impl IntoResponse> {
    let result = QueryService::new(&*user, &state.store)
        .qa_reported_issues()
        .await?;
    Ok(ServiceResponse::ok(result))
}

/// GET /api/v1/issues/assignees
pub async fn assignee_candidates(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<impl IntoResponse> {
    let result = AssigneeCandidatesService::new(&*user, &state.store)
        .call()
        .await?;
    Ok(ServiceResponse::ok(result))
}
