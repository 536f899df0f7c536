//! Project API handlers

use axum::{extract::State, response::IntoResponse};
use tr_core::traits::Id;
use tr_models::EditProjectDto;
use tr_services::issues::{CreateIssueService, IssueParams, RaiseIssueParams, RaiseIssueService};
use tr_services::projects::{
    CreateProjectService, DeleteProjectService, PickProjectService, ProjectParams,
    UpdateProjectService, UpdateProjectStatusService,
};
use tr_services::QueryService;

use super::StatusBody;
use crate::error::{ApiResult, ServiceResponse};
use crate::extractors::{ApiJson, ApiPath, AppState, AuthenticatedUser};

/// GET /api/v1/projects
pub async fn list_projects(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<impl IntoResponse> {
    let result = QueryService::new(&*user, &state.store).all_projects().await?;
    Ok(ServiceResponse::ok(result))
}

/// POST /api/v1/projects
pub async fn create_project(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ApiJson(params): ApiJson<ProjectParams>,
) -> ApiResult<impl IntoResponse> {
    let result = CreateProjectService::new(&*user, &state.store)
        .call(params)
        .await?;
    Ok(ServiceResponse::created(result))
}

/// GET /api/v1/projects/:id
pub async fn get_project(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ApiPath(id): ApiPath<Id>,
) -> ApiResult<impl IntoResponse> {
    let result = QueryService::new(&*user, &state.store)
        .project_detail(id)
        .await?;
    Ok(ServiceResponse::ok(result))
}

/// PATCH /api/v1/projects/:id
pub async fn update_project(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ApiPath(id): ApiPath<Id>,
    ApiJson(params): ApiJson<EditProjectDto>,
) -> ApiResult<impl IntoResponse> {
    let result = UpdateProjectService::new(&*user, &state.store)
        .call(id, params)
        .await?;
    Ok(ServiceResponse::ok(result))
}

/// DELETE /api/v1/projects/:id
pub async fn delete_project(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ApiPath(id): ApiPath<Id>,
) -> ApiResult<impl IntoResponse> {
    let result = DeleteProjectService::new(&*user, &state.store)
        .call(id)
        .await?;
    Ok(ServiceResponse::ok(result))
}

/// GET /api/v1/projects/available
pub async fn available_projects(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<impl IntoResponse> {
    let result = QueryService::new(&*user, &state.store)
        .available_projects()
        .await?;
    Ok(ServiceResponse::ok(result))
}

/// GET /api/v1/projects/mine
pub async fn my_projects(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<impl IntoResponse> {
    let result = QueryService::new(&*user, &state.store).my_projects().await?;
    Ok(ServiceResponse::ok(result))
}

/// GET /api/v1/projects/qa-reported
pub async fn qa_reported_projects(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<impl IntoResponse> {
    let result = QueryService::new(&*user, &state.store)
        .qa_reported_projects()
        .await?;
    Ok(ServiceResponse::ok(result))
}

/// POST /api/v1/projects/:id/pick
pub async fn pick_project(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ApiPath(id): ApiPath<Id>,
) -> ApiResult<impl IntoResponse> {
    let result = PickProjectService::new(&*user, &state.store).call(id).await?;
    Ok(ServiceResponse::ok(result))
}

/// POST /api/v1/projects/:id/status
pub async fn update_project_status(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ApiPath(id): ApiPath<Id>,
    ApiJson(body): ApiJson<StatusBody>,
) -> ApiResult<impl IntoResponse> {
    let result = UpdateProjectStatusService::new(&*user, &state.store)
        .call(id, &body.status)
        .await?;
    Ok(ServiceResponse::ok(result))
}

/// GET /api/v1/projects/:id/issues
pub async fn project_issues(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ApiPath(id): ApiPath<Id>,
) -> ApiResult<impl IntoResponse> {
    let result = QueryService::new(&*user, &state.store)
        .issues_for_project(id)
        .await?;
    Ok(ServiceResponse::ok(result))
}

/// POST /api/v1/projects/:id/issues
pub async fn create_issue(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ApiPath(id): ApiPath<Id>,
    ApiJson(params): ApiJson<IssueParams>,
) -> ApiResult<impl IntoResponse> {
    let result = CreateIssueService::new(&*user, &state.store)
        .call(id, params)
        .await?;
    Ok(ServiceResponse::created(result))
}

/// POST /api/v1/projects/:id/raise-issue
pub async fn raise_issue(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ApiPath(id): ApiPath<Id>,
    ApiJson(params): ApiJson<RaiseIssueParams>,
) -> ApiResult<impl IntoResponse> {
    let result = RaiseIssueService::new(&*user, &state.store)
        .call(id, params)
        .await?;
    Ok(ServiceResponse::created(result))
}
