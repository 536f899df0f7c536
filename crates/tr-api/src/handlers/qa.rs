//! QA API handlers

use axum::{extract::State, response::IntoResponse};
use tr_core::traits::Id;
use tr_services::projects::{QaPickProjectService, StartTestingService};
use tr_services::QueryService;

use crate::error::{ApiResult, ServiceResponse};
use crate::extractors::{ApiPath, AppState, AuthenticatedUser};

/// GET /api/v1/qa/dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<impl IntoResponse> {
    let result = QueryService::new(&*user, &state.store).qa_dashboard().await?;
    Ok(ServiceResponse::ok(result))
}

/// GET /api/v1/qa/projects
pub async fn my_projects(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<impl IntoResponse> {
    let result = QueryService::new(&*user, &state.store).qa_projects().await?;
    Ok(ServiceResponse::ok(result))
}

/// GET /api/v1/qa/projects/available
pub async fn available_projects(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<impl IntoResponse> {
    let result = QueryService::new(&*user, &state.store)
        .qa_available_projects()
        .await?;
    Ok(ServiceResponse::ok(result))
}

/// GET /api/v1/qa/projects/:id
pub async fn project_detail(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ApiPath(id): ApiPath<Id>,
) -> ApiResult<impl IntoResponse> {
    let result = QueryService::new(&*user, &state.store)
        .qa_project_detail(id)
        .await?;
    Ok(ServiceResponse::ok(result))
}

/// POST /api/v1/qa/projects/:id/pick
pub async fn pick_project(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ApiPath(id): ApiPath<Id>,
) -> ApiResult<impl IntoResponse> {
    let result = QaPickProjectService::new(&*user, &state.store)
        .call(id)
        .await?;
    Ok(ServiceResponse::ok(result))
}

/// POST /api/v1/qa/projects/:id/start-testing
pub async fn start_testing(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ApiPath(id): ApiPath<Id>,
) -> ApiResult<impl IntoResponse> {
    let result = StartTestingService::new(&*user, &state.store)
        .call(id)
        .await?;
    Ok(ServiceResponse::ok(result))
}
