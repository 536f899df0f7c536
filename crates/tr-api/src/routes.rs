//! API routes

use axum::{
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::extractors::AppState;
use crate::handlers::{issues, projects, qa, session};

/// Create the complete API router
pub fn router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_router())
}

fn api_v1_router() -> Router<AppState> {
    Router::new()
        .route("/", get(api_root))
        .route("/me", get(session::me))
        .nest("/projects", projects_router())
        .nest("/issues", issues_router())
        .nest("/qa", qa_router())
}

fn projects_router() -> Router<AppState> {
    Router::new()
        .route("/", get(projects::list_projects).post(projects::create_project))
        .route("/available", get(projects::available_projects))
        .route("/mine", get(projects::my_projects))
        .route("/qa-reported", get(projects::qa_reported_projects))
        .route(
            "/:id",
            get(projects::get_project)
                .patch(projects::update_project)
                .delete(projects::delete_project),
        )
        .route("/:id/pick", post(projects::pick_project))
        .route("/:id/status", post(projects::update_project_status))
        .route(
            "/:id/issues",
            get(projects::project_issues).post(projects::create_issue),
        )
        .route("/:id/raise-issue", post(projects::raise_issue))
}

fn issues_router() -> Router<AppState> {
    Router::new()
        .route("/assigned", get(issues::assigned_issues))
        .route("/developer", get(issues::developer_issues))
        .route("/qa-reported", get(issues::qa_reported_issues))
        .route("/assignees", get(issues::assignee_candidates))
        .route("/:id", get(issues::get_issue))
        .route("/:id/status", post(issues::update_issue_status))
}

fn qa_router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(qa::dashboard))
        .route("/projects", get(qa::my_projects))
        .route("/projects/available", get(qa::available_projects))
        .route("/projects/:id", get(qa::project_detail))
        .route("/projects/:id/pick", post(qa::pick_project))
        .route("/projects/:id/start-testing", post(qa::start_testing))
}

async fn api_root() -> Json<ApiRoot> {
    Json(ApiRoot {
        instance_name: "Issue Tracker RS",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiRoot {
    instance_name: &'static str,
    version: &'static str,
}
