//! Who is calling, and where they land

use axum::{extract::State, Json};
use serde::Serialize;
use tr_core::traits::Id;
use tr_models::Role;
use tr_services::{LandingPage, QueryService};

use crate::extractors::{AppState, AuthenticatedUser};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub id: Id,
    pub username: String,
    pub email: String,
    pub is_superuser: bool,
    pub roles: Vec<Role>,
    pub landing: LandingPage,
    pub landing_path: &'static str,
}

/// GET /api/v1/me
pub async fn me(State(state): State<AppState>, user: AuthenticatedUser) -> Json<MeResponse> {
    let landing = QueryService::new(&*user, &state.store).landing_page();
    let AuthenticatedUser(user) = user;

    Json(MeResponse {
        id: user.id,
        roles: user.roles(),
        username: user.username,
        email: user.email,
        is_superuser: user.is_superuser,
        landing,
        landing_path: landing.path(),
    })
}
