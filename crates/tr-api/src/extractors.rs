//! Axum extractors for API handlers

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRef, FromRequest, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use tr_auth::{extract_bearer_token, CurrentUser, DirectoryRoleResolver, JwtService, RoleResolver};
use tr_db::Store;

use crate::error::ApiError;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub resolver: Arc<dyn RoleResolver>,
    pub jwt: Arc<JwtService>,
}

impl AppState {
    /// State whose roles are resolved from the store's own user directory
    pub fn new(store: Store, jwt: JwtService) -> Self {
        let resolver = DirectoryRoleResolver::new(store.users.clone());
        Self {
            store,
            resolver: Arc::new(resolver),
            jwt: Arc::new(jwt),
        }
    }
}

/// `Json` whose rejection answers in the result-object shape
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// `Path` whose rejection answers in the result-object shape
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// Authenticated user extractor
pub struct AuthenticatedUser(pub CurrentUser);

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(extract_bearer_token)
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

        let user_id = app_state.jwt.get_user_id(token).map_err(|err| {
            tracing::debug!(error = %err, "Rejected bearer token");
            ApiError::unauthorized(err.to_string())
        })?;

        match app_state.resolver.resolve(user_id).await? {
            Some(user) => Ok(AuthenticatedUser(user)),
            None => Err(ApiError::unauthorized("Unknown or inactive user")),
        }
    }
}

impl std::ops::Deref for AuthenticatedUser {
    type Target = CurrentUser;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
