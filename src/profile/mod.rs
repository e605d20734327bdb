use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use tracing::{instrument, warn};

use crate::{
    auth::{extractors::AuthUser, repo_types::User},
    errors::{AppError, AppResult},
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: User,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/profile", get(get_profile))
}

/// GET /profile: the caller's own record, password hash excluded.
#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<ProfileResponse>> {
    let Some(user) = state.users.find_by_id(user_id).await? else {
        warn!(user_id = %user_id, "profile for unknown user");
        return Err(AppError::NotFound("User not found"));
    };
    Ok(Json(ProfileResponse { user }))
}
