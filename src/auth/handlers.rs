use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::{
        dto::{
            AuthResponse, ChangePasswordRequest, DescriptionResponse, LoginRequest,
            MessageResponse, PreferencesInput, PreferencesResponse, RegisterRequest,
            UpdateDescriptionRequest, UserSummary,
        },
        extractors::AuthUser,
        repo_types::User,
        services::{
            authenticate, change_password as change_user_password, merge_preferences,
            register_user, validate_description, validate_registration,
        },
    },
    errors::{AppError, AppResult},
    extract::JsonBody,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/user", get(get_user))
        .route("/auth/user/preferences", put(update_preferences))
        .route("/auth/user/description", put(update_description))
        .route("/auth/user/change-password", put(change_password))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let registration = validate_registration(payload)?;
    let user = register_user(state.users.as_ref(), registration).await?;
    let token = state.keys.issue(user.id)?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User registered successfully",
            user,
            token,
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let user = authenticate(state.users.as_ref(), &payload.email, &payload.password).await?;
    let token = state.keys.issue(user.id)?;

    Ok(Json(AuthResponse {
        message: "Login successful",
        user,
        token,
    }))
}

async fn load_user(state: &AppState, user_id: uuid::Uuid) -> AppResult<User> {
    state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or(AppError::NotFound("User not found"))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<UserSummary>> {
    let user = load_user(&state, user_id).await?;
    Ok(Json(UserSummary {
        email: user.email,
        website_preferences: user.website_preferences,
        description: user.description,
    }))
}

#[instrument(skip(state, payload))]
pub async fn update_preferences(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    JsonBody(payload): JsonBody<PreferencesInput>,
) -> AppResult<Json<PreferencesResponse>> {
    let user = load_user(&state, user_id).await?;

    let mut errors = Vec::new();
    let prefs = merge_preferences(
        user.website_preferences,
        &payload,
        ("theme", "layout"),
        &mut errors,
    );
    AppError::check(errors)?;

    let updated = state
        .users
        .update_preferences(user_id, &prefs)
        .await?
        .ok_or(AppError::NotFound("User not found"))?;

    info!(user_id = %user_id, "preferences updated");
    Ok(Json(PreferencesResponse {
        message: "Preferences updated successfully",
        website_preferences: updated.website_preferences,
    }))
}

#[instrument(skip(state, payload))]
pub async fn update_description(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    JsonBody(payload): JsonBody<UpdateDescriptionRequest>,
) -> AppResult<Json<DescriptionResponse>> {
    let description = validate_description(payload.description)?;
    let updated = state
        .users
        .update_description(user_id, &description)
        .await?
        .ok_or(AppError::NotFound("User not found"))?;

    info!(user_id = %user_id, "description updated");
    Ok(Json(DescriptionResponse {
        message: "Description updated successfully",
        description: updated.description,
    }))
}

#[instrument(skip(state, payload))]
pub async fn change_password(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    JsonBody(payload): JsonBody<ChangePasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    change_user_password(
        state.users.as_ref(),
        user_id,
        &payload.current_password,
        &payload.new_password,
    )
    .await?;
    Ok(Json(MessageResponse {
        message: "Password updated successfully",
    }))
}
