use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::extractors::AuthUser,
    errors::{AppError, AppResult, FieldError},
    extract::JsonBody,
    state::AppState,
};

use super::dto::{
    SuggestionRequest, SuggestionResponse, TemplateFields, TemplateListResponse, TemplateResponse,
};
use super::repo_types::{NewTemplate, OwnerScope};
use super::services::{parse_template_id, validate_changes, validate_new_template};
use super::suggestions::build_prompt;

const NOT_FOUND: AppError = AppError::NotFound("Template not found");

pub fn crud_routes() -> Router<AppState> {
    Router::new()
        .route("/templates", get(list_templates).post(create_template))
        .route(
            "/templates/:id",
            get(get_template)
                .put(update_template)
                .delete(delete_template),
        )
}

pub fn suggestion_routes() -> Router<AppState> {
    Router::new().route("/templates/suggestions", post(suggest_templates))
}

#[instrument(skip(state, payload))]
pub async fn create_template(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    JsonBody(payload): JsonBody<TemplateFields>,
) -> AppResult<(StatusCode, Json<TemplateResponse>)> {
    let valid = validate_new_template(&payload)?;
    let template = state
        .templates
        .create(NewTemplate {
            name: valid.name,
            style: valid.style,
            color: valid.color,
            created_by: user_id,
        })
        .await?;

    info!(user_id = %user_id, template_id = %template.id, "template created");
    Ok((
        StatusCode::CREATED,
        Json(TemplateResponse {
            message: "Template created successfully",
            template,
        }),
    ))
}

#[instrument(skip(state))]
pub async fn list_templates(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<TemplateListResponse>> {
    let templates = state.templates.list_by_owner(user_id).await?;
    Ok(Json(TemplateListResponse {
        message: "Templates fetched successfully",
        templates,
    }))
}

#[instrument(skip(state))]
pub async fn get_template(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<TemplateResponse>> {
    let scope = OwnerScope::new(parse_template_id(&id)?, user_id);
    let template = state.templates.find(scope).await?.ok_or(NOT_FOUND)?;
    Ok(Json(TemplateResponse {
        message: "Template fetched successfully",
        template,
    }))
}

#[instrument(skip(state, payload))]
pub async fn update_template(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<TemplateFields>,
) -> AppResult<Json<TemplateResponse>> {
    let scope = OwnerScope::new(parse_template_id(&id)?, user_id);
    let changes = validate_changes(&payload)?;
    let template = state
        .templates
        .update(scope, &changes)
        .await?
        .ok_or(NOT_FOUND)?;

    info!(user_id = %user_id, template_id = %template.id, "template updated");
    Ok(Json(TemplateResponse {
        message: "Template updated successfully",
        template,
    }))
}

#[instrument(skip(state))]
pub async fn delete_template(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    let scope = OwnerScope::new(parse_template_id(&id)?, user_id);
    if !state.templates.delete(scope).await? {
        return Err(NOT_FOUND);
    }

    info!(user_id = %user_id, template_id = %scope.id, "template deleted");
    Ok(Json(
        serde_json::json!({ "message": "Template deleted successfully" }),
    ))
}

/// POST /templates/suggestions: one call to the text generator, first text relayed.
#[instrument(skip(state, payload))]
pub async fn suggest_templates(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    JsonBody(payload): JsonBody<SuggestionRequest>,
) -> AppResult<Json<SuggestionResponse>> {
    let website_type = payload.website_type.as_deref().map(str::trim).unwrap_or("");
    let industry = payload.industry.as_deref().map(str::trim).unwrap_or("");

    let mut errors = Vec::new();
    if website_type.is_empty() {
        errors.push(FieldError::new("websiteType", "websiteType is required"));
    }
    if industry.is_empty() {
        errors.push(FieldError::new("industry", "industry is required"));
    }
    AppError::check(errors)?;

    let prompt = build_prompt(website_type, industry);
    let suggestions = state.generator.generate(&prompt).await?;

    info!(user_id = %user_id, "template suggestions generated");
    Ok(Json(SuggestionResponse { suggestions }))
}
