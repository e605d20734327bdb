use axum::{extract::State, routing::get, Json, Router};
use tracing::instrument;

use crate::{
    auth::extractors::AuthUser,
    errors::{AppError, AppResult},
    state::AppState,
};

use super::dto::{DashboardResponse, DashboardUser, Metrics};
use super::repo_types::{MonthlyCount, MonthlyTotal, NamedValue};

pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(get_dashboard))
        .route("/dashboard/metrics", get(get_metrics))
        .route("/dashboard/subscriptions", get(get_subscriptions))
        .route("/dashboard/revenue", get(get_revenue))
        .route("/dashboard/revenue-source", get(get_revenue_source))
}

#[instrument(skip(state))]
pub async fn get_dashboard(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<DashboardResponse>> {
    let user = state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or(AppError::NotFound("User not found"))?;

    Ok(Json(DashboardResponse {
        message: "Dashboard data fetched successfully",
        user: DashboardUser {
            email: user.email,
            website_preferences: user.website_preferences,
            created_at: user.created_at,
        },
    }))
}

// Metrics are global: the caller must be signed in but results are not scoped to them.

#[instrument(skip(state, _user))]
pub async fn get_metrics(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<Metrics>> {
    let total_users = state.users.count().await?;
    let total_templates = state.templates.count().await?;
    let totals = state.metrics.totals().await?;
    Ok(Json(Metrics::new(total_users, total_templates, totals)))
}

#[instrument(skip(state, _user))]
pub async fn get_subscriptions(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<Vec<MonthlyCount>>> {
    Ok(Json(state.metrics.subscriptions_by_month().await?))
}

#[instrument(skip(state, _user))]
pub async fn get_revenue(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<Vec<MonthlyTotal>>> {
    Ok(Json(state.metrics.revenue_by_month().await?))
}

#[instrument(skip(state, _user))]
pub async fn get_revenue_source(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<Vec<NamedValue>>> {
    Ok(Json(state.metrics.revenue_by_source().await?))
}
