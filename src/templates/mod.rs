mod dto;
pub mod handlers;
pub mod repo;
pub mod repo_types;
mod services;
pub mod suggestions;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::crud_routes())
        .merge(handlers::suggestion_routes())
}
