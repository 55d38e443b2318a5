use crate::state::AppState;
use axum::Router;

pub mod dto;
pub mod errors;
pub mod extractors;
pub mod handlers;
#[cfg(test)]
pub(crate) mod memory;
pub mod pagination;
pub mod repo;
pub mod repo_types;
pub mod response;
pub mod services;
pub mod validation;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::auth_routes())
        .merge(handlers::user_routes())
}
