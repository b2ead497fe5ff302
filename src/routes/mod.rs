use axum::Router;

use crate::state::AppState;

pub mod admin;
pub mod auth;
pub mod community;
pub mod doc;
pub mod health;
pub mod plugin;
pub mod shop;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/shop", shop::router())
        .nest("/plugin", plugin::router())
        .nest("/admin", admin::router())
        .merge(community::router())
}
