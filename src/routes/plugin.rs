use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::plugin::{
        PendingCommandList, PlayerBalance, PlayerLookup, StatsUpdateRequest, StatsUpdated,
    },
    error::AppResult,
    middleware::api_key::PluginKey,
    response::{Ack, ApiResponse},
    services::plugin_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/pending-commands", get(pending_commands))
        .route("/command-executed/{order_id}", post(command_executed))
        .route("/player/{username}", get(player))
        .route("/balance/{username}", get(balance))
        .route("/stats/update", post(update_stats))
}

#[utoipa::path(
    get,
    path = "/api/plugin/pending-commands",
    responses(
        (status = 200, description = "Commands still to run in game", body = ApiResponse<PendingCommandList>),
        (status = 401, description = "Invalid API key")
    ),
    security(("api_key" = [])),
    tag = "Plugin"
)]
pub async fn pending_commands(
    State(state): State<AppState>,
    key: PluginKey,
) -> AppResult<Json<ApiResponse<PendingCommandList>>> {
    let resp = plugin_service::pending_commands(&state, key).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/plugin/command-executed/{order_id}",
    params(("order_id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order marked as executed", body = ApiResponse<Ack>),
        (status = 404, description = "Order not found")
    ),
    security(("api_key" = [])),
    tag = "Plugin"
)]
pub async fn command_executed(
    State(state): State<AppState>,
    key: PluginKey,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Ack>>> {
    let resp = plugin_service::acknowledge(&state, key, order_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/plugin/player/{username}",
    params(("username" = String, Path, description = "In-game name")),
    responses(
        (status = 200, description = "Whether the player has a store account", body = ApiResponse<PlayerLookup>)
    ),
    security(("api_key" = [])),
    tag = "Plugin"
)]
pub async fn player(
    State(state): State<AppState>,
    key: PluginKey,
    Path(username): Path<String>,
) -> AppResult<Json<ApiResponse<PlayerLookup>>> {
    let resp = plugin_service::lookup_player(&state, key, &username).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/plugin/balance/{username}",
    params(("username" = String, Path, description = "In-game name")),
    responses(
        (status = 200, description = "Store balance", body = ApiResponse<PlayerBalance>),
        (status = 404, description = "Player not found")
    ),
    security(("api_key" = [])),
    tag = "Plugin"
)]
pub async fn balance(
    State(state): State<AppState>,
    key: PluginKey,
    Path(username): Path<String>,
) -> AppResult<Json<ApiResponse<PlayerBalance>>> {
    let resp = plugin_service::player_balance(&state, key, &username).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/plugin/stats/update",
    request_body = StatsUpdateRequest,
    responses(
        (status = 200, description = "Leaderboard rows upserted", body = ApiResponse<StatsUpdated>),
        (status = 400, description = "Invalid data")
    ),
    security(("api_key" = [])),
    tag = "Plugin"
)]
pub async fn update_stats(
    State(state): State<AppState>,
    key: PluginKey,
    Json(payload): Json<StatsUpdateRequest>,
) -> AppResult<Json<ApiResponse<StatsUpdated>>> {
    let resp = plugin_service::update_stats(&state, key, payload).await?;
    Ok(Json(resp))
}
