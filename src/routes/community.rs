use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};

use crate::{
    dto::{
        staff::{StaffApplicationCreated, StaffApplyRequest},
        stats::{Leaderboard, LeaderboardQuery},
    },
    error::AppResult,
    response::ApiResponse,
    services::{staff_service, stats_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/leaderboard/{kind}", get(leaderboard))
        .route("/staff-apply", post(staff_apply))
}

#[utoipa::path(
    get,
    path = "/api/leaderboard/{kind}",
    params(
        ("kind" = String, Path, description = "money, kills, deaths or playtime; unknown values rank by money"),
        ("limit" = Option<u64>, Query, description = "Rows to return, default 50, at most 100")
    ),
    responses(
        (status = 200, description = "Players ranked by the chosen stat", body = ApiResponse<Leaderboard>)
    ),
    tag = "Community"
)]
pub async fn leaderboard(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(query): Query<LeaderboardQuery>,
) -> AppResult<Json<ApiResponse<Leaderboard>>> {
    let resp = stats_service::leaderboard(&state, &kind, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/staff-apply",
    request_body = StaffApplyRequest,
    responses(
        (status = 201, description = "Application stored", body = ApiResponse<StaffApplicationCreated>),
        (status = 400, description = "Missing fields")
    ),
    tag = "Community"
)]
pub async fn staff_apply(
    State(state): State<AppState>,
    Json(payload): Json<StaffApplyRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<StaffApplicationCreated>>)> {
    let resp = staff_service::submit(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}
