use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
pub struct PendingCommand {
    pub order_id: Uuid,
    pub player: String,
    pub product: String,
    pub command: String,
    pub quantity: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PendingCommandList {
    pub commands: Vec<PendingCommand>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PlayerSummary {
    pub id: Uuid,
    pub username: String,
    pub balance: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PlayerLookup {
    pub exists: bool,
    pub user: Option<PlayerSummary>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PlayerBalance {
    pub balance: Decimal,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PlayerStatInput {
    pub username: String,
    #[serde(default)]
    pub money: f64,
    #[serde(default)]
    pub kills: i64,
    #[serde(default)]
    pub deaths: i64,
    #[serde(default)]
    pub playtime: i64,
    #[serde(default)]
    pub streak: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct StatsUpdateRequest {
    pub players: Option<Vec<PlayerStatInput>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StatsUpdated {
    pub updated: usize,
}
