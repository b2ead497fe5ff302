use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::PlayerStat;

#[derive(Debug, Serialize, ToSchema)]
pub struct TopSupporter {
    pub username: String,
    pub player_type: String,
    pub total: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RecentPurchase {
    pub order_id: Uuid,
    pub username: String,
    pub player_type: String,
    pub product_name: String,
    pub quantity: i32,
    pub total_price: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentGoalView {
    pub goal: Decimal,
    pub current: Decimal,
    pub text: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StoreStats {
    pub top_supporter: Option<TopSupporter>,
    pub recent_purchases: Vec<RecentPurchase>,
    pub payment_goal: PaymentGoalView,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct LeaderboardQuery {
    pub limit: Option<u64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Leaderboard {
    pub kind: String,
    pub players: Vec<PlayerStat>,
}
