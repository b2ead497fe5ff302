use std::collections::HashMap;

use chrono::{DateTime, Datelike, Utc};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use uuid::Uuid;

use crate::{
    dto::stats::{Leaderboard, LeaderboardQuery, RecentPurchase, StoreStats, TopSupporter},
    entity::{
        orders::{Column as OrderCol, Entity as Orders},
        player_stats::{Column as StatCol, Entity as PlayerStats},
        products::Entity as Products,
        users::{Column as UserCol, Entity as Users, Model as UserModel},
    },
    error::AppResult,
    models::PlayerStat,
    money::to_decimal,
    response::{ApiResponse, Meta},
    services::{checkout_service::ORDER_COMPLETED, ledger_service},
    state::AppState,
};

const RECENT_PURCHASES: u64 = 5;
const DEFAULT_LEADERBOARD_SIZE: u64 = 50;
const MAX_LEADERBOARD_SIZE: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaderboardKind {
    Money,
    Kills,
    Deaths,
    Playtime,
}

impl LeaderboardKind {
    /// Unknown kinds fall back to the money board.
    pub fn parse(kind: &str) -> Self {
        match kind.to_ascii_lowercase().as_str() {
            "kills" => Self::Kills,
            "deaths" => Self::Deaths,
            "playtime" => Self::Playtime,
            _ => Self::Money,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Money => "money",
            Self::Kills => "kills",
            Self::Deaths => "deaths",
            Self::Playtime => "playtime",
        }
    }

    fn column(&self) -> StatCol {
        match self {
            Self::Money => StatCol::Money,
            Self::Kills => StatCol::Kills,
            Self::Deaths => StatCol::Deaths,
            Self::Playtime => StatCol::Playtime,
        }
    }
}

pub fn start_of_month(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive()
        .with_day(1)
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
        .unwrap_or(now)
}

async fn users_by_id(state: &AppState, ids: Vec<Uuid>) -> AppResult<HashMap<Uuid, UserModel>> {
    Ok(Users::find()
        .filter(UserCol::Id.is_in(ids))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect())
}

async fn top_supporter(state: &AppState, since: DateTime<Utc>) -> AppResult<Option<TopSupporter>> {
    let orders = Orders::find()
        .filter(OrderCol::Status.eq(ORDER_COMPLETED))
        .filter(OrderCol::CreatedAt.gte(since))
        .all(&state.orm)
        .await?;

    let mut totals: HashMap<Uuid, i64> = HashMap::new();
    for order in &orders {
        *totals.entry(order.user_id).or_default() += order.total_price;
    }
    let Some((user_id, total)) = totals.into_iter().max_by_key(|(_, total)| *total) else {
        return Ok(None);
    };

    let user = Users::find_by_id(user_id).one(&state.orm).await?;
    Ok(user.map(|u| TopSupporter {
        username: u.username,
        player_type: u.player_type,
        total: to_decimal(total),
    }))
}

async fn recent_purchases(state: &AppState) -> AppResult<Vec<RecentPurchase>> {
    let rows = Orders::find()
        .filter(OrderCol::Status.eq(ORDER_COMPLETED))
        .order_by_desc(OrderCol::CreatedAt)
        .limit(RECENT_PURCHASES)
        .find_also_related(Products)
        .all(&state.orm)
        .await?;

    let users = users_by_id(state, rows.iter().map(|(o, _)| o.user_id).collect()).await?;

    Ok(rows
        .into_iter()
        .filter_map(|(order, product)| {
            let user = users.get(&order.user_id)?;
            Some(RecentPurchase {
                order_id: order.id,
                username: user.username.clone(),
                player_type: user.player_type.clone(),
                product_name: product?.name,
                quantity: order.quantity,
                total_price: to_decimal(order.total_price),
                created_at: order.created_at,
            })
        })
        .collect())
}

/// Storefront sidebar: this month's top supporter, latest purchases and the goal bar.
pub async fn store_stats(state: &AppState) -> AppResult<ApiResponse<StoreStats>> {
    let stats = StoreStats {
        top_supporter: top_supporter(state, start_of_month(Utc::now())).await?,
        recent_purchases: recent_purchases(state).await?,
        payment_goal: ledger_service::payment_goal(&state.orm).await?,
    };
    Ok(ApiResponse::success("OK", stats, Some(Meta::empty())))
}

pub async fn leaderboard(
    state: &AppState,
    kind: &str,
    query: LeaderboardQuery,
) -> AppResult<ApiResponse<Leaderboard>> {
    let kind = LeaderboardKind::parse(kind);
    let limit = query
        .limit
        .filter(|l| *l > 0)
        .unwrap_or(DEFAULT_LEADERBOARD_SIZE)
        .min(MAX_LEADERBOARD_SIZE);

    let players: Vec<PlayerStat> = PlayerStats::find()
        .order_by_desc(kind.column())
        .order_by_asc(StatCol::Username)
        .limit(limit)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    let meta = Meta::count(players.len());
    Ok(ApiResponse::success(
        "OK",
        Leaderboard {
            kind: kind.as_str().to_string(),
            players,
        },
        Some(meta),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn unknown_board_falls_back_to_money() {
        assert_eq!(LeaderboardKind::parse("KILLS"), LeaderboardKind::Kills);
        assert_eq!(LeaderboardKind::parse("wins"), LeaderboardKind::Money);
    }

    #[test]
    fn month_starts_at_midnight_on_the_first() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 15, 30, 0).unwrap();
        assert_eq!(
            start_of_month(now),
            Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap()
        );
    }
}
