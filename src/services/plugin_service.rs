use std::{collections::HashMap, sync::LazyLock};

use chrono::Utc;
use regex::{NoExpand, Regex};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use uuid::Uuid;

use crate::{
    dto::plugin::{
        PendingCommand, PendingCommandList, PlayerBalance, PlayerLookup, PlayerSummary,
        StatsUpdateRequest, StatsUpdated,
    },
    entity::{
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders},
        player_stats::{ActiveModel as StatActive, Column as StatCol, Entity as PlayerStats},
        products::Entity as Products,
        users::{Column as UserCol, Entity as Users, Model as UserModel},
    },
    error::{AppError, AppResult},
    middleware::api_key::PluginKey,
    money::to_decimal,
    response::{Ack, ApiResponse, Meta},
    services::checkout_service::ORDER_COMPLETED,
    state::AppState,
};

static PLAYER_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\{player\}").expect("valid placeholder regex"));
static QUANTITY_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\{quantity\}").expect("valid placeholder regex"));

/// Fills `{player}` and `{quantity}` (any case) in a product's command template.
pub fn render_command(template: &str, player: &str, quantity: i32) -> String {
    let with_player = PLAYER_PLACEHOLDER.replace_all(template, NoExpand(player));
    QUANTITY_PLACEHOLDER
        .replace_all(&with_player, NoExpand(&quantity.to_string()))
        .into_owned()
}

/// Completed orders whose command the plugin has not yet run, oldest first.
pub async fn pending_commands(
    state: &AppState,
    _key: PluginKey,
) -> AppResult<ApiResponse<PendingCommandList>> {
    let rows = Orders::find()
        .filter(
            Condition::all()
                .add(OrderCol::CommandExecuted.eq(false))
                .add(OrderCol::Status.eq(ORDER_COMPLETED)),
        )
        .order_by_asc(OrderCol::CreatedAt)
        .find_also_related(Products)
        .all(&state.orm)
        .await?;

    let user_ids: Vec<Uuid> = rows.iter().map(|(order, _)| order.user_id).collect();
    let users: HashMap<Uuid, UserModel> = Users::find()
        .filter(UserCol::Id.is_in(user_ids))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    let commands = rows
        .into_iter()
        .filter_map(|(order, product)| {
            let player = users.get(&order.user_id)?.username.clone();
            let product = product?;
            let template = product.command_template.unwrap_or_default();
            Some(PendingCommand {
                order_id: order.id,
                command: render_command(&template, &player, order.quantity),
                player,
                product: product.name,
                quantity: order.quantity,
            })
        })
        .collect();

    Ok(ApiResponse::success(
        "OK",
        PendingCommandList { commands },
        Some(Meta::empty()),
    ))
}

/// Flips `command_executed` so the order is not handed out again.
pub async fn mark_executed(state: &AppState, order_id: Uuid) -> AppResult<ApiResponse<Ack>> {
    let order = Orders::find_by_id(order_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    if !order.command_executed {
        let mut active: OrderActive = order.into();
        active.command_executed = Set(true);
        active.update(&state.orm).await?;
        tracing::info!(%order_id, "order command acknowledged");
    }

    Ok(ApiResponse::success("OK", Ack::ok(), Some(Meta::empty())))
}

pub async fn acknowledge(
    state: &AppState,
    _key: PluginKey,
    order_id: Uuid,
) -> AppResult<ApiResponse<Ack>> {
    mark_executed(state, order_id).await
}

async fn find_player(state: &AppState, username: &str) -> AppResult<Option<UserModel>> {
    Ok(Users::find()
        .filter(UserCol::Username.eq(username))
        .one(&state.orm)
        .await?)
}

pub async fn lookup_player(
    state: &AppState,
    _key: PluginKey,
    username: &str,
) -> AppResult<ApiResponse<PlayerLookup>> {
    let user = find_player(state, username).await?.map(|u| PlayerSummary {
        id: u.id,
        username: u.username,
        balance: to_decimal(u.balance),
    });
    Ok(ApiResponse::success(
        "OK",
        PlayerLookup {
            exists: user.is_some(),
            user,
        },
        Some(Meta::empty()),
    ))
}

pub async fn player_balance(
    state: &AppState,
    _key: PluginKey,
    username: &str,
) -> AppResult<ApiResponse<PlayerBalance>> {
    let user = find_player(state, username)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success(
        "OK",
        PlayerBalance {
            balance: to_decimal(user.balance),
        },
        Some(Meta::empty()),
    ))
}

/// Upserts leaderboard rows pushed by the game server.
pub async fn update_stats(
    state: &AppState,
    _key: PluginKey,
    payload: StatsUpdateRequest,
) -> AppResult<ApiResponse<StatsUpdated>> {
    let players = payload
        .players
        .ok_or_else(|| AppError::ValidationFailed("Invalid data".into()))?;
    if players.iter().any(|p| p.username.trim().is_empty()) {
        return Err(AppError::ValidationFailed("username is required".into()));
    }

    let now = Utc::now();
    let txn = state.orm.begin().await?;
    for player in &players {
        let existing = PlayerStats::find()
            .filter(StatCol::Username.eq(player.username.as_str()))
            .one(&txn)
            .await?;
        match existing {
            Some(row) => {
                let mut active: StatActive = row.into();
                active.money = Set(player.money);
                active.kills = Set(player.kills);
                active.deaths = Set(player.deaths);
                active.playtime = Set(player.playtime);
                active.streak = Set(player.streak);
                active.updated_at = Set(now);
                active.update(&txn).await?;
            }
            None => {
                StatActive {
                    id: Set(Uuid::new_v4()),
                    username: Set(player.username.clone()),
                    money: Set(player.money),
                    kills: Set(player.kills),
                    deaths: Set(player.deaths),
                    playtime: Set(player.playtime),
                    streak: Set(player.streak),
                    updated_at: Set(now),
                }
                .insert(&txn)
                .await?;
            }
        }
    }
    txn.commit().await?;

    tracing::debug!(players = players.len(), "player stats updated");
    Ok(ApiResponse::success(
        "Stats updated",
        StatsUpdated {
            updated: players.len(),
        },
        Some(Meta::empty()),
    ))
}
