mod common;

use mc_store_api::{
    dto::{
        cart::AddToCartRequest,
        checkout::CheckoutRequest,
        plugin::{PlayerStatInput, StatsUpdateRequest},
        stats::LeaderboardQuery,
    },
    error::AppError,
    middleware::api_key::PluginKey,
    services::{cart_service, checkout_service, plugin_service, stats_service},
};
use rust_decimal_macros::dec;
use uuid::Uuid;

use common::{as_player, create_player, create_product, setup_state};

fn stat(username: &str, kills: i64, money: f64) -> PlayerStatInput {
    PlayerStatInput {
        username: username.into(),
        money,
        kills,
        deaths: 0,
        playtime: 0,
        streak: 0,
    }
}

#[tokio::test]
async fn purchased_commands_are_handed_out_until_acknowledged() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let steve = create_player(&state, "Steve", 5_000).await?;
    let key = create_product(
        &state,
        "Vote Key",
        199,
        Some("crate key give {PLAYER} vote {quantity}"),
    )
    .await?;
    let user = as_player(&steve);

    cart_service::add_to_cart(
        &state,
        &user,
        AddToCartRequest {
            product_id: key.id,
            quantity: Some(3),
        },
    )
    .await?;
    checkout_service::checkout(&state, &user, CheckoutRequest::default()).await?;

    let pending = plugin_service::pending_commands(&state, PluginKey)
        .await?
        .data
        .expect("commands")
        .commands;
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].player, "Steve");
    assert_eq!(pending[0].command, "crate key give Steve vote 3");

    plugin_service::acknowledge(&state, PluginKey, pending[0].order_id).await?;
    // Acknowledging twice is harmless.
    plugin_service::acknowledge(&state, PluginKey, pending[0].order_id).await?;

    let pending = plugin_service::pending_commands(&state, PluginKey)
        .await?
        .data
        .expect("commands")
        .commands;
    assert!(pending.is_empty());
    Ok(())
}

#[tokio::test]
async fn acknowledging_an_unknown_order_is_not_found() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let err = plugin_service::acknowledge(&state, PluginKey, Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));
    Ok(())
}

#[tokio::test]
async fn player_lookup_and_balance() -> anyhow::Result<()> {
    let state = setup_state().await?;
    create_player(&state, "Steve", 1_250).await?;

    let found = plugin_service::lookup_player(&state, PluginKey, "Steve")
        .await?
        .data
        .expect("lookup");
    assert!(found.exists);
    assert_eq!(found.user.expect("summary").balance, dec!(12.50));

    let missing = plugin_service::lookup_player(&state, PluginKey, "Herobrine")
        .await?
        .data
        .expect("lookup");
    assert!(!missing.exists);
    assert!(missing.user.is_none());

    let balance = plugin_service::player_balance(&state, PluginKey, "Steve")
        .await?
        .data
        .expect("balance");
    assert_eq!(balance.balance, dec!(12.50));

    let err = plugin_service::player_balance(&state, PluginKey, "Herobrine")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));
    Ok(())
}

#[tokio::test]
async fn stats_upsert_feeds_the_leaderboard() -> anyhow::Result<()> {
    let state = setup_state().await?;

    plugin_service::update_stats(
        &state,
        PluginKey,
        StatsUpdateRequest {
            players: Some(vec![stat("Steve", 10, 500.0), stat("Alex", 25, 100.0)]),
        },
    )
    .await?;
    // Second push overwrites rather than duplicates.
    let updated = plugin_service::update_stats(
        &state,
        PluginKey,
        StatsUpdateRequest {
            players: Some(vec![stat("Steve", 40, 500.0)]),
        },
    )
    .await?
    .data
    .expect("updated");
    assert_eq!(updated.updated, 1);

    let kills = stats_service::leaderboard(&state, "kills", LeaderboardQuery::default())
        .await?
        .data
        .expect("board");
    assert_eq!(kills.kind, "kills");
    let names: Vec<_> = kills.players.iter().map(|p| p.username.as_str()).collect();
    assert_eq!(names, ["Steve", "Alex"]);
    assert_eq!(kills.players[0].kills, 40);

    let fallback = stats_service::leaderboard(&state, "wins", LeaderboardQuery { limit: Some(1) })
        .await?
        .data
        .expect("board");
    assert_eq!(fallback.kind, "money");
    assert_eq!(fallback.players.len(), 1);
    assert_eq!(fallback.players[0].username, "Steve");
    Ok(())
}

#[tokio::test]
async fn stats_update_without_players_is_invalid() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let err = plugin_service::update_stats(&state, PluginKey, StatsUpdateRequest { players: None })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationFailed(_)));
    Ok(())
}
