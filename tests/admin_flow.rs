mod common;

use std::time::Duration as StdDuration;

use mc_store_api::{
    dto::{
        admin::{AddBalanceRequest, ApplySaleRequest, CategoryRequest, PaymentGoalUpdate},
        promo::PromoCodeRequest,
        staff::{StaffApplicationUpdate, StaffApplyRequest},
    },
    entity::{categories::Entity as Categories, products::Entity as Products},
    error::AppError,
    services::{admin_service, ledger_service, settings_service, staff_service},
};
use rust_decimal_macros::dec;
use sea_orm::EntityTrait;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

use common::{admin, as_player, create_player, create_product, reload_player, set_setting, setup_state};

#[tokio::test]
async fn players_cannot_use_admin_operations() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let steve = create_player(&state, "Steve", 0).await?;

    let err = admin_service::list_users(&state, &as_player(&steve))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));
    Ok(())
}

#[tokio::test]
async fn balance_adjustments_never_go_negative() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let steve = create_player(&state, "Steve", 1_000).await?;

    let topped = ledger_service::add_balance(
        &state,
        &admin(),
        steve.id,
        AddBalanceRequest { amount: dec!(25.50) },
    )
    .await?
    .data
    .expect("balance");
    assert_eq!(topped.new_balance, dec!(35.50));

    let err = ledger_service::add_balance(
        &state,
        &admin(),
        steve.id,
        AddBalanceRequest { amount: dec!(-40) },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::ValidationFailed(_)));
    assert_eq!(reload_player(&state, steve.id).await?.balance, 3_550);

    let corrected = ledger_service::add_balance(
        &state,
        &admin(),
        steve.id,
        AddBalanceRequest { amount: dec!(-35.50) },
    )
    .await?
    .data
    .expect("balance");
    assert_eq!(corrected.new_balance, dec!(0));
    Ok(())
}

#[tokio::test]
async fn sales_apply_to_the_original_price_and_revert() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let rank = create_product(&state, "VIP Rank", 1_000, None).await?;

    admin_service::apply_sale(&state, &admin(), ApplySaleRequest { percentage: 25 }).await?;
    admin_service::apply_sale(&state, &admin(), ApplySaleRequest { percentage: 50 }).await?;

    let on_sale = Products::find_by_id(rank.id)
        .one(&state.orm)
        .await?
        .expect("product");
    assert!(on_sale.on_sale);
    assert_eq!(on_sale.price, 500);
    assert_eq!(on_sale.original_price, Some(1_000));

    let removed = admin_service::remove_sales(&state, &admin())
        .await?
        .data
        .expect("removed");
    assert_eq!(removed.products_updated, 1);

    let restored = Products::find_by_id(rank.id)
        .one(&state.orm)
        .await?
        .expect("product");
    assert!(!restored.on_sale);
    assert_eq!(restored.price, 1_000);
    assert_eq!(restored.original_price, None);

    let err = admin_service::apply_sale(&state, &admin(), ApplySaleRequest { percentage: 120 })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationFailed(_)));
    Ok(())
}

#[tokio::test]
async fn category_slugs_are_normalized_and_unique() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let created = admin_service::create_category(
        &state,
        &admin(),
        CategoryRequest {
            name: "Crate Keys".into(),
            slug: "Crate Keys".into(),
            display_order: 1,
            active: true,
        },
    )
    .await?
    .data
    .expect("created");

    let stored = Categories::find_by_id(created.id)
        .one(&state.orm)
        .await?
        .expect("category");
    assert_eq!(stored.slug, "crate-keys");

    let err = admin_service::create_category(
        &state,
        &admin(),
        CategoryRequest {
            name: "Keys again".into(),
            slug: "crate-keys".into(),
            display_order: 2,
            active: true,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::ValidationFailed(_)));
    Ok(())
}

#[tokio::test]
async fn promo_codes_are_stored_uppercase_and_validated() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let request = |code: &str, discount_percent: i32| PromoCodeRequest {
        code: code.into(),
        discount_percent,
        max_uses: 0,
        expires_at: None,
        active: true,
    };

    let promo = admin_service::create_promo_code(&state, &admin(), request(" summer ", 15))
        .await?
        .data
        .expect("promo");
    assert_eq!(promo.code, "SUMMER");
    assert_eq!(promo.used_count, 0);

    let duplicate = admin_service::create_promo_code(&state, &admin(), request("Summer", 5))
        .await
        .unwrap_err();
    assert!(matches!(duplicate, AppError::ValidationFailed(_)));

    let too_big = admin_service::create_promo_code(&state, &admin(), request("HUGE", 150))
        .await
        .unwrap_err();
    assert!(matches!(too_big, AppError::ValidationFailed(_)));

    let updated =
        admin_service::update_promo_code(&state, &admin(), promo.id, request("SUMMER", 20))
            .await?
            .data
            .expect("promo");
    assert_eq!(updated.discount_percent, 20);

    admin_service::delete_promo_code(&state, &admin(), promo.id).await?;
    let listed = admin_service::list_promo_codes(&state, &admin())
        .await?
        .data
        .expect("list");
    assert!(listed.promo_codes.is_empty());
    Ok(())
}

#[tokio::test]
async fn payment_goal_can_be_retargeted_and_reset() -> anyhow::Result<()> {
    let state = setup_state().await?;

    let goal = ledger_service::update_payment_goal(
        &state,
        &admin(),
        PaymentGoalUpdate {
            goal: Some(dec!(250)),
            text: Some("Hosting".into()),
        },
    )
    .await?
    .data
    .expect("goal");
    assert_eq!(goal.goal, dec!(250.00));
    assert_eq!(goal.text, "Hosting");

    ledger_service::reset_payment_goal(&state, &admin()).await?;
    let goal = ledger_service::payment_goal(&state.orm).await?;
    assert_eq!(goal.current, dec!(0));
    Ok(())
}

#[tokio::test]
async fn public_settings_hide_webhooks() -> anyhow::Result<()> {
    let state = setup_state().await?;
    set_setting(&state, "discord_webhook", "https://discord.example/hook").await?;
    set_setting(&state, "server_ip", "play.example.net").await?;

    let public = settings_service::public_settings(&state)
        .await?
        .data
        .expect("settings");
    assert!(!public.values.contains_key("discord_webhook"));
    assert!(!public.values.contains_key("staff_webhook"));
    assert_eq!(public.values["server_ip"], "play.example.net");

    let all = settings_service::all_settings(&state, &admin())
        .await?
        .data
        .expect("settings");
    assert_eq!(all.values["discord_webhook"], "https://discord.example/hook");
    Ok(())
}

#[tokio::test]
async fn staff_applications_are_stored_announced_and_reviewed() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/staff"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let state = setup_state().await?;
    set_setting(&state, "staff_webhook", &format!("{}/staff", server.uri())).await?;

    let incomplete = staff_service::submit(
        &state,
        StaffApplyRequest {
            ign: Some("Steve".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(incomplete, AppError::ValidationFailed(_)));

    let created = staff_service::submit(
        &state,
        StaffApplyRequest {
            ign: Some("Steve".into()),
            age: Some(17),
            discord: Some("steve#0001".into()),
            rank: Some("Helper".into()),
            reason: Some("I know the rules".into()),
        },
    )
    .await?
    .data
    .expect("created");

    let mut received = Vec::new();
    for _ in 0..50 {
        received = server.received_requests().await.unwrap_or_default();
        if !received.is_empty() {
            break;
        }
        tokio::time::sleep(StdDuration::from_millis(50)).await;
    }
    assert_eq!(received.len(), 1);
    let body: serde_json::Value = serde_json::from_slice(&received[0].body)?;
    let content = body["content"].as_str().unwrap_or_default();
    assert!(content.starts_with("**New Staff Application**"));
    assert!(content.contains("**IGN:** Steve"));

    let bad_status = staff_service::review(
        &state,
        &admin(),
        created.id,
        StaffApplicationUpdate {
            status: "maybe".into(),
            admin_notes: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(bad_status, AppError::ValidationFailed(_)));

    let reviewed = staff_service::review(
        &state,
        &admin(),
        created.id,
        StaffApplicationUpdate {
            status: "accepted".into(),
            admin_notes: Some("Welcome aboard".into()),
        },
    )
    .await?
    .data
    .expect("application");
    assert_eq!(reviewed.status, "accepted");
    assert_eq!(reviewed.admin_notes.as_deref(), Some("Welcome aboard"));

    let before = staff_service::list(&state, &admin()).await?;
    assert_eq!(before.meta.and_then(|m| m.total), Some(1));

    staff_service::delete(&state, &admin(), created.id).await?;
    let listed = staff_service::list(&state, &admin()).await?.data.expect("list");
    assert!(listed.applications.is_empty());
    Ok(())
}
