mod common;

use mc_store_api::{
    dto::{
        cart::{AddToCartRequest, RemoveFromCartRequest, UpdateCartRequest},
        promo::ValidatePromoRequest,
    },
    entity::{
        cart_items::Entity as CartItems, products::ActiveModel as ProductActive,
        promo_codes::Entity as PromoCodes,
    },
    error::AppError,
    services::{cart_service, promo_service},
};
use chrono::{Duration, Utc};
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, Set};

use common::{as_player, create_player, create_product, create_promo, setup_state};

#[tokio::test]
async fn adding_the_same_product_twice_merges_the_line() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let steve = create_player(&state, "Steve", 0).await?;
    let key = create_product(&state, "Vote Key", 199, None).await?;
    let user = as_player(&steve);

    cart_service::add_to_cart(
        &state,
        &user,
        AddToCartRequest {
            product_id: key.id,
            quantity: Some(2),
        },
    )
    .await?;
    let merged = cart_service::add_to_cart(
        &state,
        &user,
        AddToCartRequest {
            product_id: key.id,
            quantity: Some(3),
        },
    )
    .await?
    .data
    .expect("cart line");

    assert_eq!(merged.quantity, 5);
    assert_eq!(CartItems::find().count(&state.orm).await?, 1);
    Ok(())
}

#[tokio::test]
async fn non_positive_quantity_on_add_is_rejected() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let steve = create_player(&state, "Steve", 0).await?;
    let key = create_product(&state, "Vote Key", 199, None).await?;

    let err = cart_service::add_to_cart(
        &state,
        &as_player(&steve),
        AddToCartRequest {
            product_id: key.id,
            quantity: Some(0),
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AppError::ValidationFailed(_)));
    assert_eq!(CartItems::find().count(&state.orm).await?, 0);
    Ok(())
}

#[tokio::test]
async fn update_to_zero_or_below_removes_the_line() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let steve = create_player(&state, "Steve", 0).await?;
    let key = create_product(&state, "Vote Key", 199, None).await?;
    let crate_item = create_product(&state, "Spawner Crate", 999, None).await?;
    let user = as_player(&steve);

    let first = cart_service::add_to_cart(
        &state,
        &user,
        AddToCartRequest {
            product_id: key.id,
            quantity: Some(1),
        },
    )
    .await?
    .data
    .expect("cart line");
    let second = cart_service::add_to_cart(
        &state,
        &user,
        AddToCartRequest {
            product_id: crate_item.id,
            quantity: Some(1),
        },
    )
    .await?
    .data
    .expect("cart line");

    cart_service::update_quantity(
        &state,
        &user,
        UpdateCartRequest {
            cart_id: first.id,
            quantity: 0,
        },
    )
    .await?;
    cart_service::update_quantity(
        &state,
        &user,
        UpdateCartRequest {
            cart_id: second.id,
            quantity: -5,
        },
    )
    .await?;

    assert_eq!(CartItems::find().count(&state.orm).await?, 0);
    Ok(())
}

#[tokio::test]
async fn another_players_line_is_left_untouched() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let steve = create_player(&state, "Steve", 0).await?;
    let alex = create_player(&state, "Alex", 0).await?;
    let key = create_product(&state, "Vote Key", 199, None).await?;

    let line = cart_service::add_to_cart(
        &state,
        &as_player(&steve),
        AddToCartRequest {
            product_id: key.id,
            quantity: Some(2),
        },
    )
    .await?
    .data
    .expect("cart line");

    let alex = as_player(&alex);
    cart_service::update_quantity(
        &state,
        &alex,
        UpdateCartRequest {
            cart_id: line.id,
            quantity: 10,
        },
    )
    .await?;
    cart_service::remove_from_cart(&state, &alex, RemoveFromCartRequest { cart_id: line.id })
        .await?;

    let stored = CartItems::find_by_id(line.id)
        .one(&state.orm)
        .await?
        .expect("line still present");
    assert_eq!(stored.quantity, 2);
    Ok(())
}

#[tokio::test]
async fn cart_total_uses_current_prices() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let steve = create_player(&state, "Steve", 0).await?;
    let key = create_product(&state, "Vote Key", 199, None).await?;
    let rank = create_product(&state, "VIP Rank", 1500, None).await?;
    let user = as_player(&steve);

    for (product_id, quantity) in [(key.id, 3), (rank.id, 1)] {
        cart_service::add_to_cart(
            &state,
            &user,
            AddToCartRequest {
                product_id,
                quantity: Some(quantity),
            },
        )
        .await?;
    }

    let cart = cart_service::get_cart(&state, &user).await?.data.expect("cart");
    assert_eq!(cart.items.len(), 2);
    assert_eq!(cart.total, dec!(20.97));

    let mut repriced: ProductActive = rank.into();
    repriced.price = Set(1_000);
    repriced.update(&state.orm).await?;

    let cart = cart_service::get_cart(&state, &user).await?.data.expect("cart");
    assert_eq!(cart.total, dec!(15.97));
    Ok(())
}

#[tokio::test]
async fn promo_validation_reports_without_consuming() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let live = create_promo(&state, "SAVE10", 10, 5, 1, None).await?;
    create_promo(&state, "OLD", 20, 0, 0, Some(Utc::now() - Duration::days(1))).await?;
    create_promo(&state, "GONE", 20, 3, 3, None).await?;

    let ok = promo_service::validate_code(
        &state,
        ValidatePromoRequest {
            code: Some("save10".into()),
        },
    )
    .await?
    .data
    .expect("validation");
    assert_eq!(ok.code, "SAVE10");
    assert_eq!(ok.discount, 10);

    let expired = promo_service::validate_code(
        &state,
        ValidatePromoRequest {
            code: Some("OLD".into()),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(expired, AppError::PromoExpired));

    let exhausted = promo_service::validate_code(
        &state,
        ValidatePromoRequest {
            code: Some("GONE".into()),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(exhausted, AppError::PromoUsageLimitReached));

    let unknown = promo_service::validate_code(
        &state,
        ValidatePromoRequest {
            code: Some("NOPE".into()),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(unknown, AppError::PromoNotFound));

    let stored = PromoCodes::find_by_id(live.id)
        .one(&state.orm)
        .await?
        .expect("promo");
    assert_eq!(stored.used_count, 1);
    Ok(())
}
