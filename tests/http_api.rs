mod common;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use chrono::Duration;
use mc_store_api::{
    middleware::auth::{ADMIN_ROLE, PLAYER_ROLE},
    routes::create_api_router,
    services::auth_service::issue_token,
    state::AppState,
};
use serde_json::{Value, json};
use tower::ServiceExt;

use common::{create_player, create_product, create_promo, reload_player, setup_state};

fn app(state: AppState) -> Router {
    Router::new().nest("/api", create_api_router()).with_state(state)
}

async fn send(app: Router, request: Request<Body>) -> anyhow::Result<(StatusCode, Value)> {
    let response = app.oneshot(request).await?;
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    Ok((status, serde_json::from_slice(&bytes)?))
}

fn post_json(uri: &str, token: Option<&str>, body: Value) -> anyhow::Result<Request<Body>> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    Ok(builder.body(Body::from(body.to_string()))?)
}

#[tokio::test]
async fn register_login_and_me() -> anyhow::Result<()> {
    let state = setup_state().await?;

    let (status, body) = send(
        app(state.clone()),
        post_json(
            "/api/auth/register",
            None,
            json!({
                "email": "steve@example.com",
                "password": "diamonds",
                "username": "Steve",
                "playerType": "bedrock",
            }),
        )?,
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["player_type"], "bedrock");

    let (status, body) = send(
        app(state.clone()),
        post_json(
            "/api/auth/login",
            None,
            json!({ "email": "steve@example.com", "password": "diamonds", "rememberMe": true }),
        )?,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    let token = body["data"]["token"].as_str().unwrap_or_default().to_string();
    assert!(!token.is_empty());

    let request = Request::builder()
        .uri("/api/auth/me")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())?;
    let (status, body) = send(app(state.clone()), request).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "Steve");

    let (status, body) = send(
        app(state),
        post_json(
            "/api/auth/login",
            None,
            json!({ "email": "steve@example.com", "password": "wrong-one" }),
        )?,
    )
    .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["data"]["error"], "not_authenticated");
    Ok(())
}

#[tokio::test]
async fn checkout_without_funds_reports_shortfall() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let steve = create_player(&state, "Steve", 3_000).await?;
    let key = create_product(&state, "Legend Key", 2_000, None).await?;
    let token = issue_token(
        &state.config.jwt_secret,
        steve.id,
        PLAYER_ROLE,
        Duration::hours(1),
    )?;

    let (status, _) = send(
        app(state.clone()),
        post_json(
            "/api/shop/cart/add",
            Some(&token),
            json!({ "productId": key.id, "quantity": 2 }),
        )?,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        app(state.clone()),
        post_json("/api/shop/checkout", Some(&token), json!({}))?,
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["data"]["error"], "insufficient_balance");
    assert_eq!(body["data"]["required"].as_f64(), Some(40.0));
    assert_eq!(body["data"]["current"].as_f64(), Some(30.0));
    assert_eq!(body["data"]["shortfall"].as_f64(), Some(10.0));
    assert_eq!(body["data"]["referralLink"], state.config.default_referral_link.as_str());
    Ok(())
}

#[tokio::test]
async fn checkout_requires_login() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let (status, body) = send(
        app(state),
        post_json("/api/shop/checkout", None, json!({}))?,
    )
    .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Please login first");
    Ok(())
}

#[tokio::test]
async fn plugin_routes_require_the_api_key() -> anyhow::Result<()> {
    let state = setup_state().await?;

    let request = Request::builder()
        .uri("/api/plugin/pending-commands")
        .header("x-api-key", "wrong")
        .body(Body::empty())?;
    let (status, _) = send(app(state.clone()), request).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let request = Request::builder()
        .uri(format!(
            "/api/plugin/pending-commands?api_key={}",
            state.config.api_key
        ))
        .body(Body::empty())?;
    let (status, body) = send(app(state), request).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["commands"].as_array().is_some_and(Vec::is_empty));
    Ok(())
}

#[tokio::test]
async fn admin_login_unlocks_admin_routes() -> anyhow::Result<()> {
    let state = setup_state().await?;

    let (status, body) = send(
        app(state.clone()),
        post_json(
            "/api/admin/login",
            None,
            json!({
                "username": state.config.admin_username,
                "password": state.config.admin_password,
            }),
        )?,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    let token = body["data"]["token"].as_str().unwrap_or_default().to_string();

    let request = Request::builder()
        .uri("/api/admin/users")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())?;
    let (status, body) = send(app(state), request).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["users"].is_array());
    Ok(())
}

fn get(uri: &str, token: &str) -> anyhow::Result<Request<Body>> {
    Ok(Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())?)
}

#[tokio::test]
async fn cart_and_checkout_accept_camel_case_bodies() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let steve = create_player(&state, "Steve", 5_000).await?;
    let key = create_product(&state, "Legend Key", 2_000, None).await?;
    let rank = create_product(&state, "VIP Rank", 1_500, None).await?;
    create_promo(&state, "SAVE10", 10, 0, 0, None).await?;
    let token = issue_token(
        &state.config.jwt_secret,
        steve.id,
        PLAYER_ROLE,
        Duration::hours(1),
    )?;

    for product_id in [key.id, rank.id] {
        let (status, _) = send(
            app(state.clone()),
            post_json(
                "/api/shop/cart/add",
                Some(&token),
                json!({ "productId": product_id }),
            )?,
        )
        .await?;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = send(app(state.clone()), get("/api/shop/cart", &token)?).await?;
    assert_eq!(status, StatusCode::OK);
    let items = body["data"]["items"].as_array().cloned().unwrap_or_default();
    assert_eq!(items.len(), 2);
    let line_for = |product: uuid::Uuid| {
        items
            .iter()
            .find(|item| item["product_id"] == product.to_string())
            .map(|item| item["id"].clone())
            .unwrap_or_default()
    };
    let key_line = line_for(key.id);
    let rank_line = line_for(rank.id);

    let (status, _) = send(
        app(state.clone()),
        post_json(
            "/api/shop/cart/update",
            Some(&token),
            json!({ "cartId": key_line, "quantity": 2 }),
        )?,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        app(state.clone()),
        post_json("/api/shop/cart/remove", Some(&token), json!({ "cartId": rank_line }))?,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        app(state.clone()),
        post_json(
            "/api/shop/checkout",
            Some(&token),
            json!({ "promoCode": "save10" }),
        )?,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["success"], true);
    assert_eq!(body["data"]["total"].as_f64(), Some(36.0));
    assert_eq!(body["data"]["newBalance"].as_f64(), Some(14.0));
    assert_eq!(body["data"]["promoCode"], "SAVE10");
    assert_eq!(reload_player(&state, steve.id).await?.balance, 1_400);
    Ok(())
}

#[tokio::test]
async fn oversized_balance_adjustment_is_a_validation_error() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let steve = create_player(&state, "Steve", 1_000).await?;
    let token = issue_token(
        &state.config.jwt_secret,
        uuid::Uuid::nil(),
        ADMIN_ROLE,
        Duration::hours(1),
    )?;

    let (status, body) = send(
        app(state.clone()),
        post_json(
            &format!("/api/admin/users/{}/add-balance", steve.id),
            Some(&token),
            json!({ "amount": 1e27 }),
        )?,
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["data"]["error"], "validation_failed");
    assert_eq!(reload_player(&state, steve.id).await?.balance, 1_000);
    Ok(())
}
