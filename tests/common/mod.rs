#![allow(dead_code)]

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use mc_store_api::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    dto::admin::SettingsMap,
    entity::{
        products::{ActiveModel as ProductActive, Model as ProductModel},
        promo_codes::{ActiveModel as PromoActive, Model as PromoModel},
        users::{ActiveModel as UserActive, Entity as Users, Model as UserModel},
    },
    middleware::auth::{ADMIN_ROLE, AuthUser, PLAYER_ROLE},
    services::settings_service,
    state::AppState,
};
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use uuid::Uuid;

/// Fresh in-memory store with every migration applied.
pub async fn setup_state() -> anyhow::Result<AppState> {
    let config = AppConfig::for_tests();
    let orm = create_orm_conn(&config).await?;
    run_migrations(&orm).await?;
    Ok(AppState::new(orm, config))
}

pub fn admin() -> AuthUser {
    AuthUser {
        user_id: Uuid::nil(),
        role: ADMIN_ROLE.into(),
    }
}

pub fn as_player(user: &UserModel) -> AuthUser {
    AuthUser {
        user_id: user.id,
        role: PLAYER_ROLE.into(),
    }
}

pub async fn create_player(
    state: &AppState,
    username: &str,
    balance: i64,
) -> anyhow::Result<UserModel> {
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        email: Set(format!("{}@example.com", username.to_lowercase())),
        username: Set(username.to_string()),
        password_hash: Set("not-a-real-hash".to_string()),
        player_type: Set("java".to_string()),
        balance: Set(balance),
        total_spent: Set(0),
        created_at: Set(Utc::now()),
    }
    .insert(&state.orm)
    .await?;
    Ok(user)
}

pub async fn reload_player(state: &AppState, id: Uuid) -> anyhow::Result<UserModel> {
    Users::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| anyhow::anyhow!("player {id} vanished"))
}

pub async fn create_product(
    state: &AppState,
    name: &str,
    price: i64,
    command: Option<&str>,
) -> anyhow::Result<ProductModel> {
    let product = ProductActive {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        description: Set(None),
        category: Set("keys".to_string()),
        price: Set(price),
        original_price: Set(None),
        on_sale: Set(false),
        image_url: Set(None),
        command_template: Set(command.map(str::to_string)),
        active: Set(true),
        created_at: Set(Utc::now()),
    }
    .insert(&state.orm)
    .await?;
    Ok(product)
}

pub async fn create_promo(
    state: &AppState,
    code: &str,
    discount_percent: i32,
    max_uses: i32,
    used_count: i32,
    expires_at: Option<DateTime<Utc>>,
) -> anyhow::Result<PromoModel> {
    let promo = PromoActive {
        id: Set(Uuid::new_v4()),
        code: Set(code.to_string()),
        discount_percent: Set(discount_percent),
        max_uses: Set(max_uses),
        used_count: Set(used_count),
        expires_at: Set(expires_at),
        active: Set(true),
        created_at: Set(Utc::now()),
    }
    .insert(&state.orm)
    .await?;
    Ok(promo)
}

pub async fn set_setting(state: &AppState, key: &str, value: &str) -> anyhow::Result<()> {
    let mut values = BTreeMap::new();
    values.insert(key.to_string(), value.to_string());
    settings_service::update_settings(state, &admin(), SettingsMap { values }).await?;
    Ok(())
}
