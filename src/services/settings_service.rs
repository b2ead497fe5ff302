use std::collections::BTreeMap;

use sea_orm::{ConnectionTrait, EntityTrait, Set, TransactionTrait, sea_query::OnConflict};

use crate::{
    audit,
    dto::admin::SettingsMap,
    entity::settings::{ActiveModel as SettingActive, Column as SetCol, Entity as Settings},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    response::{Ack, ApiResponse, Meta},
    state::AppState,
};

pub const DISCORD_LINK: &str = "discord_link";
pub const DISCORD_WEBHOOK: &str = "discord_webhook";
pub const STAFF_WEBHOOK: &str = "staff_webhook";

/// Keys that hold outbound credentials and must never reach the storefront.
const PRIVATE_KEYS: [&str; 2] = [DISCORD_WEBHOOK, STAFF_WEBHOOK];

/// Reads a setting, treating an empty value as unset.
pub async fn get_value<C: ConnectionTrait>(conn: &C, key: &str) -> AppResult<Option<String>> {
    let value = Settings::find_by_id(key.to_string())
        .one(conn)
        .await?
        .map(|setting| setting.value)
        .filter(|value| !value.trim().is_empty());
    Ok(value)
}

async fn load_all<C: ConnectionTrait>(conn: &C) -> AppResult<BTreeMap<String, String>> {
    Ok(Settings::find()
        .all(conn)
        .await?
        .into_iter()
        .map(|s| (s.key, s.value))
        .collect())
}

pub async fn public_settings(state: &AppState) -> AppResult<ApiResponse<SettingsMap>> {
    let mut values = load_all(&state.orm).await?;
    for key in PRIVATE_KEYS {
        values.remove(key);
    }
    Ok(ApiResponse::success(
        "OK",
        SettingsMap { values },
        Some(Meta::empty()),
    ))
}

pub async fn all_settings(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<SettingsMap>> {
    ensure_admin(user)?;
    let values = load_all(&state.orm).await?;
    Ok(ApiResponse::success(
        "OK",
        SettingsMap { values },
        Some(Meta::empty()),
    ))
}

/// Upserts every provided key.
pub async fn update_settings(
    state: &AppState,
    user: &AuthUser,
    payload: SettingsMap,
) -> AppResult<ApiResponse<Ack>> {
    ensure_admin(user)?;
    if payload.values.keys().any(|key| key.trim().is_empty()) {
        return Err(AppError::ValidationFailed("setting keys must not be empty".into()));
    }

    let txn = state.orm.begin().await?;
    for (key, value) in &payload.values {
        Settings::insert(SettingActive {
            key: Set(key.clone()),
            value: Set(value.clone()),
        })
        .on_conflict(
            OnConflict::column(SetCol::Key)
                .update_column(SetCol::Value)
                .to_owned(),
        )
        .exec(&txn)
        .await?;
    }
    txn.commit().await?;

    let keys: Vec<&String> = payload.values.keys().collect();
    audit::record(
        &state.orm,
        None,
        "settings_update",
        "settings",
        serde_json::json!({ "keys": keys }),
    )
    .await;

    Ok(ApiResponse::success("Settings saved", Ack::ok(), Some(Meta::empty())))
}
