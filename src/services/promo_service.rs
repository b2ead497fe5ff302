use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};

use crate::{
    dto::promo::{PromoValidation, ValidatePromoRequest},
    entity::promo_codes::{Column as PromoCol, Entity as PromoCodes, Model as PromoModel},
    error::{AppError, AppResult},
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Canonical stored form of a promo code.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Checks expiry then usage cap. Never mutates the code.
pub fn check_usable(promo: &PromoModel, now: DateTime<Utc>) -> AppResult<()> {
    if let Some(expires_at) = promo.expires_at {
        if now > expires_at {
            return Err(AppError::PromoExpired);
        }
    }
    if promo.max_uses > 0 && promo.used_count >= promo.max_uses {
        return Err(AppError::PromoUsageLimitReached);
    }
    Ok(())
}

/// Looks up an active code case-insensitively and checks it can still be redeemed at `now`.
pub async fn validate<C: ConnectionTrait>(
    conn: &C,
    code: &str,
    now: DateTime<Utc>,
) -> AppResult<PromoModel> {
    let promo = PromoCodes::find()
        .filter(PromoCol::Code.eq(normalize_code(code)))
        .filter(PromoCol::Active.eq(true))
        .one(conn)
        .await?
        .ok_or(AppError::PromoNotFound)?;

    check_usable(&promo, now)?;
    Ok(promo)
}

pub async fn validate_code(
    state: &AppState,
    payload: ValidatePromoRequest,
) -> AppResult<ApiResponse<PromoValidation>> {
    let code = payload
        .code
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| AppError::ValidationFailed("Promo code required".into()))?;

    let promo = validate(&state.orm, &code, Utc::now()).await?;

    Ok(ApiResponse::success(
        "Promo code applied",
        PromoValidation {
            discount: promo.discount_percent,
            code: promo.code,
        },
        Some(Meta::empty()),
    ))
}
