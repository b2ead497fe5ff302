use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::PromoCode;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ValidatePromoRequest {
    pub code: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PromoValidation {
    pub discount: i32,
    pub code: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PromoCodeRequest {
    pub code: String,
    pub discount_percent: i32,
    #[serde(default)]
    pub max_uses: i32,
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PromoCodeList {
    pub promo_codes: Vec<PromoCode>,
}
