use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use crate::response::{ApiResponse, Meta};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not Found")]
    NotFound,

    #[error("Please login first")]
    NotAuthenticated,

    #[error("Forbidden")]
    Forbidden,

    #[error("{0}")]
    ValidationFailed(String),

    #[error("Cart is empty")]
    EmptyCart,

    #[error("Invalid promo code")]
    PromoNotFound,

    #[error("This promo code has expired")]
    PromoExpired,

    #[error("This promo code has reached its usage limit")]
    PromoUsageLimitReached,

    #[error("Insufficient balance")]
    InsufficientBalance {
        required: Decimal,
        current: Decimal,
        referral_link: String,
    },

    #[error("ORM error")]
    OrmError(#[from] sea_orm::DbErr),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Machine-readable kind, stable across message wording changes.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound => "not_found",
            AppError::NotAuthenticated => "not_authenticated",
            AppError::Forbidden => "forbidden",
            AppError::ValidationFailed(_) => "validation_failed",
            AppError::EmptyCart => "empty_cart",
            AppError::PromoNotFound => "invalid_promo",
            AppError::PromoExpired => "promo_expired",
            AppError::PromoUsageLimitReached => "promo_usage_limit",
            AppError::InsufficientBalance { .. } => "insufficient_balance",
            AppError::OrmError(_) | AppError::Internal(_) => "internal",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::NotAuthenticated => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::ValidationFailed(_)
            | AppError::EmptyCart
            | AppError::PromoNotFound
            | AppError::PromoExpired
            | AppError::PromoUsageLimitReached
            | AppError::InsufficientBalance { .. } => StatusCode::BAD_REQUEST,
            AppError::OrmError(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorData {
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    required: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    current: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    shortfall: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    referral_link: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            AppError::OrmError(err) => tracing::error!(error = %err, "database failure"),
            AppError::Internal(err) => tracing::error!(error = %err, "internal failure"),
            _ => {}
        }

        let mut data = ErrorData {
            error: self.code(),
            required: None,
            current: None,
            shortfall: None,
            referral_link: None,
        };
        if let AppError::InsufficientBalance {
            required,
            current,
            referral_link,
        } = &self
        {
            data.required = Some(*required);
            data.current = Some(*current);
            data.shortfall = Some(*required - *current);
            data.referral_link = Some(referral_link.clone());
        }

        let body = ApiResponse {
            message: self.to_string(),
            data: Some(data),
            meta: Some(Meta::empty()),
        };

        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
