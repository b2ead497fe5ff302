use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{error::AppError, state::AppState};

pub const API_KEY_HEADER: &str = "x-api-key";

/// Proof that the request came from the game-server plugin. The key is read from
/// the `X-API-Key` header, or the `api_key` query parameter as a fallback.
#[derive(Debug, Clone, Copy)]
pub struct PluginKey;

fn key_from_query(parts: &Parts) -> Option<&str> {
    parts.uri.query()?.split('&').find_map(|pair| {
        let (name, value) = pair.split_once('=')?;
        (name == "api_key" || name == "apiKey").then_some(value)
    })
}

impl FromRequestParts<AppState> for PluginKey {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let presented = parts
            .headers
            .get(API_KEY_HEADER)
            .and_then(|value| value.to_str().ok())
            .or_else(|| key_from_query(parts));

        match presented {
            Some(key) if !state.config.api_key.is_empty() && key == state.config.api_key => {
                Ok(PluginKey)
            }
            _ => {
                tracing::warn!(uri = %parts.uri, "rejected plugin request with invalid api key");
                Err(AppError::NotAuthenticated)
            }
        }
    }
}
