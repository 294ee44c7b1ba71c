//! CurrentUser Extractor
//!
//! Custom extractor for deriving the caller identity from the bearer token

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::auth::token::{decode_subject, extract_bearer};
use crate::core::ServerState;
use shared::AppError;

/// 当前用户上下文
///
/// `id` 是令牌 subject claim 解码出的调用者身份；`token` 是原始令牌，
/// 每次下游调用都会原样转发。
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// 调用者用户 ID (未验证的 subject claim)
    pub id: Uuid,
    /// 原始 Bearer 令牌 (用于下游转发)
    pub token: String,
}

/// Use this extractor in protected handlers to derive the caller identity
/// and keep the raw token for downstream forwarding
impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        // Check if already extracted earlier in this request
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        // Extract Authorization header
        let auth_header = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        let token = match auth_header {
            Some(header) => extract_bearer(header)
                .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
            None => {
                tracing::warn!(uri = %parts.uri, "Request without bearer token");
                return Err(AppError::unauthorized());
            }
        };

        let id = decode_subject(token)?;

        let user = CurrentUser {
            id,
            token: token.to_string(),
        };

        // Store in extensions for potential reuse
        parts.extensions.insert(user.clone());

        Ok(user)
    }
}
