//! Identity Extractor
//!
//! 认证（登录、令牌签发与校验）在上游网关完成，网关将已验证的用户 id
//! 写入 `x-user-id` 请求头。本服务只信任该头；没有它的请求一律 401。

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::utils::AppError;

/// 已认证用户的 id
///
/// ```ignore
/// async fn handler(user: CurrentUser) -> AppResult<...> {
///     let user_id = user.0;
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub i64);

/// Header carrying the authenticated user id, set by the upstream gateway
pub const USER_ID_HEADER: &str = "x-user-id";

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Check if already extracted (from middleware)
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(*user);
        }

        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|h| h.to_str().ok())
            .and_then(|v| v.parse::<i64>().ok());

        match user_id {
            Some(id) => {
                let user = CurrentUser(id);
                // Store in extensions for potential reuse
                parts.extensions.insert(user);
                Ok(user)
            }
            None => {
                tracing::warn!(target: "security", uri = %parts.uri, "Missing or malformed user identity header");
                Err(AppError::Unauthorized)
            }
        }
    }
}
