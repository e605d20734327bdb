use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::warn;
use uuid::Uuid;

use crate::{auth::jwt::JwtKeys, errors::AppError};

/// Authenticated caller. Only the user id is carried forward; nothing else
/// from the request is trusted.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or(AppError::Unauthorized("Authorization header missing or malformed"))?;

        let keys = JwtKeys::from_ref(state);
        match keys.verify(token) {
            Ok(user_id) => Ok(AuthUser(user_id)),
            Err(kind) => {
                warn!(reason = %kind, "jwt verification failed");
                Err(AppError::Unauthorized("Invalid or expired token"))
            }
        }
    }
}

// Expect "Bearer <token>"
fn bearer_token(parts: &Parts) -> Option<&str> {
    let header = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}
