//! Authenticated caller extractor.

use crate::auth::JwtClaims;
use crate::errors::{AppError, ErrorCode};
use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

/// Identity of the authenticated caller.
///
/// Requires [`optional_jwt_auth_middleware`](crate::auth::optional_jwt_auth_middleware)
/// upstream; without verified claims the request is rejected with 401.
/// Wrap in `Option<AuthUser>` for routes that also serve anonymous callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Uuid,
    pub name: String,
    pub roles: Vec<String>,
}

impl TryFrom<&JwtClaims> for AuthUser {
    type Error = AppError;

    fn try_from(claims: &JwtClaims) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::Unauthorized("Token subject is not a user id".to_string()))?;
        Ok(Self {
            id,
            name: claims.name.clone(),
            roles: claims.roles.clone(),
        })
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let claims = parts.extensions.get::<JwtClaims>().ok_or_else(|| {
            AppError::Unauthorized(ErrorCode::Unauthorized.default_message().to_string())
        })?;
        AuthUser::try_from(claims)
    }
}

impl<S> axum::extract::OptionalFromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        parts
            .extensions
            .get::<JwtClaims>()
            .map(AuthUser::try_from)
            .transpose()
    }
}
