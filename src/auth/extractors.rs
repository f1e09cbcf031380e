use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, StatusCode},
};
use tracing::warn;
use uuid::Uuid;

use super::services::JwtKeys;
use crate::store::Owner;

/// Extracts and validates the access token, returning the user ID.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Uuid);

impl AuthUser {
    /// Scope for tracker store calls made on behalf of this user.
    pub fn owner(&self) -> Owner {
        Owner::new(self.0)
    }
}

/// Like [`AuthUser`] but anonymous requests are let through.
///
/// A missing `Authorization` header yields `None`; a present but invalid
/// token is still rejected so clients notice expired credentials.
#[derive(Debug, Clone, Copy)]
pub struct MaybeAuthUser(pub Option<Uuid>);

impl MaybeAuthUser {
    pub fn owner(&self) -> Option<Owner> {
        self.0.map(Owner::new)
    }
}

fn bearer_token(parts: &Parts) -> Option<Result<&str, (StatusCode, String)>> {
    let header = parts.headers.get(axum::http::header::AUTHORIZATION)?;
    let token = header
        .to_str()
        .ok()
        .and_then(|h| h.strip_prefix("Bearer ").or_else(|| h.strip_prefix("bearer ")))
        .ok_or((
            StatusCode::UNAUTHORIZED,
            "Invalid Authorization header".to_string(),
        ));
    Some(token)
}

fn authenticate(keys: &JwtKeys, token: &str) -> Result<Uuid, (StatusCode, String)> {
    match keys.verify_access(token) {
        Ok(claims) => Ok(claims.sub),
        Err(e) => {
            warn!(error = %e, "invalid or expired token");
            Err((
                StatusCode::UNAUTHORIZED,
                "Invalid or expired token".to_string(),
            ))
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = (StatusCode, String);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or((
            StatusCode::UNAUTHORIZED,
            "Missing Authorization header".to_string(),
        ))??;
        let keys = JwtKeys::from_ref(state);
        authenticate(&keys, token).map(AuthUser)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for MaybeAuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = (StatusCode, String);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(parts) else {
            return Ok(MaybeAuthUser(None));
        };
        let keys = JwtKeys::from_ref(state);
        authenticate(&keys, token?).map(|id| MaybeAuthUser(Some(id)))
    }
}
