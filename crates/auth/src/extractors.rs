//! Axum extractors for authentication.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use chrono::Utc;
use welfare_core::auth::{extract_token, AuthError as CoreError, AuthUser};

use crate::{error::AuthError, tokens::verify_token, AuthState};

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(extract_token)
}

/// Extractor for the authenticated user. Rejects with 401 otherwise.
pub struct CurrentUser(pub AuthUser);

impl<S> FromRequestParts<S> for CurrentUser
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);
        let token = bearer_token(parts).ok_or(CoreError::MissingToken)?;
        let claims = verify_token(token, &auth_state.config, Utc::now()).inspect_err(|_| {
            tracing::warn!(path = %parts.uri.path(), "Rejected bearer token");
        })?;
        Ok(CurrentUser(claims.user))
    }
}

/// Extractor for an optionally authenticated user. Never rejects.
pub struct OptionalUser(pub Option<AuthUser>);

impl<S> FromRequestParts<S> for OptionalUser
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);
        let user = bearer_token(parts)
            .and_then(|token| verify_token(token, &auth_state.config, Utc::now()).ok())
            .map(|claims| claims.user);
        Ok(OptionalUser(user))
    }
}
