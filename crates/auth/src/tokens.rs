//! HS256 bearer tokens carrying the user's identity.

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use welfare_core::auth::{claims_for, is_expired, AuthError as CoreError, AuthUser, Claims};

use crate::config::AuthConfig;
use crate::error::AuthError;

/// Signs a token for `user`, valid for the configured TTL from `now`.
pub fn issue_token(
    user: AuthUser,
    config: &AuthConfig,
    now: DateTime<Utc>,
) -> Result<String, AuthError> {
    let claims = claims_for(user, now, config.token_ttl);
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| AuthError::Signing(e.to_string()))
}

/// Verifies a token's signature and expiry as of `now`.
pub fn verify_token(
    token: &str,
    config: &AuthConfig,
    now: DateTime<Utc>,
) -> Result<Claims, CoreError> {
    let mut validation = Validation::new(Algorithm::HS256);
    // Expiry is checked against `now` below.
    validation.validate_exp = false;

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        tracing::debug!(error = %e, "Rejected token");
        CoreError::InvalidToken
    })?
    .claims;

    if is_expired(&claims, now) {
        return Err(CoreError::InvalidToken);
    }
    Ok(claims)
}
