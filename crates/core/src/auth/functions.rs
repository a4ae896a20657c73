use chrono::{DateTime, Duration, Utc};

use crate::people::{full_name, Employee};

use super::{AuthUser, Claims};

/// Calculate token expiry from issue time and TTL.
pub fn calculate_expiry(issued_at: DateTime<Utc>, ttl: Duration) -> DateTime<Utc> {
    issued_at + ttl
}

/// Builds the token claims for `user`, issued at `now`.
pub fn claims_for(user: AuthUser, now: DateTime<Utc>, ttl: Duration) -> Claims {
    Claims {
        user,
        iat: now.timestamp(),
        exp: calculate_expiry(now, ttl).timestamp(),
    }
}

/// Check if the claims have expired.
pub fn is_expired(claims: &Claims, now: DateTime<Utc>) -> bool {
    claims.exp <= now.timestamp()
}

pub fn auth_user_from_employee(employee: &Employee) -> AuthUser {
    AuthUser {
        id: employee.id,
        username: employee.username.clone(),
        user_type: employee.user_type,
        full_name: full_name(&employee.name, &employee.surname),
        center_id: employee.center_id,
    }
}

/// Extracts the token from an `Authorization` header value.
///
/// Both `Bearer <token>` and a bare token are accepted. Returns `None`
/// when no token is present.
pub fn extract_token(header: &str) -> Option<&str> {
    let token = match header.strip_prefix("Bearer ") {
        Some(rest) => rest.split_whitespace().next().unwrap_or(""),
        None => header.trim(),
    };
    (!token.is_empty()).then_some(token)
}
