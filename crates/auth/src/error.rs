use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use welfare_core::storage::RepositoryError;

/// Auth errors for the welfare_auth crate.
///
/// Wraps the core `AuthError` and adds the failures that only happen at
/// the I/O edge.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Core(#[from] welfare_core::auth::AuthError),

    #[error("token signing failed: {0}")]
    Signing(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<bcrypt::BcryptError> for AuthError {
    fn from(err: bcrypt::BcryptError) -> Self {
        AuthError::Core(welfare_core::auth::AuthError::Hashing(err.to_string()))
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        use welfare_core::auth::AuthError as CoreError;

        let (status, message) = match &self {
            AuthError::Core(core_err) => match core_err {
                CoreError::InvalidCredentials
                | CoreError::MissingFields
                | CoreError::PasswordMismatch
                | CoreError::PasswordTooShort
                | CoreError::UsernameTaken => (StatusCode::BAD_REQUEST, self.to_string()),
                CoreError::MissingToken | CoreError::InvalidToken => {
                    (StatusCode::UNAUTHORIZED, self.to_string())
                }
                CoreError::Hashing(_) | CoreError::Storage(_) => {
                    tracing::error!("Auth error: {}", self);
                    (StatusCode::INTERNAL_SERVER_ERROR, "Server error".to_string())
                }
            },
            AuthError::Signing(_) | AuthError::Repository(_) => {
                tracing::error!("Auth error: {}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, "Server error".to_string())
            }
        };

        (status, Json(json!({ "msg": message }))).into_response()
    }
}
