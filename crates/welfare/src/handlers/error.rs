use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use welfare_core::assistance::RecurringError;
use welfare_core::files::FilesError;
use welfare_core::lookup::LookupError;
use welfare_core::messaging::MessagingError;
use welfare_core::outreach::OutreachError;
use welfare_core::people::PeopleError;
use welfare_core::storage::{repository_error_to_status_code, RepositoryError};

/// Request-level failures raised directly by handlers.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("Not found")]
    NotFound,
    /// A 404 with a specific message.
    #[error("{0}")]
    Missing(&'static str),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Forbidden(String),
}

/// Handler error wrapping `anyhow::Error`.
///
/// The status is chosen by downcasting to the known error types; anything
/// else is a 500. The body is always `{"error": message}`.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    pub fn not_found() -> Self {
        Self(HandlerError::NotFound.into())
    }

    pub fn missing(message: &'static str) -> Self {
        Self(HandlerError::Missing(message).into())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self(HandlerError::BadRequest(message.into()).into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self(HandlerError::Forbidden(message.into()).into())
    }
}

fn status_for(error: &anyhow::Error) -> StatusCode {
    if let Some(e) = error.downcast_ref::<HandlerError>() {
        return match e {
            HandlerError::NotFound | HandlerError::Missing(_) => StatusCode::NOT_FOUND,
            HandlerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            HandlerError::Forbidden(_) => StatusCode::FORBIDDEN,
        };
    }
    if let Some(e) = error.downcast_ref::<RepositoryError>() {
        let code = repository_error_to_status_code(e);
        return StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    }
    if let Some(e) = error.downcast_ref::<MessagingError>() {
        return match e {
            MessagingError::DirectOnly | MessagingError::NotParticipant => StatusCode::FORBIDDEN,
            MessagingError::UnknownKind(_) | MessagingError::MissingField(_) => {
                StatusCode::BAD_REQUEST
            }
        };
    }
    if let Some(e) = error.downcast_ref::<LookupError>() {
        return match e {
            LookupError::UnknownTable(_) => StatusCode::BAD_REQUEST,
            LookupError::Restricted { .. } => StatusCode::FORBIDDEN,
        };
    }
    if error.is::<RecurringError>()
        || error.is::<PeopleError>()
        || error.is::<OutreachError>()
        || error.is::<FilesError>()
    {
        return StatusCode::BAD_REQUEST;
    }
    StatusCode::INTERNAL_SERVER_ERROR
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);

        let message = match self.0.downcast_ref::<RepositoryError>() {
            Some(RepositoryError::NotFound { .. }) => "Not found".to_string(),
            _ => self.0.to_string(),
        };

        match status {
            s if s.is_server_error() => tracing::error!(error = %self.0, "Request failed"),
            StatusCode::FORBIDDEN => tracing::warn!(error = %self.0, "Request forbidden"),
            _ => tracing::debug!(error = %self.0, status = %status, "Request rejected"),
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use serde_json::Value;

    async fn render(error: AppError) -> (StatusCode, Value) {
        let response = error.into_response();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_repository_not_found_is_generic() {
        let (status, body) = render(AppError::from(RepositoryError::NotFound {
            entity_type: "Ticket",
            id: "3".to_string(),
        }))
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Not found");
    }

    #[tokio::test]
    async fn test_conflict_keeps_message() {
        let (status, body) = render(AppError::from(RepositoryError::AlreadyExists {
            entity_type: "Employee",
            id: "amina".to_string(),
        }))
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "Employee already exists: amina");
    }

    #[tokio::test]
    async fn test_validation_errors_are_bad_requests() {
        let (status, body) = render(AppError::from(RecurringError::RangeTooLong)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Recurring schedules cannot exceed 12 months.");

        let (status, _) = render(AppError::from(OutreachError::EmptyUpdate)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = render(AppError::from(FilesError::UnknownFolder(12))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Folder 12 does not exist");

        let (status, body) =
            render(AppError::from(LookupError::UnknownTable("Users".to_string()))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid lookup table");
    }

    #[tokio::test]
    async fn test_business_rule_denials_are_forbidden() {
        let (status, _) = render(AppError::from(MessagingError::DirectOnly)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = render(AppError::forbidden("nope")).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_unknown_errors_are_internal() {
        let (status, body) = render(AppError(anyhow::anyhow!("disk on fire"))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "disk on fire");
    }
}
