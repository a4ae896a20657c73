//! HTTP status for storage failures.
//!
//! Constraint violations are the caller's fault: a taken username is a
//! conflict, a message pointing at a missing conversation is a bad request.
//! Everything else that goes wrong in the store is a server error.

use super::RepositoryError;

/// Status code returned for a [`RepositoryError`].
///
/// # Examples
///
/// ```
/// use welfare_core::storage::{repository_error_to_status_code, RepositoryError};
///
/// let taken = RepositoryError::AlreadyExists {
///     entity_type: "Employee",
///     id: "amina".to_string(),
/// };
/// assert_eq!(repository_error_to_status_code(&taken), 409);
///
/// let orphan = RepositoryError::InvalidData("Conversation 99 does not exist".to_string());
/// assert_eq!(repository_error_to_status_code(&orphan), 400);
/// ```
pub fn repository_error_to_status_code(error: &RepositoryError) -> u16 {
    match error {
        RepositoryError::InvalidData(_) => 400,
        RepositoryError::NotFound { .. } => 404,
        RepositoryError::AlreadyExists { .. } => 409,
        RepositoryError::QueryFailed(_) | RepositoryError::Serialization(_) => 500,
        RepositoryError::ConnectionFailed(_) => 503,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constraint_violations_are_client_errors() {
        let cases = [
            (
                RepositoryError::AlreadyExists {
                    entity_type: "Employee",
                    id: "amina".to_string(),
                },
                409,
            ),
            (
                RepositoryError::AlreadyExists {
                    entity_type: "ConversationParticipant",
                    id: "conversation 4, employee 7".to_string(),
                },
                409,
            ),
            (
                RepositoryError::InvalidData("Conversation 99 does not exist".to_string()),
                400,
            ),
            (
                RepositoryError::InvalidData("Folder 12 does not exist".to_string()),
                400,
            ),
        ];
        for (error, status) in cases {
            assert_eq!(repository_error_to_status_code(&error), status, "{error}");
        }
    }

    #[test]
    fn missing_rows_are_not_found() {
        let error = RepositoryError::NotFound {
            entity_type: "Ticket",
            id: "31".to_string(),
        };
        assert_eq!(repository_error_to_status_code(&error), 404);
    }

    #[test]
    fn store_failures_are_server_errors() {
        let unavailable =
            RepositoryError::ConnectionFailed("unable to open welfare.db".to_string());
        assert_eq!(repository_error_to_status_code(&unavailable), 503);

        let broken_row = RepositoryError::Serialization("invalid lookup extras".to_string());
        assert_eq!(repository_error_to_status_code(&broken_row), 500);

        let bad_sql = RepositoryError::QueryFailed("no such table: Personal_Files".to_string());
        assert_eq!(repository_error_to_status_code(&bad_sql), 500);
    }
}
