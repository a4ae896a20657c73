use thiserror::Error;

/// Validation errors for employees and applicants.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PeopleError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("Unknown user type: {0}")]
    UnknownUserType(i64),
    #[error("Password must be at least 6 characters")]
    PasswordTooShort,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_people_error_display() {
        assert_eq!(
            PeopleError::MissingField("username").to_string(),
            "username is required"
        );
        assert_eq!(
            PeopleError::UnknownUserType(9).to_string(),
            "Unknown user type: 9"
        );
    }
}
