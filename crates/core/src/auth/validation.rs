use crate::people::MIN_PASSWORD_LENGTH;

use super::{AuthError, RegisterRequest};

/// Validates a registration request.
///
/// Returns the first failing rule: every field present, matching
/// passwords, then minimum password length. Username uniqueness needs the
/// store and is checked by the caller.
///
/// # Examples
///
/// ```
/// use welfare_core::auth::{validate_registration, AuthError, RegisterRequest};
///
/// let request = RegisterRequest {
///     name: Some("Yusuf".into()),
///     surname: Some("Ali".into()),
///     username: Some("yusuf".into()),
///     password: Some("secret1".into()),
///     confirm_password: Some("secret2".into()),
///     ..Default::default()
/// };
/// assert_eq!(validate_registration(&request), Err(AuthError::PasswordMismatch));
/// ```
pub fn validate_registration(request: &RegisterRequest) -> Result<(), AuthError> {
    let (Some(_), Some(_), Some(_), Some(password), Some(confirm)) = (
        request.name.as_deref(),
        request.surname.as_deref(),
        request.username.as_deref(),
        request.password.as_deref(),
        request.confirm_password.as_deref(),
    ) else {
        return Err(AuthError::MissingFields);
    };

    if password != confirm {
        return Err(AuthError::PasswordMismatch);
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::PasswordTooShort);
    }
    Ok(())
}
