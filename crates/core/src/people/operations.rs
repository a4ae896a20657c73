use crate::access::Role;

use super::{Applicant, Employee, PeopleError};

/// Minimum accepted password length.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Display name made of name and surname.
pub fn full_name(name: &str, surname: &str) -> String {
    format!("{name} {surname}").trim().to_string()
}

/// Validates an employee before it is stored.
pub fn validate_employee(employee: &Employee) -> Result<(), PeopleError> {
    if employee.username.trim().is_empty() {
        return Err(PeopleError::MissingField("username"));
    }
    if employee.name.trim().is_empty() {
        return Err(PeopleError::MissingField("name"));
    }
    if Role::from_id(employee.user_type).is_none() {
        return Err(PeopleError::UnknownUserType(employee.user_type));
    }
    Ok(())
}

/// Validates a plain-text password before hashing.
pub fn validate_password(password: &str) -> Result<(), PeopleError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(PeopleError::PasswordTooShort);
    }
    Ok(())
}

pub fn validate_applicant(applicant: &Applicant) -> Result<(), PeopleError> {
    if applicant.name.trim().is_empty() {
        return Err(PeopleError::MissingField("name"));
    }
    if applicant.file_number.trim().is_empty() {
        return Err(PeopleError::MissingField("file_number"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Audit;
    use chrono::Utc;

    fn employee(user_type: i64) -> Employee {
        Employee {
            id: 1,
            center_id: None,
            name: "Amina".to_string(),
            surname: "Patel".to_string(),
            username: "amina".to_string(),
            password_hash: String::new(),
            user_type,
            email: None,
            contact_number: None,
            department: None,
            audit: Audit::new("admin", Utc::now()),
        }
    }

    #[test]
    fn full_name_joins_and_trims() {
        assert_eq!(full_name("Amina", "Patel"), "Amina Patel");
        assert_eq!(full_name("Amina", ""), "Amina");
    }

    #[test]
    fn rejects_unknown_user_type() {
        assert_eq!(
            validate_employee(&employee(9)),
            Err(PeopleError::UnknownUserType(9))
        );
        assert!(validate_employee(&employee(6)).is_ok());
    }

    #[test]
    fn rejects_blank_username() {
        let mut e = employee(1);
        e.username = "  ".to_string();
        assert_eq!(
            validate_employee(&e),
            Err(PeopleError::MissingField("username"))
        );
    }

    #[test]
    fn password_length() {
        assert_eq!(validate_password("12345"), Err(PeopleError::PasswordTooShort));
        assert!(validate_password("123456").is_ok());
    }
}
