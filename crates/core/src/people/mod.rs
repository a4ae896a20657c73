mod error;
mod operations;
mod types;

pub use error::PeopleError;
pub use operations::{
    full_name, validate_applicant, validate_employee, validate_password, MIN_PASSWORD_LENGTH,
};
pub use types::{Applicant, ApplicantInput, Employee, EmployeeInput};
