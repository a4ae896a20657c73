mod error;
mod functions;
mod types;
mod validation;

pub use error::AuthError;
pub use functions::{
    auth_user_from_employee, calculate_expiry, claims_for, extract_token, is_expired,
};
pub use types::{AuthUser, Claims, LoginRequest, RegisterRequest, UserInfo};
pub use validation::validate_registration;
