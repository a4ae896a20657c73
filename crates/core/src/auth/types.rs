use serde::{Deserialize, Serialize};

use crate::serde::{deserialize_lenient_i64, deserialize_optional_string};

/// The authenticated principal, as carried inside a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: i64,
    pub username: String,
    /// Numeric role id, see [`crate::access::Role`].
    pub user_type: i64,
    pub full_name: String,
    #[serde(default)]
    pub center_id: Option<i64>,
}

/// JWT claims: the user plus issue and expiry times in Unix seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(flatten)]
    pub user: AuthUser,
    pub iat: i64,
    pub exp: i64,
}

/// Profile details returned next to the token on login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserInfo {
    pub id: i64,
    pub name: String,
    pub surname: String,
    pub username: String,
    pub user_type: i64,
    pub center_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Self-service sign-up payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterRequest {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub surname: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub password: Option<String>,
    #[serde(
        default,
        alias = "confirmPassword",
        deserialize_with = "deserialize_optional_string"
    )]
    pub confirm_password: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub contact_number: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_i64")]
    pub center_id: Option<i64>,
}
