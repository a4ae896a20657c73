//! Bearer-token authentication for the welfare backend.
//!
//! This crate provides:
//! - Login and self-registration handlers
//! - HS256 token issuing and verification
//! - bcrypt password hashing
//! - Axum extractors for the authenticated user

mod config;
mod error;
mod extractors;
mod handlers;
mod password;
mod state;
mod tokens;

pub use config::AuthConfig;
pub use error::AuthError;
pub use extractors::{CurrentUser, OptionalUser};
pub use handlers::auth_routes;
pub use password::{hash_password, verify_password};
pub use state::AuthState;
pub use tokens::{issue_token, verify_token};
