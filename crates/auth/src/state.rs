//! Application state for auth.

use std::sync::Arc;

use welfare_core::storage::EmployeeRepository;

use crate::config::AuthConfig;

/// Shared state for auth handlers and extractors.
///
/// Parent states expose it through `axum::extract::FromRef`.
#[derive(Clone)]
pub struct AuthState {
    pub employees: Arc<dyn EmployeeRepository>,
    pub config: Arc<AuthConfig>,
}

impl AuthState {
    pub fn new(employees: Arc<dyn EmployeeRepository>, config: AuthConfig) -> Self {
        Self {
            employees,
            config: Arc::new(config),
        }
    }
}
