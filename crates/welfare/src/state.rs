//! Application state with repository-based storage.
//!
//! This module defines the shared application state that is passed to all
//! request handlers. It holds one repository trait object per aggregate, all
//! backed by the storage implementation selected via feature flags.

use std::{sync::Arc, time::Duration};

use axum::extract::FromRef;
use chrono::Utc;
use tokio::sync::broadcast;
use welfare_auth::{hash_password, AuthConfig, AuthState};
use welfare_core::access::Role;
use welfare_core::audit::{Audit, SYSTEM_ACTOR};
use welfare_core::people::Employee;
use welfare_core::storage::{
    ApplicantRepository, BoreholeRepository, ConversationRepository, EmployeeRepository,
    FinancialAssistanceRepository, FolderRepository, LookupRepository, MessageRepository,
    ParticipantRepository, PersonalFileRepository, RecurringInvoiceLogRepository,
    TicketRepository,
};

use crate::config::Config;

/// A backend that implements every repository trait.
pub trait Storage:
    EmployeeRepository
    + ApplicantRepository
    + FinancialAssistanceRepository
    + RecurringInvoiceLogRepository
    + BoreholeRepository
    + TicketRepository
    + ConversationRepository
    + ParticipantRepository
    + MessageRepository
    + LookupRepository
    + FolderRepository
    + PersonalFileRepository
    + 'static
{
}

impl<T> Storage for T where
    T: EmployeeRepository
        + ApplicantRepository
        + FinancialAssistanceRepository
        + RecurringInvoiceLogRepository
        + BoreholeRepository
        + TicketRepository
        + ConversationRepository
        + ParticipantRepository
        + MessageRepository
        + LookupRepository
        + FolderRepository
        + PersonalFileRepository
        + 'static
{
}

/// Shared application state.
///
/// This is cloned for each request handler; every field is reference counted.
#[derive(Clone)]
pub struct AppState {
    pub employees: Arc<dyn EmployeeRepository>,
    pub applicants: Arc<dyn ApplicantRepository>,
    pub assistance: Arc<dyn FinancialAssistanceRepository>,
    pub recurring_logs: Arc<dyn RecurringInvoiceLogRepository>,
    pub boreholes: Arc<dyn BoreholeRepository>,
    pub tickets: Arc<dyn TicketRepository>,
    pub conversations: Arc<dyn ConversationRepository>,
    pub participants: Arc<dyn ParticipantRepository>,
    pub messages: Arc<dyn MessageRepository>,
    pub lookups: Arc<dyn LookupRepository>,
    pub folders: Arc<dyn FolderRepository>,
    pub personal_files: Arc<dyn PersonalFileRepository>,
    /// Token settings and the employee store, shared with `welfare_auth`.
    pub auth: AuthState,
    /// Per-request timeout applied by the router.
    pub request_timeout: Duration,
    /// Shutdown signal sender for background tasks.
    pub shutdown_tx: broadcast::Sender<()>,
}

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}

impl AppState {
    /// Creates a new AppState where every repository is served by `repo`.
    pub fn from_storage<R: Storage>(repo: Arc<R>, auth_config: AuthConfig) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            employees: repo.clone(),
            applicants: repo.clone(),
            assistance: repo.clone(),
            recurring_logs: repo.clone(),
            boreholes: repo.clone(),
            tickets: repo.clone(),
            conversations: repo.clone(),
            participants: repo.clone(),
            messages: repo.clone(),
            lookups: repo.clone(),
            folders: repo.clone(),
            personal_files: repo.clone(),
            auth: AuthState::new(repo, auth_config),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            shutdown_tx,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Creates the initial AppAdmin account when configured and missing.
    ///
    /// Needed to log in at all against a fresh store, since self
    /// registration only ever creates imam users.
    pub async fn with_bootstrap_admin(self, config: &Config) -> Result<Self, anyhow::Error> {
        let (Some(username), Some(password)) = (
            config.bootstrap_admin_username.as_deref(),
            config.bootstrap_admin_password.as_deref(),
        ) else {
            return Ok(self);
        };

        if self.employees.get_employee_by_username(username).await?.is_some() {
            tracing::debug!(%username, "Bootstrap admin already present");
            return Ok(self);
        }

        let employee = Employee {
            id: 0,
            center_id: None,
            name: "App".to_string(),
            surname: "Admin".to_string(),
            username: username.to_string(),
            password_hash: hash_password(password, self.auth.config.bcrypt_cost)?,
            user_type: Role::AppAdmin.id(),
            email: None,
            contact_number: None,
            department: None,
            audit: Audit::new(SYSTEM_ACTOR, Utc::now()),
        };
        let created = self.employees.create_employee(&employee).await?;
        tracing::info!(employee_id = created.id, %username, "Created bootstrap admin");

        Ok(self)
    }

    /// Subscribe to shutdown signal.
    pub fn subscribe_shutdown(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Signal all background tasks to stop.
    pub fn signal_shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }
}

// ============================================================================
// Factory functions for the compiled backend
// ============================================================================

#[cfg(feature = "inmemory")]
mod inmemory {
    use super::*;
    use crate::storage::InMemoryRepository;

    impl AppState {
        /// Creates AppState with in-memory storage.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            tracing::warn!("Using in-memory storage, data is lost on restart");
            let repo = Arc::new(InMemoryRepository::new());
            Self::from_storage(repo, AuthConfig::from_env())
                .with_request_timeout(config.request_timeout())
                .with_bootstrap_admin(config)
                .await
        }
    }
}

#[cfg(feature = "sqlite")]
mod sqlite {
    use super::*;
    use crate::storage::SqliteRepository;

    impl AppState {
        /// Creates AppState with SQLite storage.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            tracing::info!(path = %config.sqlite_path, "Opening SQLite database");
            let repo = Arc::new(SqliteRepository::new(&config.sqlite_path).await?);
            Self::from_storage(repo, AuthConfig::from_env())
                .with_request_timeout(config.request_timeout())
                .with_bootstrap_admin(config)
                .await
        }
    }
}
