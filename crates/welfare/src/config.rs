use std::{env, time::Duration};

/// Default schedule for the recurring invoice run: 02:00 every day.
pub const DEFAULT_RECURRING_CRON: &str = "0 2 * * *";
pub const DEFAULT_RECURRING_TIMEZONE: &str = "Africa/Johannesburg";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to SQLite database file (default: "welfare.db")
    /// Note: Only used when the `sqlite` feature is enabled.
    #[cfg_attr(not(feature = "sqlite"), allow(dead_code))]
    pub sqlite_path: String,
    /// Cron expression for the recurring invoice run (default: "0 2 * * *")
    pub recurring_cron: String,
    /// IANA timezone the cron expression is evaluated in
    pub recurring_timezone: String,
    /// Skip starting the recurring invoice scheduler (default: false)
    pub disable_recurring_cron: bool,
    /// Per-request timeout in seconds (default: 30)
    pub request_timeout_seconds: u64,
    /// AppAdmin account created at startup when missing
    pub bootstrap_admin_username: Option<String>,
    pub bootstrap_admin_password: Option<String>,
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes"
    )
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `SQLITE_PATH` - SQLite database path (default: "welfare.db")
    /// - `RECURRING_INVOICE_CRON` - Recurring run schedule (default: "0 2 * * *")
    /// - `RECURRING_INVOICE_TIMEZONE` - Schedule timezone (default: "Africa/Johannesburg")
    /// - `DISABLE_RECURRING_CRON` - Set to `true` to disable the scheduler
    /// - `REQUEST_TIMEOUT_SECONDS` - Request timeout (default: 30)
    /// - `BOOTSTRAP_ADMIN_USERNAME` / `BOOTSTRAP_ADMIN_PASSWORD` - Initial AppAdmin login
    pub fn from_env() -> Self {
        Self {
            sqlite_path: env::var("SQLITE_PATH").unwrap_or_else(|_| "welfare.db".to_string()),
            recurring_cron: non_empty_var("RECURRING_INVOICE_CRON")
                .unwrap_or_else(|| DEFAULT_RECURRING_CRON.to_string()),
            recurring_timezone: non_empty_var("RECURRING_INVOICE_TIMEZONE")
                .unwrap_or_else(|| DEFAULT_RECURRING_TIMEZONE.to_string()),
            disable_recurring_cron: env::var("DISABLE_RECURRING_CRON")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
            request_timeout_seconds: env::var("REQUEST_TIMEOUT_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(30),
            bootstrap_admin_username: non_empty_var("BOOTSTRAP_ADMIN_USERNAME"),
            bootstrap_admin_password: non_empty_var("BOOTSTRAP_ADMIN_PASSWORD"),
        }
    }

    /// Get the request timeout as a Duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
