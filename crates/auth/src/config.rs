use chrono::Duration;

/// Secret used when `JWT_SECRET` is unset. Never acceptable in production.
pub const DEFAULT_JWT_SECRET: &str = "defaultsecret";

const DEFAULT_EXPIRES_HOURS: i64 = 8;
const DEFAULT_BCRYPT_COST: u32 = 10;

/// Token and password settings.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl: Duration,
    pub bcrypt_cost: u32,
}

impl AuthConfig {
    pub fn new(jwt_secret: impl Into<String>, token_ttl: Duration) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            token_ttl,
            bcrypt_cost: DEFAULT_BCRYPT_COST,
        }
    }

    /// Sets the bcrypt work factor.
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    /// Load from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `JWT_SECRET`: HMAC secret for tokens (default: `defaultsecret`, with a warning)
    /// - `JWT_EXPIRES_HOURS`: Token lifetime in hours (default: 8)
    /// - `BCRYPT_COST`: bcrypt work factor for new hashes (default: 10)
    pub fn from_env() -> Self {
        let jwt_secret = match std::env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ => {
                tracing::warn!("JWT_SECRET is not set, falling back to an insecure default");
                DEFAULT_JWT_SECRET.to_string()
            }
        };

        let hours = std::env::var("JWT_EXPIRES_HOURS")
            .ok()
            .and_then(|s| s.parse::<i64>().ok())
            .filter(|h| *h > 0)
            .unwrap_or(DEFAULT_EXPIRES_HOURS);

        let bcrypt_cost = std::env::var("BCRYPT_COST")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(DEFAULT_BCRYPT_COST);

        Self::new(jwt_secret, Duration::hours(hours)).with_bcrypt_cost(bcrypt_cost)
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::new(DEFAULT_JWT_SECRET, Duration::hours(DEFAULT_EXPIRES_HOURS))
    }
}
