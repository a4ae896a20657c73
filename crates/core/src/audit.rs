//! Audit fields shared by every stored record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The actor recorded for writes made by background jobs.
pub const SYSTEM_ACTOR: &str = "system";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Audit {
    pub created_by: String,
    pub updated_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Audit {
    /// Audit fields for a record created by `actor` at `now`.
    pub fn new(actor: impl Into<String>, now: DateTime<Utc>) -> Self {
        let actor = actor.into();
        Self {
            created_by: actor.clone(),
            updated_by: actor,
            created_at: now,
            updated_at: now,
        }
    }

    /// Records an update. `created_by` and `created_at` never change.
    pub fn touch(&mut self, actor: impl Into<String>, now: DateTime<Utc>) {
        self.updated_by = actor.into();
        self.updated_at = now;
    }
}
