pub mod applicants;
pub mod assistance;
pub mod authz;
pub mod boreholes;
pub mod conversations;
pub mod employees;
pub mod error;
pub mod folders;
pub mod health;
pub mod lookups;
pub mod messages;
pub mod participants;
pub mod payload;
pub mod personal_files;
pub mod tickets;

use axum::Json;
use serde_json::{json, Value};

pub use error::AppError;

/// Body returned by every successful delete.
pub(crate) fn deleted() -> Json<Value> {
    Json(json!({ "message": "Deleted successfully" }))
}
