//! Health check endpoints.
//!
//! - `/livez` - Basic liveness check (immediate 200, no checks)
//! - `/health` - Readiness check (one storage round trip)

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::state::AppState;

/// GET /livez - Basic liveness check.
///
/// Returns 200 immediately. Used to check if the server is accepting connections.
#[axum::debug_handler]
pub async fn livez() -> StatusCode {
    StatusCode::OK
}

/// GET /health - Readiness check.
///
/// Issues a single cheap read against the store. Returns 200 when it
/// succeeds and 503 with the error otherwise.
#[axum::debug_handler]
pub async fn health(State(state): State<AppState>) -> Response {
    match state.employees.get_employee(0, None).await {
        Ok(_) => (StatusCode::OK, Json(json!({ "status": "ok" }))).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unavailable", "error": e.to_string() })),
            )
                .into_response()
        }
    }
}
