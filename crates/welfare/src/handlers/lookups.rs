//! Generic CRUD over the allowlisted lookup tables.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde_json::{Map, Value};
use welfare_core::audit::Audit;
use welfare_core::lookup::{can_mutate_lookup, find_table, LookupRow, LookupTable};

use super::{authz::Access, deleted, payload::Payload, AppError};
use crate::state::AppState;

/// Resolves `name` and checks the caller may write to it.
fn writable_table(access: &Access, name: &str) -> Result<&'static LookupTable, AppError> {
    let table = find_table(name)?;
    can_mutate_lookup(table, Some(access.role()))?;
    Ok(table)
}

/// GET /api/lookup/{table}
pub async fn list_lookups(
    _access: Access,
    State(state): State<AppState>,
    Path(table): Path<String>,
) -> Result<Json<Vec<LookupRow>>, AppError> {
    let table = find_table(&table)?;
    Ok(Json(
        state.lookups.list_lookups(table.name, table.order_by_name).await?,
    ))
}

/// GET /api/lookup/{table}/{id}
pub async fn get_lookup(
    _access: Access,
    State(state): State<AppState>,
    Path((table, id)): Path<(String, i64)>,
) -> Result<Json<LookupRow>, AppError> {
    let table = find_table(&table)?;
    state
        .lookups
        .get_lookup(table.name, id)
        .await?
        .map(Json)
        .ok_or_else(AppError::not_found)
}

/// POST /api/lookup/{table}
pub async fn create_lookup(
    access: Access,
    State(state): State<AppState>,
    Path(table): Path<String>,
    Payload { body, .. }: Payload<Map<String, Value>>,
) -> Result<impl IntoResponse, AppError> {
    let table = writable_table(&access, &table)?;
    let row = LookupRow::from_fields(body, Audit::new(access.actor(), Utc::now()));

    let created = state.lookups.create_lookup(table.name, &row).await?;
    tracing::info!(table = table.name, lookup_id = created.id, "Created lookup row");

    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/lookup/{table}/{id}
pub async fn update_lookup(
    access: Access,
    State(state): State<AppState>,
    Path((table, id)): Path<(String, i64)>,
    Payload { body, .. }: Payload<Map<String, Value>>,
) -> Result<Json<LookupRow>, AppError> {
    let table = writable_table(&access, &table)?;
    let mut row = state
        .lookups
        .get_lookup(table.name, id)
        .await?
        .ok_or_else(AppError::not_found)?;

    row.apply_fields(body);
    row.audit.touch(access.actor(), Utc::now());
    state.lookups.update_lookup(table.name, &row).await?;
    tracing::info!(table = table.name, lookup_id = id, "Updated lookup row");

    Ok(Json(row))
}

/// DELETE /api/lookup/{table}/{id}
pub async fn delete_lookup(
    access: Access,
    State(state): State<AppState>,
    Path((table, id)): Path<(String, i64)>,
) -> Result<Json<Value>, AppError> {
    let table = writable_table(&access, &table)?;
    state.lookups.delete_lookup(table.name, id).await?;
    tracing::info!(table = table.name, lookup_id = id, "Deleted lookup row");
    Ok(deleted())
}
