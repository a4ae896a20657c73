//! Financial assistance handlers, including recurring templates.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use welfare_core::access::Role;
use welfare_core::assistance::{
    validate_recurring_request, FinancialAssistance, FinancialAssistanceInput,
    RecurringInvoiceLog, RecurringRequest,
};
use welfare_core::audit::Audit;
use welfare_core::storage::is_visible_to;

use super::{authz::Access, deleted, payload::Payload, AppError};
use crate::{scheduler::process_template, state::AppState};

/// Roles allowed to set up recurring assistance.
const RECURRING_ROLES: [Role; 3] = [Role::AppAdmin, Role::Hq, Role::OrgAdmin];

/// List assistance rows (GET /api/financialAssistance).
pub async fn list_assistance(
    access: Access,
    State(state): State<AppState>,
) -> Result<Json<Vec<FinancialAssistance>>, AppError> {
    Ok(Json(state.assistance.list_assistance(access.center()).await?))
}

/// Get one assistance row (GET /api/financialAssistance/{id}).
pub async fn get_assistance(
    access: Access,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<FinancialAssistance>, AppError> {
    state
        .assistance
        .get_assistance(id, access.center())
        .await?
        .map(Json)
        .ok_or_else(AppError::not_found)
}

/// Create a manual assistance row (POST /api/financialAssistance).
pub async fn create_assistance(
    access: Access,
    State(state): State<AppState>,
    Payload { body, .. }: Payload<FinancialAssistanceInput>,
) -> Result<impl IntoResponse, AppError> {
    let mut input: FinancialAssistanceInput = body;
    input.center_id = access.center_for_new(input.center_id);

    let record = input
        .into_assistance(Audit::new(access.actor(), Utc::now()))
        .ok_or_else(|| AppError::bad_request("file_id is required"))?;

    let created = state.assistance.create_assistance(&record).await?;
    tracing::info!(
        assistance_id = created.id,
        file_id = created.file_id,
        "Created financial assistance"
    );

    Ok((StatusCode::CREATED, Json(created)))
}

/// Update an assistance row (PUT /api/financialAssistance/{id}).
///
/// Generator-owned fields and the creator are never changed here.
pub async fn update_assistance(
    access: Access,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Payload { body, .. }: Payload<FinancialAssistanceInput>,
) -> Result<Json<FinancialAssistance>, AppError> {
    let mut record = state
        .assistance
        .get_assistance(id, access.center())
        .await?
        .ok_or_else(AppError::not_found)?;

    body.apply_to(&mut record);
    if let Some(center) = access.center() {
        record.center_id = Some(center);
    }
    record.audit.touch(access.actor(), Utc::now());

    state.assistance.update_assistance(&record).await?;
    tracing::info!(assistance_id = id, "Updated financial assistance");

    Ok(Json(record))
}

/// Delete an assistance row (DELETE /api/financialAssistance/{id}).
pub async fn delete_assistance(
    access: Access,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    state.assistance.delete_assistance(id, access.center()).await?;
    tracing::info!(assistance_id = id, "Deleted financial assistance");
    Ok(deleted())
}

/// Create a recurring template (POST /api/financialAssistance/recurring).
///
/// Occurrences already due are generated straight away and returned with
/// the template.
pub async fn create_recurring(
    access: Access,
    State(state): State<AppState>,
    Payload { body, .. }: Payload<RecurringRequest>,
) -> Result<Response, AppError> {
    if let Err(denied) = access.require_role(&RECURRING_ROLES) {
        return Ok(denied.into_response());
    }

    let now = Utc::now();
    let template = validate_recurring_request(
        body,
        access.center_for_new(None),
        Audit::new(access.actor(), now),
    )?;
    let template = state.assistance.create_assistance(&template).await?;
    let generated = process_template(state.assistance.as_ref(), &template, now.date_naive()).await?;

    tracing::info!(
        template_id = template.id,
        frequency = ?template.frequency,
        generated = generated.len(),
        "Created recurring assistance"
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({ "template": template, "generated": generated })),
    )
        .into_response())
}

#[derive(Debug, Deserialize)]
pub struct LogQuery {
    pub source_id: Option<i64>,
}

/// Generation log (GET /api/financialAssistance/recurring/logs).
pub async fn list_recurring_logs(
    access: Access,
    State(state): State<AppState>,
    Query(query): Query<LogQuery>,
) -> Result<Json<Vec<RecurringInvoiceLog>>, AppError> {
    let center = access.center();
    let logs = state
        .recurring_logs
        .list_recurring_logs(query.source_id)
        .await?
        .into_iter()
        .filter(|log| is_visible_to(center, log.center_id))
        .collect();
    Ok(Json(logs))
}
