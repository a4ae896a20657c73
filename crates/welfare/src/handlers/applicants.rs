//! Applicant ("file") CRUD handlers. Applicants may carry a signature upload.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde_json::Value;
use welfare_core::audit::Audit;
use welfare_core::people::{validate_applicant, Applicant, ApplicantInput};

use super::{authz::Access, deleted, payload::Payload, AppError};
use crate::state::AppState;

const SIGNATURE_FIELD: &str = "signature";

/// List applicants (GET /api/applicantDetails).
pub async fn list_applicants(
    access: Access,
    State(state): State<AppState>,
) -> Result<Json<Vec<Applicant>>, AppError> {
    Ok(Json(state.applicants.list_applicants(access.center()).await?))
}

/// Get one applicant (GET /api/applicantDetails/{id}).
pub async fn get_applicant(
    access: Access,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Applicant>, AppError> {
    state
        .applicants
        .get_applicant(id, access.center())
        .await?
        .map(Json)
        .ok_or_else(AppError::not_found)
}

/// Create an applicant (POST /api/applicantDetails).
pub async fn create_applicant(
    access: Access,
    State(state): State<AppState>,
    mut payload: Payload<ApplicantInput>,
) -> Result<impl IntoResponse, AppError> {
    let now = Utc::now();
    let signature = payload.attachment(SIGNATURE_FIELD, now);
    let mut input = payload.body;
    input.center_id = access.center_for_new(input.center_id);

    let applicant = input.into_applicant(signature, Audit::new(access.actor(), now))?;
    validate_applicant(&applicant)?;

    let created = state.applicants.create_applicant(&applicant).await?;
    tracing::info!(
        applicant_id = created.id,
        file_number = %created.file_number,
        "Created applicant"
    );

    Ok((StatusCode::CREATED, Json(created)))
}

/// Update an applicant (PUT /api/applicantDetails/{id}).
///
/// A new signature upload replaces the stored one; otherwise it is kept.
pub async fn update_applicant(
    access: Access,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    mut payload: Payload<ApplicantInput>,
) -> Result<Json<Applicant>, AppError> {
    let now = Utc::now();
    let mut applicant = state
        .applicants
        .get_applicant(id, access.center())
        .await?
        .ok_or_else(AppError::not_found)?;

    if let Some(signature) = payload.attachment(SIGNATURE_FIELD, now) {
        applicant.signature = Some(signature);
    }
    payload.body.apply_to(&mut applicant);
    if let Some(center) = access.center() {
        applicant.center_id = Some(center);
    }
    applicant.audit.touch(access.actor(), now);
    validate_applicant(&applicant)?;

    state.applicants.update_applicant(&applicant).await?;
    tracing::info!(applicant_id = id, "Updated applicant");

    Ok(Json(applicant))
}

/// Delete an applicant (DELETE /api/applicantDetails/{id}).
pub async fn delete_applicant(
    access: Access,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    state.applicants.delete_applicant(id, access.center()).await?;
    tracing::info!(applicant_id = id, "Deleted applicant");
    Ok(deleted())
}
