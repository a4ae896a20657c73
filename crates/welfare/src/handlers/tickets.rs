//! Support ticket handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde_json::Value;
use welfare_core::audit::Audit;
use welfare_core::outreach::{Ticket, TicketInput};

use super::{authz::Access, deleted, payload::Payload, AppError};
use crate::state::AppState;

const MEDIA_FIELD: &str = "media";

pub async fn list_tickets(
    access: Access,
    State(state): State<AppState>,
) -> Result<Json<Vec<Ticket>>, AppError> {
    Ok(Json(state.tickets.list_tickets(access.center()).await?))
}

pub async fn get_ticket(
    access: Access,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Ticket>, AppError> {
    state
        .tickets
        .get_ticket(id, access.center())
        .await?
        .map(Json)
        .ok_or_else(AppError::not_found)
}

pub async fn create_ticket(
    access: Access,
    State(state): State<AppState>,
    mut payload: Payload<TicketInput>,
) -> Result<impl IntoResponse, AppError> {
    let now = Utc::now();
    let media = payload.attachment(MEDIA_FIELD, now);
    let mut input = payload.body;
    input.center_id = access.center_for_new(input.center_id);

    let ticket = input.into_ticket(media, Audit::new(access.actor(), now))?;
    let created = state.tickets.create_ticket(&ticket).await?;
    tracing::info!(ticket_id = created.id, status_id = created.status_id, "Created ticket");

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_ticket(
    access: Access,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    mut payload: Payload<TicketInput>,
) -> Result<Json<Ticket>, AppError> {
    let now = Utc::now();
    let mut ticket = state
        .tickets
        .get_ticket(id, access.center())
        .await?
        .ok_or_else(AppError::not_found)?;

    if let Some(media) = payload.attachment(MEDIA_FIELD, now) {
        ticket.media = Some(media);
    }
    payload.body.apply_to(&mut ticket);
    if let Some(center) = access.center() {
        ticket.center_id = Some(center);
    }
    ticket.audit.touch(access.actor(), now);

    state.tickets.update_ticket(&ticket).await?;
    tracing::info!(ticket_id = id, status_id = ticket.status_id, "Updated ticket");

    Ok(Json(ticket))
}

pub async fn delete_ticket(
    access: Access,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    state.tickets.delete_ticket(id, access.center()).await?;
    tracing::info!(ticket_id = id, "Deleted ticket");
    Ok(deleted())
}
