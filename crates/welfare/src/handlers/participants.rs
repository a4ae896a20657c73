//! Conversation membership handlers (/api/conversationParticipants).
//!
//! App admins and HQ manage any conversation. Other callers only see and
//! change the membership of conversations they are active in.

use std::collections::HashSet;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use welfare_core::audit::Audit;
use welfare_core::messaging::{ConversationParticipant, MessagingError, ParticipantInput};

use super::{
    authz::Access, conversations::active_participant, deleted, payload::Payload, AppError,
};
use crate::state::AppState;

async fn ensure_member(
    state: &AppState,
    access: &Access,
    conversation_id: i64,
) -> Result<(), AppError> {
    if access.role().is_privileged()
        || active_participant(state, conversation_id, access.user.id).await?.is_some()
    {
        return Ok(());
    }
    Err(MessagingError::NotParticipant.into())
}

async fn load(
    state: &AppState,
    access: &Access,
    id: i64,
) -> Result<ConversationParticipant, AppError> {
    let participant = state
        .participants
        .get_participant(id)
        .await?
        .ok_or_else(AppError::not_found)?;
    if !access.role().is_privileged()
        && active_participant(state, participant.conversation_id, access.user.id)
            .await?
            .is_none()
    {
        return Err(AppError::not_found());
    }
    Ok(participant)
}

#[derive(Debug, Deserialize)]
pub struct ParticipantQuery {
    pub conversation_id: Option<i64>,
}

pub async fn list_participants(
    access: Access,
    State(state): State<AppState>,
    Query(query): Query<ParticipantQuery>,
) -> Result<Json<Vec<ConversationParticipant>>, AppError> {
    let participants = state.participants.list_participants(query.conversation_id).await?;
    if access.role().is_privileged() {
        return Ok(Json(participants));
    }

    let mine: HashSet<i64> = participants
        .iter()
        .filter(|p| p.employee_id == access.user.id && p.deleted_at.is_none())
        .map(|p| p.conversation_id)
        .collect();
    Ok(Json(
        participants
            .into_iter()
            .filter(|p| mine.contains(&p.conversation_id))
            .collect(),
    ))
}

pub async fn get_participant(
    access: Access,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ConversationParticipant>, AppError> {
    Ok(Json(load(&state, &access, id).await?))
}

/// Add an employee to a conversation.
pub async fn create_participant(
    access: Access,
    State(state): State<AppState>,
    Payload { body, .. }: Payload<ParticipantInput>,
) -> Result<impl IntoResponse, AppError> {
    let participant = body.into_participant(Audit::new(access.actor(), Utc::now()))?;
    state
        .conversations
        .get_conversation(participant.conversation_id)
        .await?
        .ok_or_else(AppError::not_found)?;
    ensure_member(&state, &access, participant.conversation_id).await?;

    let created = state.participants.create_participant(&participant).await?;
    tracing::info!(
        conversation_id = created.conversation_id,
        employee_id = created.employee_id,
        "Added conversation participant"
    );

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_participant(
    access: Access,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Payload { body, .. }: Payload<ParticipantInput>,
) -> Result<Json<ConversationParticipant>, AppError> {
    let mut participant = load(&state, &access, id).await?;
    body.apply_to(&mut participant);
    ensure_member(&state, &access, participant.conversation_id).await?;
    participant.audit.touch(access.actor(), Utc::now());

    state.participants.update_participant(&participant).await?;
    tracing::info!(participant_id = id, "Updated conversation participant");

    Ok(Json(participant))
}

pub async fn delete_participant(
    access: Access,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    load(&state, &access, id).await?;
    state.participants.delete_participant(id).await?;
    tracing::info!(participant_id = id, "Removed conversation participant");
    Ok(deleted())
}
