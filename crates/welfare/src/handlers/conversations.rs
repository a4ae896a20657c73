//! Conversation handlers.
//!
//! Conversations are visible to their participants only. A participant who
//! deleted a conversation no longer sees it until a new message restores it.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use welfare_core::access::Role;
use welfare_core::audit::Audit;
use welfare_core::messaging::{
    direct_participant_names, mark_deleted, unread_count, Conversation, ConversationInput,
    ConversationKind, ConversationParticipant, ConversationSummary, MessagingError,
};

use super::{authz::Access, deleted, payload::Payload, AppError};
use crate::state::AppState;

/// The caller's membership row, if they have not deleted the conversation.
pub(crate) async fn active_participant(
    state: &AppState,
    conversation_id: i64,
    employee_id: i64,
) -> Result<Option<ConversationParticipant>, AppError> {
    Ok(state
        .participants
        .find_participant(conversation_id, employee_id)
        .await?
        .filter(|p| p.deleted_at.is_none()))
}

async fn summarize(
    state: &AppState,
    conversation: Conversation,
    me: &ConversationParticipant,
) -> Result<ConversationSummary, AppError> {
    let participants = state.participants.list_participants(Some(conversation.id)).await?;
    let messages = state.messages.list_messages(conversation.id).await?;
    let receipts = state.messages.list_receipts(conversation.id).await?;

    let participant_names = if conversation.kind == ConversationKind::Direct {
        let ids: Vec<i64> = participants.iter().map(|p| p.employee_id).collect();
        let employees = state.employees.get_employees_by_ids(&ids).await?;
        direct_participant_names(me.employee_id, &participants, &employees)
    } else {
        None
    };

    Ok(ConversationSummary {
        unread_count: unread_count(me.employee_id, &messages, me, &receipts),
        participant_names,
        conversation,
    })
}

fn check_kind_allowed(role: Role, kind: ConversationKind) -> Result<(), MessagingError> {
    if role == Role::ImamUser && kind != ConversationKind::Direct {
        return Err(MessagingError::DirectOnly);
    }
    Ok(())
}

/// List the caller's conversations, most recent first (GET /api/conversations).
pub async fn list_conversations(
    access: Access,
    State(state): State<AppState>,
) -> Result<Json<Vec<ConversationSummary>>, AppError> {
    let user_id = access.user.id;
    let conversations = state.conversations.list_conversations_for(user_id).await?;

    let mut summaries = Vec::with_capacity(conversations.len());
    for conversation in conversations {
        let Some(me) = active_participant(&state, conversation.id, user_id).await? else {
            continue;
        };
        summaries.push(summarize(&state, conversation, &me).await?);
    }
    Ok(Json(summaries))
}

/// Get one conversation (GET /api/conversations/{id}).
pub async fn get_conversation(
    access: Access,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ConversationSummary>, AppError> {
    let me = active_participant(&state, id, access.user.id)
        .await?
        .ok_or_else(AppError::not_found)?;
    let conversation = state
        .conversations
        .get_conversation(id)
        .await?
        .ok_or_else(AppError::not_found)?;
    Ok(Json(summarize(&state, conversation, &me).await?))
}

/// Start a conversation with the caller as first participant
/// (POST /api/conversations).
pub async fn create_conversation(
    access: Access,
    State(state): State<AppState>,
    Payload { body, .. }: Payload<ConversationInput>,
) -> Result<impl IntoResponse, AppError> {
    let mut input: ConversationInput = body;
    input.center_id = access.center_for_new(input.center_id);

    let conversation = input.into_conversation(Audit::new(access.actor(), Utc::now()))?;
    check_kind_allowed(access.role(), conversation.kind)?;

    let created = state
        .conversations
        .create_conversation(&conversation, access.user.id)
        .await?;
    tracing::info!(
        conversation_id = created.id,
        kind = created.kind.as_str(),
        creator_id = access.user.id,
        "Created conversation"
    );

    Ok((StatusCode::CREATED, Json(created)))
}

/// Rename or retype a conversation (PUT /api/conversations/{id}).
pub async fn update_conversation(
    access: Access,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Payload { body, .. }: Payload<ConversationInput>,
) -> Result<Json<Conversation>, AppError> {
    active_participant(&state, id, access.user.id)
        .await?
        .ok_or_else(AppError::not_found)?;
    let mut conversation = state
        .conversations
        .get_conversation(id)
        .await?
        .ok_or_else(AppError::not_found)?;

    body.apply_to(&mut conversation)?;
    check_kind_allowed(access.role(), conversation.kind)?;
    conversation.audit.touch(access.actor(), Utc::now());

    state.conversations.update_conversation(&conversation).await?;
    tracing::info!(conversation_id = id, "Updated conversation");

    Ok(Json(conversation))
}

/// Delete a conversation (DELETE /api/conversations/{id}).
///
/// App admins and HQ remove it for everyone. Anyone else only removes it
/// from their own list.
pub async fn delete_conversation(
    access: Access,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    if !access.role().is_privileged() {
        return leave(&state, id, access.user.id).await;
    }

    state.conversations.delete_conversation(id).await?;
    tracing::info!(conversation_id = id, "Deleted conversation");
    Ok(deleted())
}

/// Hide a conversation for the caller (DELETE /api/conversations/{id}/participants/me).
pub async fn leave_conversation(
    access: Access,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    leave(&state, id, access.user.id).await
}

async fn leave(state: &AppState, id: i64, employee_id: i64) -> Result<Json<Value>, AppError> {
    let mut me = active_participant(state, id, employee_id)
        .await?
        .ok_or_else(AppError::not_found)?;

    mark_deleted(&mut me, Utc::now());
    state.participants.update_participant(&me).await?;
    tracing::info!(conversation_id = id, employee_id, "Conversation hidden for participant");

    Ok(deleted())
}

/// Mark every message from others as read (POST /api/conversations/{id}/read).
///
/// `messagesMarked` is the number of messages from others the caller has
/// read in this conversation, including earlier calls.
pub async fn mark_conversation_read(
    access: Access,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let mut me = state
        .participants
        .find_participant(id, access.user.id)
        .await?
        .ok_or_else(AppError::not_found)?;

    let now = Utc::now();
    let marked = state.messages.mark_read(id, access.user.id, now).await?;
    me.last_read_at = Some(now);
    state.participants.update_participant(&me).await?;
    tracing::debug!(
        conversation_id = id,
        employee_id = access.user.id,
        marked,
        "Marked conversation read"
    );

    Ok(Json(json!({
        "message": "Messages marked as read",
        "messagesMarked": marked,
    })))
}
