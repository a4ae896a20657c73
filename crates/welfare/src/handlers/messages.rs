//! Message handlers and attachment downloads.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use welfare_auth::OptionalUser;
use welfare_core::attachment::content_disposition;
use welfare_core::audit::Audit;
use welfare_core::messaging::{
    all_read_by_participants, is_message_visible, restore_for_new_message, Conversation,
    ConversationParticipant, Message, MessageInput, MessageView, MessagingError,
};

use super::{authz::Access, conversations::active_participant, deleted, payload::Payload, AppError};
use crate::state::AppState;

const ATTACHMENT_FIELD: &str = "attachment";

/// Visible messages of one conversation for `me`, oldest first.
async fn conversation_messages(
    state: &AppState,
    conversation: &Conversation,
    me: &ConversationParticipant,
) -> Result<Vec<MessageView>, AppError> {
    let participants = state.participants.list_participants(Some(conversation.id)).await?;
    let receipts = state.messages.list_receipts(conversation.id).await?;
    let messages = state.messages.list_messages(conversation.id).await?;

    Ok(messages
        .into_iter()
        .filter(|m| is_message_visible(m, Some(me)))
        .map(|message| MessageView {
            all_read_by_participants: all_read_by_participants(
                &message,
                conversation.kind,
                &participants,
                &receipts,
            ),
            message,
        })
        .collect())
}

/// Loads a message the caller can see, or fails with 404.
async fn visible_message(state: &AppState, id: i64, employee_id: i64) -> Result<Message, AppError> {
    let message = state
        .messages
        .get_message(id)
        .await?
        .ok_or_else(AppError::not_found)?;
    let me = active_participant(state, message.conversation_id, employee_id).await?;
    if !is_message_visible(&message, me.as_ref()) {
        return Err(AppError::not_found());
    }
    Ok(message)
}

async fn view_of(state: &AppState, message: Message) -> Result<MessageView, AppError> {
    let conversation = state
        .conversations
        .get_conversation(message.conversation_id)
        .await?
        .ok_or_else(AppError::not_found)?;
    let participants = state.participants.list_participants(Some(conversation.id)).await?;
    let receipts = state.messages.list_receipts(conversation.id).await?;
    Ok(MessageView {
        all_read_by_participants: all_read_by_participants(
            &message,
            conversation.kind,
            &participants,
            &receipts,
        ),
        message,
    })
}

#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub conversation_id: Option<i64>,
}

/// List messages (GET /api/messages).
///
/// With `conversation_id`, lists that conversation. Without it, lists every
/// conversation the caller is active in.
pub async fn list_messages(
    access: Access,
    State(state): State<AppState>,
    Query(query): Query<MessageQuery>,
) -> Result<Json<Vec<MessageView>>, AppError> {
    let user_id = access.user.id;
    let conversations = match query.conversation_id {
        Some(id) => {
            active_participant(&state, id, user_id)
                .await?
                .ok_or_else(AppError::not_found)?;
            let conversation = state
                .conversations
                .get_conversation(id)
                .await?
                .ok_or_else(AppError::not_found)?;
            vec![conversation]
        }
        None => state.conversations.list_conversations_for(user_id).await?,
    };

    let mut views = Vec::new();
    for conversation in &conversations {
        let Some(me) = active_participant(&state, conversation.id, user_id).await? else {
            continue;
        };
        views.extend(conversation_messages(&state, conversation, &me).await?);
    }
    views.sort_by(|a, b| {
        a.message
            .audit
            .created_at
            .cmp(&b.message.audit.created_at)
            .then(a.message.id.cmp(&b.message.id))
    });
    Ok(Json(views))
}

pub async fn get_message(
    access: Access,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageView>, AppError> {
    let message = visible_message(&state, id, access.user.id).await?;
    Ok(Json(view_of(&state, message).await?))
}

/// Send a message (POST /api/messages).
///
/// Participants who had deleted the conversation get it back, showing only
/// history from this message on.
pub async fn create_message(
    access: Access,
    State(state): State<AppState>,
    mut payload: Payload<MessageInput>,
) -> Result<impl IntoResponse, AppError> {
    let now = Utc::now();
    let attachment = payload.attachment(ATTACHMENT_FIELD, now);
    let message = payload
        .body
        .into_message(access.user.id, attachment, Audit::new(access.actor(), now))?;

    state
        .conversations
        .get_conversation(message.conversation_id)
        .await?
        .ok_or_else(AppError::not_found)?;
    state
        .participants
        .find_participant(message.conversation_id, access.user.id)
        .await?
        .ok_or(MessagingError::NotParticipant)?;

    let created = state.messages.create_message(&message).await?;

    for mut participant in state
        .participants
        .list_participants(Some(created.conversation_id))
        .await?
    {
        if restore_for_new_message(&mut participant, created.audit.created_at) {
            state.participants.update_participant(&participant).await?;
            tracing::debug!(
                conversation_id = created.conversation_id,
                employee_id = participant.employee_id,
                "Restored conversation for participant"
            );
        }
    }
    state
        .conversations
        .touch_conversation(created.conversation_id, created.audit.created_at)
        .await?;

    tracing::info!(
        message_id = created.id,
        conversation_id = created.conversation_id,
        has_attachment = created.attachment.is_some(),
        "Created message"
    );
    Ok((StatusCode::CREATED, Json(view_of(&state, created).await?)))
}

pub async fn update_message(
    access: Access,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    mut payload: Payload<MessageInput>,
) -> Result<Json<MessageView>, AppError> {
    let now = Utc::now();
    let mut message = visible_message(&state, id, access.user.id).await?;

    if let Some(attachment) = payload.attachment(ATTACHMENT_FIELD, now) {
        message.attachment = Some(attachment);
    }
    payload.body.apply_to(&mut message);
    message.audit.touch(access.actor(), now);

    state.messages.update_message(&message).await?;
    tracing::info!(message_id = id, "Updated message");

    Ok(Json(view_of(&state, message).await?))
}

pub async fn delete_message(
    access: Access,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    visible_message(&state, id, access.user.id).await?;
    state.messages.delete_message(id).await?;
    tracing::info!(message_id = id, "Deleted message");
    Ok(deleted())
}

async fn attachment_response(
    state: &AppState,
    user: Option<i64>,
    id: i64,
    inline: bool,
) -> Result<Response, AppError> {
    let message = state
        .messages
        .get_message(id)
        .await?
        .ok_or_else(|| AppError::missing("Record not found"))?;

    if let Some(employee_id) = user {
        let me = active_participant(state, message.conversation_id, employee_id).await?;
        if !is_message_visible(&message, me.as_ref()) {
            return Err(AppError::missing("Record not found"));
        }
    }

    let attachment = message
        .attachment
        .filter(|a| !a.data.is_empty())
        .ok_or_else(|| AppError::missing("No attachment found"))?;

    let headers = [
        (header::CONTENT_TYPE, attachment.content_type().to_string()),
        (
            header::CONTENT_DISPOSITION,
            content_disposition(attachment.download_name(), inline),
        ),
        (header::CONTENT_LENGTH, attachment.data.len().to_string()),
    ];
    Ok((headers, attachment.data).into_response())
}

/// Serve an attachment inline (GET /api/messages/{id}/view-attachment).
pub async fn view_attachment(
    OptionalUser(user): OptionalUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    attachment_response(&state, user.map(|u| u.id), id, true).await
}

/// Serve an attachment as a download (GET /api/messages/{id}/download-attachment).
pub async fn download_attachment(
    access: Access,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    attachment_response(&state, Some(access.user.id), id, false).await
}
