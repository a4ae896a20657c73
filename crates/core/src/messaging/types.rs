use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::attachment::Attachment;
use crate::audit::Audit;
use crate::serde::{deserialize_lenient_i64, deserialize_optional_date, deserialize_optional_string};

use super::MessagingError;

/// Conversation type. Determines how "read by everyone" is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConversationKind {
    Direct,
    Group,
    Announcement,
}

impl ConversationKind {
    pub fn parse(value: &str) -> Result<Self, MessagingError> {
        match value.trim().to_lowercase().as_str() {
            "direct" => Ok(Self::Direct),
            "group" => Ok(Self::Group),
            "announcement" => Ok(Self::Announcement),
            _ => Err(MessagingError::UnknownKind(value.to_string())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Direct => "Direct",
            Self::Group => "Group",
            Self::Announcement => "Announcement",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conversation {
    pub id: i64,
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub kind: ConversationKind,
    pub center_id: Option<i64>,
    #[serde(flatten)]
    pub audit: Audit,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConversationInput {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub title: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "deserialize_optional_string")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_i64")]
    pub center_id: Option<i64>,
}

impl ConversationInput {
    /// Parsed conversation type. Absent means `Direct`.
    pub fn parsed_kind(&self) -> Result<Option<ConversationKind>, MessagingError> {
        self.kind.as_deref().map(ConversationKind::parse).transpose()
    }

    /// Builds a new conversation. The store assigns the id.
    pub fn into_conversation(self, audit: Audit) -> Result<Conversation, MessagingError> {
        let kind = self.parsed_kind()?.unwrap_or(ConversationKind::Direct);
        Ok(Conversation {
            id: 0,
            title: self.title,
            kind,
            center_id: self.center_id,
            audit,
        })
    }

    pub fn apply_to(self, conversation: &mut Conversation) -> Result<(), MessagingError> {
        if let Some(kind) = self.parsed_kind()? {
            conversation.kind = kind;
        }
        if self.title.is_some() {
            conversation.title = self.title;
        }
        if self.center_id.is_some() {
            conversation.center_id = self.center_id;
        }
        Ok(())
    }
}

/// Membership of an employee in a conversation, with per-user visibility state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversationParticipant {
    pub id: i64,
    pub conversation_id: i64,
    pub employee_id: i64,
    pub joined_date: NaiveDate,
    pub last_read_at: Option<DateTime<Utc>>,
    /// Set when the participant deleted the conversation on their side.
    pub deleted_at: Option<DateTime<Utc>>,
    /// Messages created before this instant stay hidden after a restore.
    pub last_restored_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub audit: Audit,
}

impl ConversationParticipant {
    /// A participant joining `conversation_id` today.
    pub fn joining(conversation_id: i64, employee_id: i64, audit: Audit) -> Self {
        Self {
            id: 0,
            conversation_id,
            employee_id,
            joined_date: audit.created_at.date_naive(),
            last_read_at: None,
            deleted_at: None,
            last_restored_at: None,
            audit,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParticipantInput {
    #[serde(default, deserialize_with = "deserialize_lenient_i64")]
    pub conversation_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_lenient_i64")]
    pub employee_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub joined_date: Option<NaiveDate>,
}

impl ParticipantInput {
    pub fn into_participant(self, audit: Audit) -> Result<ConversationParticipant, MessagingError> {
        let conversation_id = self
            .conversation_id
            .ok_or(MessagingError::MissingField("conversation_id"))?;
        let employee_id = self
            .employee_id
            .ok_or(MessagingError::MissingField("employee_id"))?;
        let mut participant = ConversationParticipant::joining(conversation_id, employee_id, audit);
        if let Some(joined) = self.joined_date {
            participant.joined_date = joined;
        }
        Ok(participant)
    }

    pub fn apply_to(self, participant: &mut ConversationParticipant) {
        if let Some(conversation_id) = self.conversation_id {
            participant.conversation_id = conversation_id;
        }
        if let Some(employee_id) = self.employee_id {
            participant.employee_id = employee_id;
        }
        if let Some(joined) = self.joined_date {
            participant.joined_date = joined;
        }
    }
}

/// Legacy conversation-wide read flag, kept in sync with receipts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReadStatus {
    #[default]
    Unread,
    Read,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub id: i64,
    pub conversation_id: i64,
    pub sender_id: i64,
    pub message_text: Option<String>,
    pub attachment: Option<Attachment>,
    pub read_status: ReadStatus,
    #[serde(flatten)]
    pub audit: Audit,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageInput {
    #[serde(default, deserialize_with = "deserialize_lenient_i64")]
    pub conversation_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub message_text: Option<String>,
}

impl MessageInput {
    /// Builds a message sent by `sender_id`. The store assigns the id.
    pub fn into_message(
        self,
        sender_id: i64,
        attachment: Option<Attachment>,
        audit: Audit,
    ) -> Result<Message, MessagingError> {
        Ok(Message {
            id: 0,
            conversation_id: self
                .conversation_id
                .ok_or(MessagingError::MissingField("conversation_id"))?,
            sender_id,
            message_text: self.message_text,
            attachment,
            read_status: ReadStatus::Unread,
            audit,
        })
    }

    /// Applies an edit. Messages never move between conversations.
    pub fn apply_to(self, message: &mut Message) {
        if self.message_text.is_some() {
            message.message_text = self.message_text;
        }
    }
}

/// A per-participant read receipt. At most one per (message, employee).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadReceipt {
    pub message_id: i64,
    pub employee_id: i64,
    pub read_at: DateTime<Utc>,
}

/// A conversation as listed for one user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversationSummary {
    #[serde(flatten)]
    pub conversation: Conversation,
    pub unread_count: usize,
    /// Other participants' names, for direct conversations only.
    pub participant_names: Option<String>,
}

/// A message as listed for one user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageView {
    #[serde(flatten)]
    pub message: Message,
    pub all_read_by_participants: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!(ConversationKind::parse("group"), Ok(ConversationKind::Group));
        assert_eq!(
            ConversationKind::parse("ANNOUNCEMENT"),
            Ok(ConversationKind::Announcement)
        );
        assert!(ConversationKind::parse("broadcast").is_err());
    }

    #[test]
    fn conversation_defaults_to_direct() {
        let input: ConversationInput = serde_json::from_str(r#"{"title":"Hi"}"#).unwrap();
        let conversation = input
            .into_conversation(Audit::new("amina", Utc::now()))
            .unwrap();
        assert_eq!(conversation.kind, ConversationKind::Direct);

        let json = serde_json::to_value(&conversation).unwrap();
        assert_eq!(json["type"], "Direct");
    }

    #[test]
    fn message_requires_conversation() {
        let input = MessageInput {
            message_text: Some("hello".to_string()),
            ..Default::default()
        };
        let result = input.into_message(1, None, Audit::new("amina", Utc::now()));
        assert_eq!(result, Err(MessagingError::MissingField("conversation_id")));
    }

    #[test]
    fn new_participant_joins_on_creation_date() {
        let audit = Audit::new("amina", Utc::now());
        let today = audit.created_at.date_naive();
        let participant = ConversationParticipant::joining(3, 9, audit);
        assert_eq!(participant.joined_date, today);
        assert!(participant.deleted_at.is_none());
    }
}
