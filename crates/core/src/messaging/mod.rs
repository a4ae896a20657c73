mod error;
mod rules;
mod types;

pub use error::MessagingError;
pub use rules::{
    all_read_by_participants, direct_participant_names, is_eligible_reader, is_message_visible,
    mark_deleted, restore_for_new_message, unread_count, RESTORE_LEAD_SECONDS,
};
pub use types::{
    Conversation, ConversationInput, ConversationKind, ConversationParticipant,
    ConversationSummary, Message, MessageInput, MessageView, ParticipantInput, ReadReceipt,
    ReadStatus,
};
