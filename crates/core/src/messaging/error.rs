use thiserror::Error;

/// Business-rule violations in conversations and messages.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MessagingError {
    #[error("Unknown conversation type: {0}")]
    UnknownKind(String),
    #[error("Imam users can only start direct conversations")]
    DirectOnly,
    #[error("You are not a participant in this conversation")]
    NotParticipant,
    #[error("{0} is required")]
    MissingField(&'static str),
}
