use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OutreachError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("No fields to update")]
    EmptyUpdate,
}
