use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FilesError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("Folder {0} does not exist")]
    UnknownFolder(i64),
    #[error("A folder cannot be moved inside itself")]
    FolderCycle,
}
