//! Per-user file manager: folders and the files filed in them.
//!
//! Rows belong to the user who created them. Every read and write is
//! filtered on `created_by`, whatever the caller's role.

mod error;
mod types;

pub use error::FilesError;
pub use types::{
    check_parent, file_download_name, Folder, FolderInput, PersonalFile, PersonalFileInput,
    DEFAULT_FILE_NAME,
};
