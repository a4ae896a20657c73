use serde::{Deserialize, Serialize};

use crate::attachment::Attachment;
use crate::audit::Audit;
use crate::serde::{deserialize_lenient_i64, deserialize_optional_string};

use super::FilesError;

/// Filename served for stored files uploaded without one.
pub const DEFAULT_FILE_NAME: &str = "file";

/// A folder in a user's file manager. Folders nest through `parent_id`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Folder {
    pub id: i64,
    pub name: String,
    pub parent_id: Option<i64>,
    pub employee_id: Option<i64>,
    pub center_id: Option<i64>,
    #[serde(flatten)]
    pub audit: Audit,
}

impl Folder {
    pub fn is_owned_by(&self, owner: &str) -> bool {
        self.audit.created_by == owner
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FolderInput {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_i64")]
    pub parent_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_lenient_i64")]
    pub employee_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_lenient_i64")]
    pub center_id: Option<i64>,
}

impl FolderInput {
    pub fn into_folder(self, audit: Audit) -> Result<Folder, FilesError> {
        Ok(Folder {
            id: 0,
            name: self.name.ok_or(FilesError::MissingField("name"))?,
            parent_id: self.parent_id,
            employee_id: self.employee_id,
            center_id: self.center_id,
            audit,
        })
    }

    pub fn apply_to(self, folder: &mut Folder) {
        if let Some(name) = self.name {
            folder.name = name;
        }
        if self.parent_id.is_some() {
            folder.parent_id = self.parent_id;
        }
        if self.employee_id.is_some() {
            folder.employee_id = self.employee_id;
        }
        if self.center_id.is_some() {
            folder.center_id = self.center_id;
        }
    }
}

/// Checks that `folder_id` may become the parent of `parent_id`.
///
/// `folders` are the owner's folders. The parent must be one of them and
/// must not be `folder_id` or one of its descendants. Pass `None` as
/// `folder_id` for a folder that does not exist yet.
pub fn check_parent(
    folders: &[Folder],
    folder_id: Option<i64>,
    parent_id: i64,
) -> Result<(), FilesError> {
    let parent_of = |id: i64| folders.iter().find(|f| f.id == id).map(|f| f.parent_id);

    if parent_of(parent_id).is_none() {
        return Err(FilesError::UnknownFolder(parent_id));
    }
    let Some(folder_id) = folder_id else {
        return Ok(());
    };

    // Bounded by the folder count so a corrupt chain cannot loop forever.
    let mut current = Some(parent_id);
    for _ in 0..=folders.len() {
        match current {
            Some(id) if id == folder_id => return Err(FilesError::FolderCycle),
            Some(id) => current = parent_of(id).flatten(),
            None => return Ok(()),
        }
    }
    Err(FilesError::FolderCycle)
}

/// A file stored in a user's file manager.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonalFile {
    pub id: i64,
    pub name: String,
    pub folder_id: Option<i64>,
    pub employee_id: Option<i64>,
    pub file: Option<Attachment>,
    pub center_id: Option<i64>,
    #[serde(flatten)]
    pub audit: Audit,
}

impl PersonalFile {
    pub fn is_owned_by(&self, owner: &str) -> bool {
        self.audit.created_by == owner
    }
}

/// Filename to serve a stored file under.
pub fn file_download_name(file: &Attachment) -> &str {
    file.filename
        .as_deref()
        .filter(|f| !f.is_empty())
        .unwrap_or(DEFAULT_FILE_NAME)
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PersonalFileInput {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_i64")]
    pub folder_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_lenient_i64")]
    pub employee_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_lenient_i64")]
    pub center_id: Option<i64>,
}

impl PersonalFileInput {
    /// Builds a new file record. Without a `name` the upload's filename is
    /// used.
    pub fn into_personal_file(
        self,
        file: Option<Attachment>,
        audit: Audit,
    ) -> Result<PersonalFile, FilesError> {
        let name = self
            .name
            .or_else(|| file.as_ref().and_then(|f| f.filename.clone()))
            .filter(|n| !n.is_empty())
            .ok_or(FilesError::MissingField("name"))?;
        Ok(PersonalFile {
            id: 0,
            name,
            folder_id: self.folder_id,
            employee_id: self.employee_id,
            file,
            center_id: self.center_id,
            audit,
        })
    }

    pub fn apply_to(self, record: &mut PersonalFile) {
        if let Some(name) = self.name {
            record.name = name;
        }
        if self.folder_id.is_some() {
            record.folder_id = self.folder_id;
        }
        if self.employee_id.is_some() {
            record.employee_id = self.employee_id;
        }
        if self.center_id.is_some() {
            record.center_id = self.center_id;
        }
    }
}
