use serde::Serialize;
use serde_json::{Map, Value};

use crate::audit::Audit;

/// A row of a lookup table.
///
/// Lookups share `id` and `name`; any other column is kept in `extra` and
/// serialized inline next to them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LookupRow {
    pub id: i64,
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    #[serde(flatten)]
    pub audit: Audit,
}

/// Keys handled by the row itself rather than stored in `extra`.
const RESERVED_KEYS: &[&str] = &[
    "id",
    "created_by",
    "updated_by",
    "created_at",
    "updated_at",
];

fn take_name(fields: &mut Map<String, Value>) -> Option<Option<String>> {
    let value = fields.remove("name").or_else(|| fields.remove("Name"))?;
    Some(match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

fn strip_reserved(fields: &mut Map<String, Value>) {
    fields.retain(|key, _| !RESERVED_KEYS.contains(&key.to_lowercase().as_str()));
}

impl LookupRow {
    /// Builds a row from a request body. The store assigns the id.
    pub fn from_fields(mut fields: Map<String, Value>, audit: Audit) -> Self {
        let name = take_name(&mut fields).flatten();
        strip_reserved(&mut fields);
        Self {
            id: 0,
            name,
            extra: fields,
            audit,
        }
    }

    /// Merges a request body into the row. Present keys overwrite.
    pub fn apply_fields(&mut self, mut fields: Map<String, Value>) {
        if let Some(name) = take_name(&mut fields) {
            self.name = name;
        }
        strip_reserved(&mut fields);
        self.extra.extend(fields);
    }

    /// Sort key for name-ordered listings. Rows without a name sort last.
    pub fn sort_key(&self) -> (bool, String, i64) {
        (
            self.name.is_none(),
            self.name.clone().unwrap_or_default(),
            self.id,
        )
    }
}
