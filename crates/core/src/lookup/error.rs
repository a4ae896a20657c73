use thiserror::Error;

use crate::access::Role;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("Invalid lookup table")]
    UnknownTable(String),
    #[error("Forbidden: only App Admin and HQ can modify {table} lookups")]
    Restricted { table: &'static str, role: Option<Role> },
}
