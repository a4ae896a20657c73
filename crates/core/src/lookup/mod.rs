mod error;
mod tables;
mod types;

pub use error::LookupError;
pub use tables::{can_mutate_lookup, find_table, LookupTable, LOOKUP_TABLES};
pub use types::LookupRow;
