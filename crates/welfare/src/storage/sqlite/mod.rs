//! SQLite storage backend.
//!
//! `rusqlite` does the work synchronously; `tokio-rusqlite` runs it on a
//! dedicated thread so handlers stay async.

mod conversions;
mod error;
mod repository;
mod schema;

pub use repository::SqliteRepository;
