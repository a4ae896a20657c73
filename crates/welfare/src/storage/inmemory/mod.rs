//! In-memory storage backend for testing.
//!
//! Every table lives in a `BTreeMap` behind a tokio `RwLock`, with its own
//! id counter. Data is not persisted and is lost when the repository is
//! dropped.
//!
//! # Example
//!
//! ```rust,ignore
//! use welfare::storage::inmemory::InMemoryRepository;
//!
//! let repo = InMemoryRepository::new();
//! // Use repo for testing...
//! ```

mod repository;
mod table;

pub use repository::InMemoryRepository;
