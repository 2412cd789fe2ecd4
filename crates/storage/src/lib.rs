//! Storage abstraction and implementations for Buildwise.
//!
//! This crate provides a trait-based storage interface with a JSON file
//! reference implementation, a volatile in-memory backend and an
//! optional SQLite backend.

#![warn(missing_docs)]

pub mod trait_;
pub mod memory_storage;
#[cfg(feature = "json")]
pub mod json_storage;
#[cfg(feature = "sqlite")]
pub mod sqlite_storage;

pub use trait_::{RecordKind, Result, Storage, StorageError};
pub use memory_storage::MemoryStorage;
#[cfg(feature = "json")]
pub use json_storage::JsonStorage;
#[cfg(feature = "sqlite")]
pub use sqlite_storage::SqliteStorage;
