#![forbid(unsafe_code)]

pub mod repository;
pub mod sqlite;

pub use repository::{ClientStateRepository, InMemoryRepository, Storage, StorageError, StorageKey};
