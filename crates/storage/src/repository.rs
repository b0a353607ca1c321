use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Keys of the client-local state that survives restarts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StorageKey {
    /// Bearer token of the current session.
    Token,
    ActiveTab,
    DarkMode,
}

impl StorageKey {
    pub const ALL: [StorageKey; 3] = [StorageKey::Token, StorageKey::ActiveTab, StorageKey::DarkMode];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            StorageKey::Token => "token",
            StorageKey::ActiveTab => "activeTab",
            StorageKey::DarkMode => "darkMode",
        }
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Small string key/value store for client state.
#[async_trait]
pub trait ClientStateRepository: Send + Sync {
    /// Read a value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read. A missing key is `Ok(None)`.
    async fn get(&self, key: StorageKey) -> Result<Option<String>, StorageError>;

    /// Insert or overwrite a value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be stored.
    async fn set(&self, key: StorageKey, value: &str) -> Result<(), StorageError>;

    /// Delete a value. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    async fn remove(&self, key: StorageKey) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    values: Arc<Mutex<HashMap<StorageKey, String>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            values: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl ClientStateRepository for InMemoryRepository {
    async fn get(&self, key: StorageKey) -> Result<Option<String>, StorageError> {
        let guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(&key).cloned())
    }

    async fn set(&self, key: StorageKey, value: &str) -> Result<(), StorageError> {
        let mut guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key, value.to_string());
        Ok(())
    }

    async fn remove(&self, key: StorageKey) -> Result<(), StorageError> {
        let mut guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(&key);
        Ok(())
    }
}

/// Aggregates client-state repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub client_state: Arc<dyn ClientStateRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let client_state: Arc<dyn ClientStateRepository> = Arc::new(InMemoryRepository::new());
        Self { client_state }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_get_remove_round_trip() {
        let repo = InMemoryRepository::new();
        assert_eq!(repo.get(StorageKey::Token).await.unwrap(), None);

        repo.set(StorageKey::Token, "abc").await.unwrap();
        repo.set(StorageKey::Token, "def").await.unwrap();
        assert_eq!(repo.get(StorageKey::Token).await.unwrap().as_deref(), Some("def"));

        repo.remove(StorageKey::Token).await.unwrap();
        repo.remove(StorageKey::Token).await.unwrap();
        assert_eq!(repo.get(StorageKey::Token).await.unwrap(), None);
    }

    #[tokio::test]
    async fn clones_share_state() {
        let storage = Storage::in_memory();
        let other = storage.clone();
        storage
            .client_state
            .set(StorageKey::DarkMode, "true")
            .await
            .unwrap();
        assert_eq!(
            other.client_state.get(StorageKey::DarkMode).await.unwrap().as_deref(),
            Some("true")
        );
    }

    #[test]
    fn keys_match_persisted_names() {
        let names: Vec<_> = StorageKey::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(names, ["token", "activeTab", "darkMode"]);
    }
}
