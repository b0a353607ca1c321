use std::sync::Arc;

use review_core::model::{ClientPreferences, DashboardTab};
use storage::repository::{ClientStateRepository, StorageKey};

use crate::error::PreferencesServiceError;

/// Reads and writes the per-device dashboard preferences.
#[derive(Clone)]
pub struct PreferencesService {
    state: Arc<dyn ClientStateRepository>,
}

impl PreferencesService {
    #[must_use]
    pub fn new(state: Arc<dyn ClientStateRepository>) -> Self {
        Self { state }
    }

    /// # Errors
    ///
    /// Returns `PreferencesServiceError::Storage` if the store cannot be read.
    pub async fn load(&self) -> Result<ClientPreferences, PreferencesServiceError> {
        let active_tab = self.state.get(StorageKey::ActiveTab).await?;
        let dark_mode = self.state.get(StorageKey::DarkMode).await?;
        Ok(ClientPreferences::from_persisted(
            active_tab.as_deref(),
            dark_mode.as_deref(),
        ))
    }

    /// Load and clamp the active tab to what `is_admin` may see.
    ///
    /// # Errors
    ///
    /// As `load`.
    pub async fn load_for(
        &self,
        is_admin: bool,
    ) -> Result<ClientPreferences, PreferencesServiceError> {
        let mut prefs = self.load().await?;
        prefs.active_tab = prefs.active_tab.resolve(is_admin);
        Ok(prefs)
    }

    /// # Errors
    ///
    /// Returns `PreferencesServiceError::Storage` if the write fails.
    pub async fn save_tab(&self, tab: DashboardTab) -> Result<(), PreferencesServiceError> {
        self.state.set(StorageKey::ActiveTab, tab.as_str()).await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `PreferencesServiceError::Storage` if the write fails.
    pub async fn save_dark_mode(&self, dark_mode: bool) -> Result<(), PreferencesServiceError> {
        let prefs = ClientPreferences {
            dark_mode,
            ..ClientPreferences::default()
        };
        self.state
            .set(StorageKey::DarkMode, prefs.dark_mode_value())
            .await?;
        Ok(())
    }
}
