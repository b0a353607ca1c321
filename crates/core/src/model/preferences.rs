use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PreferencesError {
    #[error("unknown dashboard tab: {0}")]
    UnknownTab(String),
}

/// Top-level sections of the dashboard.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DashboardTab {
    #[default]
    Upload,
    Review,
    Progress,
    Usage,
    Users,
    Settings,
}

impl DashboardTab {
    pub const ALL: [DashboardTab; 6] = [
        DashboardTab::Upload,
        DashboardTab::Review,
        DashboardTab::Progress,
        DashboardTab::Usage,
        DashboardTab::Users,
        DashboardTab::Settings,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DashboardTab::Upload => "upload",
            DashboardTab::Review => "review",
            DashboardTab::Progress => "progress",
            DashboardTab::Usage => "usage",
            DashboardTab::Users => "users",
            DashboardTab::Settings => "settings",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            DashboardTab::Upload => "Upload",
            DashboardTab::Review => "Review",
            DashboardTab::Progress => "Progress",
            DashboardTab::Usage => "Usage",
            DashboardTab::Users => "Users",
            DashboardTab::Settings => "Settings",
        }
    }

    #[must_use]
    pub fn admin_only(self) -> bool {
        matches!(self, DashboardTab::Usage | DashboardTab::Users)
    }

    /// Tabs shown in the sidebar for a user with the given capability.
    pub fn visible_to(is_admin: bool) -> impl Iterator<Item = DashboardTab> {
        Self::ALL
            .into_iter()
            .filter(move |tab| is_admin || !tab.admin_only())
    }

    /// The tab actually opened: admin-only tabs fall back to Upload for others.
    #[must_use]
    pub fn resolve(self, is_admin: bool) -> DashboardTab {
        if self.admin_only() && !is_admin {
            DashboardTab::Upload
        } else {
            self
        }
    }
}

impl fmt::Display for DashboardTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DashboardTab {
    type Err = PreferencesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|tab| tab.as_str() == key)
            .ok_or_else(|| PreferencesError::UnknownTab(s.to_string()))
    }
}

/// Per-device dashboard preferences.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClientPreferences {
    pub active_tab: DashboardTab,
    pub dark_mode: bool,
}

impl ClientPreferences {
    /// Build from stored strings. Unreadable values fall back to defaults.
    #[must_use]
    pub fn from_persisted(active_tab: Option<&str>, dark_mode: Option<&str>) -> Self {
        Self {
            active_tab: active_tab
                .and_then(|raw| raw.parse().ok())
                .unwrap_or_default(),
            dark_mode: dark_mode.is_some_and(|raw| raw.trim() == "true"),
        }
    }

    #[must_use]
    pub fn dark_mode_value(&self) -> &'static str {
        if self.dark_mode { "true" } else { "false" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_upload_light() {
        let prefs = ClientPreferences::from_persisted(None, None);
        assert_eq!(prefs.active_tab, DashboardTab::Upload);
        assert!(!prefs.dark_mode);
        assert_eq!(prefs.dark_mode_value(), "false");
    }

    #[test]
    fn garbage_falls_back() {
        let prefs = ClientPreferences::from_persisted(Some("cards"), Some("yes"));
        assert_eq!(prefs, ClientPreferences::default());
        assert!("cards".parse::<DashboardTab>().is_err());
    }

    #[test]
    fn admin_tabs_resolve_for_non_admins() {
        assert_eq!(DashboardTab::Users.resolve(false), DashboardTab::Upload);
        assert_eq!(DashboardTab::Users.resolve(true), DashboardTab::Users);
        assert_eq!(DashboardTab::Review.resolve(false), DashboardTab::Review);
        assert_eq!(DashboardTab::visible_to(false).count(), 4);
        assert_eq!(DashboardTab::visible_to(true).count(), 6);
    }

    #[test]
    fn restores_persisted_values() {
        let prefs = ClientPreferences::from_persisted(Some("progress"), Some("true"));
        assert_eq!(prefs.active_tab, DashboardTab::Progress);
        assert!(prefs.dark_mode);
    }
}
