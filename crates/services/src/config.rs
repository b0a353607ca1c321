use std::env;
use std::time::Duration;

use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_DB_URL: &str = "sqlite://review-client.sqlite3";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_GOOGLE_REDIRECT_URI: &str = "http://localhost";

/// Runtime settings for the client, read from `REVIEW_*` environment variables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: Url,
    pub database_url: String,
    pub http_timeout: Duration,
    pub google_client_id: Option<String>,
    pub google_redirect_uri: String,
}

impl ClientConfig {
    /// Read configuration from the process environment, loading `.env` first.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env");
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read configuration through an arbitrary lookup function.
    ///
    /// Blank values are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but malformed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let api_base_url =
            parse_api_url(get("REVIEW_API_URL").as_deref().unwrap_or(DEFAULT_API_URL))?;
        let http_timeout = match get("REVIEW_HTTP_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw
                    .parse()
                    .ok()
                    .filter(|secs| *secs > 0)
                    .ok_or(ConfigError::InvalidTimeout(raw))?;
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        };

        Ok(Self {
            api_base_url,
            database_url: get("REVIEW_DB_URL").unwrap_or_else(|| DEFAULT_DB_URL.to_string()),
            http_timeout,
            google_client_id: get("REVIEW_GOOGLE_CLIENT_ID"),
            google_redirect_uri: get("REVIEW_GOOGLE_REDIRECT_URI")
                .unwrap_or_else(|| DEFAULT_GOOGLE_REDIRECT_URI.to_string()),
        })
    }

    /// Override the API base url, e.g. from a command-line flag.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the url is malformed or not http(s).
    pub fn with_api_url(mut self, raw: &str) -> Result<Self, ConfigError> {
        self.api_base_url = parse_api_url(raw)?;
        Ok(self)
    }

    #[must_use]
    pub fn with_database_url(mut self, database_url: impl Into<String>) -> Self {
        self.database_url = database_url.into();
        self
    }
}

/// Parse a base url; a missing trailing slash is added so relative joins keep the path.
fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    let url = Url::parse(&with_slash).map_err(|source| ConfigError::InvalidApiUrl {
        value: trimmed.to_string(),
        source,
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::UnsupportedScheme(other.to_string())),
    }
}
