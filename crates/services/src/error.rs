//! Shared error types for the services crate.

use reqwest::StatusCode;
use thiserror::Error;

use review_core::model::{GradeParseError, NewUserError, UploadError};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Failure of a single backend request.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("not authenticated")]
    Unauthorized { detail: Option<String> },
    #[error("forbidden")]
    Forbidden { detail: Option<String> },
    #[error("bad request: {}", detail.as_deref().unwrap_or("no detail"))]
    BadRequest { detail: Option<String> },
    #[error("not found")]
    NotFound { detail: Option<String> },
    #[error("request failed with status {status}")]
    HttpStatus {
        status: StatusCode,
        detail: Option<String>,
    },
    #[error("invalid request url: {0}")]
    Url(#[from] url::ParseError),
    #[error("unexpected response body: {0}")]
    Decode(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl ApiError {
    /// Map a non-success status and the backend's `detail` field to an error.
    #[must_use]
    pub fn from_status(status: StatusCode, detail: Option<String>) -> Self {
        match status {
            StatusCode::BAD_REQUEST => Self::BadRequest { detail },
            StatusCode::UNAUTHORIZED => Self::Unauthorized { detail },
            StatusCode::FORBIDDEN => Self::Forbidden { detail },
            StatusCode::NOT_FOUND => Self::NotFound { detail },
            _ => Self::HttpStatus { status, detail },
        }
    }

    /// HTTP status carried by the error, if the server answered at all.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::BadRequest { .. } => Some(StatusCode::BAD_REQUEST),
            Self::Unauthorized { .. } => Some(StatusCode::UNAUTHORIZED),
            Self::Forbidden { .. } => Some(StatusCode::FORBIDDEN),
            Self::NotFound { .. } => Some(StatusCode::NOT_FOUND),
            Self::HttpStatus { status, .. } => Some(*status),
            Self::Http(err) => err.status(),
            Self::Url(_) | Self::Decode(_) => None,
        }
    }

    /// Server-supplied `detail` message.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::BadRequest { detail }
            | Self::Unauthorized { detail }
            | Self::Forbidden { detail }
            | Self::NotFound { detail }
            | Self::HttpStatus { detail, .. } => detail.as_deref(),
            Self::Url(_) | Self::Decode(_) | Self::Http(_) => None,
        }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    /// Server detail if present, otherwise `fallback`.
    #[must_use]
    pub fn detail_or(&self, fallback: &str) -> String {
        self.detail()
            .filter(|detail| !detail.trim().is_empty())
            .unwrap_or(fallback)
            .to_string()
    }

    /// Message shown to the user: 403 means admin required, 400 shows the
    /// server detail, everything else gets `fallback`.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Forbidden { .. } => "Access denied. Admin privileges required.".to_string(),
            Self::BadRequest { .. } => self.detail_or(fallback),
            _ => fallback.to_string(),
        }
    }
}

/// Errors emitted by `AuthService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    #[error("no credential was provided")]
    MissingCredential,
    #[error("backend did not return an access token")]
    MissingToken,
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl AuthError {
    #[must_use]
    pub fn user_message(&self) -> String {
        const FALLBACK: &str = "Login failed. Please try again.";
        match self {
            Self::Api(err) => err.detail_or(FALLBACK),
            _ => FALLBACK.to_string(),
        }
    }
}

/// Errors emitted by `GradeService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GradeError {
    #[error("Please select your grade level")]
    NoSelection,
    #[error(transparent)]
    InvalidGrade(#[from] GradeParseError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl GradeError {
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::NoSelection | Self::InvalidGrade(_) => {
                "Please select your grade level".to_string()
            }
            Self::Api(_) => "Failed to update grade. Please try again.".to_string(),
        }
    }
}

/// Errors emitted by `QuestionService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuestionServiceError {
    /// A newer request superseded this one; the response was dropped.
    #[error("response superseded by a newer request")]
    Stale,
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors emitted by `UploadService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum UploadServiceError {
    #[error(transparent)]
    Invalid(#[from] UploadError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl UploadServiceError {
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Invalid(err) => err.to_string(),
            Self::Api(err) => err.detail_or("Failed to upload image. Please try again."),
        }
    }
}

/// Errors emitted by `AdminUsersService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AdminError {
    #[error(transparent)]
    Invalid(#[from] NewUserError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors emitted by `PreferencesService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PreferencesServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors raised while reading configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid API url {value:?}: {source}")]
    InvalidApiUrl {
        value: String,
        source: url::ParseError,
    },
    #[error("API url must use http or https: {0}")]
    UnsupportedScheme(String),
    #[error("invalid timeout {0:?}; expected whole seconds")]
    InvalidTimeout(String),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_and_messages() {
        let forbidden = ApiError::from_status(StatusCode::FORBIDDEN, None);
        assert_eq!(
            forbidden.user_message("Failed to load users. Please try again."),
            "Access denied. Admin privileges required."
        );

        let bad = ApiError::from_status(StatusCode::BAD_REQUEST, Some("User exists".into()));
        assert_eq!(bad.user_message("User already exists."), "User exists");

        let bad_no_detail = ApiError::from_status(StatusCode::BAD_REQUEST, None);
        assert_eq!(
            bad_no_detail.user_message("User already exists."),
            "User already exists."
        );

        let server = ApiError::from_status(
            StatusCode::INTERNAL_SERVER_ERROR,
            Some("boom".into()),
        );
        assert_eq!(server.user_message("Generic."), "Generic.");
        assert_eq!(server.detail_or("Generic."), "boom");
    }

    #[test]
    fn unauthorized_is_detected() {
        let err = ApiError::from_status(StatusCode::UNAUTHORIZED, None);
        assert!(err.is_unauthorized());
        assert!(!ApiError::Decode("x".into()).is_unauthorized());
    }

    #[test]
    fn login_message_prefers_detail() {
        let err = AuthError::Api(ApiError::from_status(
            StatusCode::UNAUTHORIZED,
            Some("Invalid Google token".into()),
        ));
        assert_eq!(err.user_message(), "Invalid Google token");
        assert_eq!(
            AuthError::MissingToken.user_message(),
            "Login failed. Please try again."
        );
    }
}
