use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::model::grade::deserialize_optional_grade;
use crate::model::{Grade, QuestionId};
use crate::time::{deserialize_optional_wire_datetime, deserialize_wire_datetime};

/// Review status of a wrong question.
///
/// Any status can move to any other; the client never enforces an order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionStatus {
    Pending,
    Reviewing,
    Understood,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown question status: {raw}")]
pub struct StatusParseError {
    raw: String,
}

impl QuestionStatus {
    pub const ALL: [QuestionStatus; 3] = [
        QuestionStatus::Pending,
        QuestionStatus::Reviewing,
        QuestionStatus::Understood,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            QuestionStatus::Pending => "pending",
            QuestionStatus::Reviewing => "reviewing",
            QuestionStatus::Understood => "understood",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            QuestionStatus::Pending => "Pending",
            QuestionStatus::Reviewing => "Reviewing",
            QuestionStatus::Understood => "Understood",
        }
    }
}

impl fmt::Display for QuestionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(QuestionStatus::Pending),
            "reviewing" => Ok(QuestionStatus::Reviewing),
            "understood" => Ok(QuestionStatus::Understood),
            _ => Err(StatusParseError { raw: s.to_string() }),
        }
    }
}

/// A question the student answered wrongly, extracted from an uploaded paper.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WrongQuestion {
    pub id: QuestionId,
    pub subject: String,
    pub question_text: String,
    #[serde(default, deserialize_with = "deserialize_optional_grade")]
    pub grade: Option<Grade>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub image_snippet_url: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
    pub status: QuestionStatus,
    #[serde(deserialize_with = "deserialize_wire_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "deserialize_optional_wire_datetime")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl WrongQuestion {
    /// Image to display for this question, resolved against the API base.
    ///
    /// Absolute `http(s)` URLs are returned unchanged; relative paths such as
    /// `/uploads/abc.jpg` are appended to `api_base`, keeping any path prefix.
    #[must_use]
    pub fn resolved_image_url(&self, api_base: &Url) -> Option<String> {
        let raw = self
            .image_snippet_url
            .as_deref()
            .or(self.image_url.as_deref())?;
        resolve_media_url(api_base, raw)
    }

    #[must_use]
    pub fn has_explanation(&self) -> bool {
        self.explanation
            .as_deref()
            .is_some_and(|text| !text.trim().is_empty())
    }
}

/// Resolve a media reference returned by the backend.
#[must_use]
pub fn resolve_media_url(api_base: &Url, raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if raw.starts_with("http://") || raw.starts_with("https://") {
        return Some(raw.to_string());
    }
    let base = api_base.as_str().trim_end_matches('/');
    let path = raw.trim_start_matches('/');
    Some(format!("{base}/{path}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question_json(image_url: &str) -> String {
        format!(
            r#"{{
                "id": 9,
                "user_id": 1,
                "subject": "Physics",
                "question_text": "Why is the sky blue?",
                "grade": "sec2",
                "image_url": "{image_url}",
                "explanation": "Rayleigh scattering.",
                "status": "reviewing",
                "created_at": "2024-03-02T08:30:00",
                "updated_at": "2024-03-02T08:31:00+00:00"
            }}"#
        )
    }

    #[test]
    fn deserializes_backend_question() {
        let question: WrongQuestion = serde_json::from_str(&question_json("/uploads/a.jpg")).unwrap();
        assert_eq!(question.id, QuestionId::new(9));
        assert_eq!(question.status, QuestionStatus::Reviewing);
        assert!(question.has_explanation());
        assert!(question.updated_at.is_some());
    }

    #[test]
    fn resolves_relative_and_absolute_images() {
        let base = Url::parse("http://localhost:8000").unwrap();
        let relative: WrongQuestion = serde_json::from_str(&question_json("/uploads/a.jpg")).unwrap();
        assert_eq!(
            relative.resolved_image_url(&base).as_deref(),
            Some("http://localhost:8000/uploads/a.jpg")
        );

        let absolute: WrongQuestion =
            serde_json::from_str(&question_json("https://cdn.example.com/q/1.png")).unwrap();
        assert_eq!(
            absolute.resolved_image_url(&base).as_deref(),
            Some("https://cdn.example.com/q/1.png")
        );

        let prefixed = Url::parse("https://exams.example.com/api/").unwrap();
        assert_eq!(
            resolve_media_url(&prefixed, "/uploads/b.png").as_deref(),
            Some("https://exams.example.com/api/uploads/b.png")
        );
        assert_eq!(resolve_media_url(&prefixed, "  "), None);
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("Understood".parse(), Ok(QuestionStatus::Understood));
        assert!("done".parse::<QuestionStatus>().is_err());
        assert_eq!(
            serde_json::to_string(&QuestionStatus::Pending).unwrap(),
            "\"pending\""
        );
    }
}
