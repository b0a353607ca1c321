use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::grade::deserialize_optional_grade;
use crate::model::{Grade, UserId};
use crate::time::deserialize_optional_wire_datetime;

/// Signed-in account as reported by the backend.
///
/// The client only ever holds a cached copy; the backend owns the record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    name: String,
    email: String,
    #[serde(default, deserialize_with = "deserialize_optional_grade")]
    grade: Option<Grade>,
    #[serde(default)]
    is_admin: bool,
    #[serde(default)]
    profile_picture: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_wire_datetime")]
    created_at: Option<DateTime<Utc>>,
}

impl User {
    #[must_use]
    pub fn new(id: UserId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            grade: None,
            is_admin: false,
            profile_picture: None,
            created_at: None,
        }
    }

    #[must_use]
    pub fn with_grade(mut self, grade: Option<Grade>) -> Self {
        self.grade = grade;
        self
    }

    #[must_use]
    pub fn with_admin(mut self, is_admin: bool) -> Self {
        self.is_admin = is_admin;
        self
    }

    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// First word of the display name, used in greetings.
    #[must_use]
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or("")
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn grade(&self) -> Option<&Grade> {
        self.grade.as_ref()
    }

    /// Admin capability; gates the usage and user-management views.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    /// True until the user has picked an education level.
    #[must_use]
    pub fn needs_grade(&self) -> bool {
        self.grade.is_none()
    }

    #[must_use]
    pub fn profile_picture(&self) -> Option<&str> {
        self.profile_picture.as_deref()
    }

    #[must_use]
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }
}

/// Row of the admin user list; the backend returns the same shape as `/auth/me`.
pub type ManagedUser = User;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NewUserError {
    #[error("Email and name are required.")]
    MissingField,
    #[error("Please enter a valid email address.")]
    InvalidEmail,
}

/// Form input for the admin "add user" dialog.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewUserDraft {
    pub email: String,
    pub name: String,
    pub grade: String,
}

/// Validated payload for `POST /users/`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewUser {
    email: String,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    grade: Option<Grade>,
}

impl NewUserDraft {
    /// Validate the draft into a request payload.
    ///
    /// # Errors
    ///
    /// Returns `NewUserError::MissingField` if email or name is blank and
    /// `NewUserError::InvalidEmail` if the email has no `local@domain` shape.
    pub fn validate(self) -> Result<NewUser, NewUserError> {
        let email = self.email.trim().to_string();
        let name = self.name.trim().to_string();
        if email.is_empty() || name.is_empty() {
            return Err(NewUserError::MissingField);
        }
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && domain.contains('.') => {}
            _ => return Err(NewUserError::InvalidEmail),
        }
        let grade = Grade::parse(&self.grade).ok();
        Ok(NewUser { email, name, grade })
    }
}

impl NewUser {
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn grade(&self) -> Option<&Grade> {
        self.grade.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_backend_user_with_blank_grade() {
        let json = r#"{
            "id": 3,
            "name": "Tan Wei Ming",
            "email": "wm@example.com",
            "grade": "",
            "created_at": "2024-05-01T10:00:00.123"
        }"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.id(), UserId::new(3));
        assert!(user.needs_grade());
        assert!(!user.is_admin());
        assert_eq!(user.first_name(), "Tan");
        assert!(user.created_at().is_some());
    }

    #[test]
    fn deserializes_admin_with_grade() {
        let json = r#"{"id": 1, "name": "A", "email": "a@x.io", "grade": "jc2", "is_admin": true}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert!(user.is_admin());
        assert_eq!(user.grade().map(Grade::as_str), Some("jc2"));
    }

    #[test]
    fn new_user_draft_requires_email_and_name() {
        let draft = NewUserDraft {
            email: "  ".into(),
            name: "Someone".into(),
            grade: String::new(),
        };
        assert_eq!(draft.validate(), Err(NewUserError::MissingField));

        let draft = NewUserDraft {
            email: "not-an-email".into(),
            name: "Someone".into(),
            grade: String::new(),
        };
        assert_eq!(draft.validate(), Err(NewUserError::InvalidEmail));
    }

    #[test]
    fn new_user_payload_omits_blank_grade() {
        let user = NewUserDraft {
            email: " kid@school.sg ".into(),
            name: "Kid".into(),
            grade: String::new(),
        }
        .validate()
        .unwrap();
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json, serde_json::json!({"email": "kid@school.sg", "name": "Kid"}));
    }
}
