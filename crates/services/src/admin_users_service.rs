use std::sync::Arc;

use reqwest::StatusCode;
use review_core::model::{ManagedUser, NewUserDraft, UserId};

use crate::api::ExamApi;
use crate::error::AdminError;

const LOAD_FAILED: &str = "Failed to load users. Please try again.";
const ADD_FAILED: &str = "Failed to add user. Please try again.";
const ADD_REJECTED: &str = "User already exists.";
const DELETE_FAILED: &str = "Failed to delete user. Please try again.";
const DELETE_REJECTED: &str = "Cannot delete this user.";

/// Admin-only account management.
#[derive(Clone)]
pub struct AdminUsersService {
    api: Arc<dyn ExamApi>,
}

impl AdminUsersService {
    #[must_use]
    pub fn new(api: Arc<dyn ExamApi>) -> Self {
        Self { api }
    }

    /// # Errors
    ///
    /// Returns `AdminError::Api` on failure (403 for non-admins).
    pub async fn list(&self) -> Result<Vec<ManagedUser>, AdminError> {
        Ok(self.api.list_users().await?)
    }

    /// Validate the form and create the account.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Invalid` without contacting the backend when the
    /// draft is incomplete, otherwise `AdminError::Api`.
    pub async fn add(&self, draft: NewUserDraft) -> Result<ManagedUser, AdminError> {
        let new_user = draft.validate()?;
        let created = self.api.create_user(&new_user).await?;
        tracing::info!(user_id = %created.id(), "user created");
        Ok(created)
    }

    /// # Errors
    ///
    /// Returns `AdminError::Api` on failure.
    pub async fn delete(&self, id: UserId) -> Result<(), AdminError> {
        self.api.delete_user(id).await?;
        tracing::info!(user_id = %id, "user deleted");
        Ok(())
    }
}

/// Which admin action produced an error, for picking its message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdminAction {
    Load,
    Add,
    Delete,
}

impl AdminError {
    #[must_use]
    pub fn user_message(&self, action: AdminAction) -> String {
        match self {
            Self::Invalid(err) => err.to_string(),
            Self::Api(err) => match action {
                AdminAction::Load => err.user_message(LOAD_FAILED),
                AdminAction::Add if err.status() == Some(StatusCode::BAD_REQUEST) => {
                    err.user_message(ADD_REJECTED)
                }
                AdminAction::Add => err.user_message(ADD_FAILED),
                AdminAction::Delete if err.status() == Some(StatusCode::BAD_REQUEST) => {
                    err.user_message(DELETE_REJECTED)
                }
                AdminAction::Delete => err.user_message(DELETE_FAILED),
            },
        }
    }
}
