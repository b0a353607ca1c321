use std::sync::Arc;

use review_core::model::{Grade, User};

use crate::api::ExamApi;
use crate::error::GradeError;
use crate::session_store::SessionStore;

/// Changes the user's grade and publishes the result to every session subscriber.
#[derive(Clone)]
pub struct GradeService {
    api: Arc<dyn ExamApi>,
    session: Arc<SessionStore>,
}

impl GradeService {
    #[must_use]
    pub fn new(api: Arc<dyn ExamApi>, session: Arc<SessionStore>) -> Self {
        Self { api, session }
    }

    /// True when the signed-in user still has to pick a grade.
    #[must_use]
    pub fn needs_selection(&self) -> bool {
        self.session
            .current_user()
            .is_some_and(|user| user.needs_grade())
    }

    /// Persist `grade` for the signed-in user.
    ///
    /// The user returned by the backend replaces the session user in place.
    ///
    /// # Errors
    ///
    /// Returns `GradeError::Api` if the update is rejected; the session is unchanged.
    pub async fn select_grade(&self, grade: &Grade) -> Result<User, GradeError> {
        let user = self.api.update_grade(grade).await?;
        tracing::info!(user_id = %user.id(), grade = %grade, "grade updated");
        self.session.set_user(user.clone());
        Ok(user)
    }

    /// Validate a raw form selection, then persist it.
    ///
    /// # Errors
    ///
    /// Returns `GradeError::NoSelection` for an empty selection (no request is
    /// made), otherwise as `select_grade`.
    pub async fn select_raw(&self, raw: Option<&str>) -> Result<User, GradeError> {
        let raw = raw.map(str::trim).filter(|raw| !raw.is_empty());
        let grade = Grade::parse(raw.ok_or(GradeError::NoSelection)?)?;
        self.select_grade(&grade).await
    }
}
