use std::sync::Arc;

use review_core::model::{Achievement, StudentStats, SubjectStats};

use crate::api::ExamApi;
use crate::error::ApiError;

/// Everything the progress tab shows.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProgressReport {
    pub overall: StudentStats,
    pub by_subject: Vec<SubjectStats>,
}

impl ProgressReport {
    #[must_use]
    pub fn achievements(&self) -> Vec<Achievement> {
        self.overall.achievements()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.overall.total_questions == 0
    }
}

#[derive(Clone)]
pub struct ProgressService {
    api: Arc<dyn ExamApi>,
}

impl ProgressService {
    #[must_use]
    pub fn new(api: Arc<dyn ExamApi>) -> Self {
        Self { api }
    }

    /// Fetch overall and per-subject statistics concurrently.
    ///
    /// # Errors
    ///
    /// Returns the first `ApiError` from either request.
    pub async fn load(&self) -> Result<ProgressReport, ApiError> {
        let (overall, by_subject) =
            tokio::try_join!(self.api.student_stats(), self.api.subject_stats())?;
        Ok(ProgressReport {
            overall,
            by_subject,
        })
    }
}
