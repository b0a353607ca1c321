use std::sync::Arc;

use review_core::model::{QuestionFilter, QuestionId, QuestionStatus, WrongQuestion};

use crate::api::ExamApi;
use crate::error::QuestionServiceError;
use crate::sequencer::RequestSequencer;

/// Default cap on semantic search results.
pub const SEARCH_LIMIT: u32 = 20;

/// Which endpoint produced a listing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListSource {
    Filtered,
    Search,
}

/// Question listing, search and per-question mutations.
///
/// Listing and search share one sequencer: only the response to the most
/// recent of either is returned, older ones come back as `Stale`.
pub struct QuestionService {
    api: Arc<dyn ExamApi>,
    sequencer: RequestSequencer,
}

impl QuestionService {
    #[must_use]
    pub fn new(api: Arc<dyn ExamApi>) -> Self {
        Self {
            api,
            sequencer: RequestSequencer::new(),
        }
    }

    /// Fetch questions matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionServiceError::Stale` if a newer listing was started
    /// meanwhile, or `Api` on request failure.
    pub async fn list(
        &self,
        filter: &QuestionFilter,
    ) -> Result<Vec<WrongQuestion>, QuestionServiceError> {
        let ticket = self.sequencer.issue();
        let result = self.api.list_wrong_questions(filter).await;
        if !self.sequencer.is_current(ticket) {
            tracing::debug!(?ticket, "dropping superseded question list");
            return Err(QuestionServiceError::Stale);
        }
        Ok(result?)
    }

    /// Search when `query` has text, otherwise fall back to the filtered listing.
    ///
    /// # Errors
    ///
    /// As `list`.
    pub async fn search_or_list(
        &self,
        query: &str,
        filter: &QuestionFilter,
    ) -> Result<(ListSource, Vec<WrongQuestion>), QuestionServiceError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok((ListSource::Filtered, self.list(filter).await?));
        }
        let ticket = self.sequencer.issue();
        let result = self.api.search_questions(query, Some(SEARCH_LIMIT)).await;
        if !self.sequencer.is_current(ticket) {
            tracing::debug!(?ticket, "dropping superseded search");
            return Err(QuestionServiceError::Stale);
        }
        Ok((ListSource::Search, result?))
    }

    /// # Errors
    ///
    /// Returns `QuestionServiceError::Api` on request failure.
    pub async fn get(&self, id: QuestionId) -> Result<WrongQuestion, QuestionServiceError> {
        Ok(self.api.get_question(id).await?)
    }

    /// # Errors
    ///
    /// Returns `QuestionServiceError::Api` on request failure.
    pub async fn update_status(
        &self,
        id: QuestionId,
        status: QuestionStatus,
    ) -> Result<WrongQuestion, QuestionServiceError> {
        let updated = self.api.update_question_status(id, status).await?;
        tracing::debug!(question_id = %id, status = %status, "status updated");
        Ok(updated)
    }

    /// # Errors
    ///
    /// Returns `QuestionServiceError::Api` on request failure.
    pub async fn delete(&self, id: QuestionId) -> Result<(), QuestionServiceError> {
        self.api.delete_question(id).await?;
        tracing::debug!(question_id = %id, "question deleted");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `QuestionServiceError::Api` on request failure.
    pub async fn regenerate_explanation(
        &self,
        id: QuestionId,
    ) -> Result<WrongQuestion, QuestionServiceError> {
        Ok(self.api.regenerate_explanation(id).await?)
    }

    /// # Errors
    ///
    /// Returns `QuestionServiceError::Api` on request failure.
    pub async fn similar(
        &self,
        id: QuestionId,
    ) -> Result<Vec<WrongQuestion>, QuestionServiceError> {
        Ok(self.api.similar_questions(id).await?)
    }
}

/// Local state of the review screen.
///
/// Every mutation here is applied only after the server confirmed it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReviewBoard {
    pub questions: Vec<WrongQuestion>,
    pub source: Option<ListSource>,
    pub selected: Option<WrongQuestion>,
    pub similar: Vec<WrongQuestion>,
    pub pending_delete: Option<QuestionId>,
    /// A mutation is in flight; action buttons are disabled.
    pub updating: bool,
}

impl ReviewBoard {
    pub fn replace_list(&mut self, source: ListSource, questions: Vec<WrongQuestion>) {
        self.questions = questions;
        self.source = Some(source);
    }

    /// Show `question` in the detail view; a delete confirmation for another
    /// question does not carry over.
    pub fn open(&mut self, question: WrongQuestion) {
        self.similar.clear();
        if self.pending_delete != Some(question.id) {
            self.pending_delete = None;
        }
        self.selected = Some(question);
    }

    pub fn close(&mut self) {
        self.selected = None;
        self.similar.clear();
        self.pending_delete = None;
    }

    #[must_use]
    pub fn selected_id(&self) -> Option<QuestionId> {
        self.selected.as_ref().map(|question| question.id)
    }

    /// Patch the list entry and the open detail with a server-confirmed question.
    pub fn apply_update(&mut self, updated: &WrongQuestion) {
        if let Some(entry) = self
            .questions
            .iter_mut()
            .find(|question| question.id == updated.id)
        {
            *entry = updated.clone();
        }
        if self.selected_id() == Some(updated.id) {
            self.selected = Some(updated.clone());
        }
    }

    pub fn request_delete(&mut self, id: QuestionId) {
        self.pending_delete = Some(id);
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Drop a deleted question, closing its detail view if open.
    pub fn remove(&mut self, id: QuestionId) {
        self.questions.retain(|question| question.id != id);
        self.similar.retain(|question| question.id != id);
        if self.selected_id() == Some(id) {
            self.selected = None;
            self.similar.clear();
        }
        if self.pending_delete == Some(id) {
            self.pending_delete = None;
        }
    }

    pub fn set_similar(&mut self, for_id: QuestionId, similar: Vec<WrongQuestion>) {
        if self.selected_id() == Some(for_id) {
            self.similar = similar;
        }
    }
}
