use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use url::Url;

use review_core::model::{
    Grade, NewUser, QuestionFilter, QuestionId, QuestionStatus, StudentStats, SubjectStats,
    SystemUsage, TokenUsage, UploadReceipt, User, UserId, ValidatedUpload, WrongQuestion,
};

use super::{ExamApi, LoginResponse, MessageResponse};
use crate::error::ApiError;

/// Backend operations, as recorded by `InMemoryExamApi`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Login,
    CurrentUser,
    UpdateGrade,
    Upload,
    ListQuestions,
    GetQuestion,
    UpdateStatus,
    DeleteQuestion,
    Regenerate,
    Similar,
    Search,
    StudentStats,
    SubjectStats,
    OwnUsage,
    AllUsage,
    ListUsers,
    CreateUser,
    DeleteUser,
}

/// One call seen by the fake, with whether a bearer token was attached.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedCall {
    pub endpoint: Endpoint,
    pub authenticated: bool,
}

#[derive(Default)]
struct FakeState {
    bearer: Option<String>,
    credentials: HashMap<String, UserId>,
    sessions: HashMap<String, UserId>,
    users: BTreeMap<UserId, User>,
    questions: BTreeMap<QuestionId, WrongQuestion>,
    usage: SystemUsage,
    uploads: u32,
    questions_per_upload: u32,
    omit_login_user: bool,
    next_question_id: i64,
    next_user_id: i64,
    failures: HashMap<Endpoint, (StatusCode, Option<String>)>,
    calls: Vec<RecordedCall>,
}

/// In-process stand-in for the exam backend.
///
/// Behaves like the real service for a single signed-in user: protected
/// endpoints need a known bearer token, admin endpoints need an admin.
pub struct InMemoryExamApi {
    base_url: Url,
    now: DateTime<Utc>,
    state: Mutex<FakeState>,
}

impl InMemoryExamApi {
    /// `now` stamps every question the fake creates.
    #[must_use]
    pub fn new(base_url: Url, now: DateTime<Utc>) -> Self {
        Self {
            base_url,
            now,
            state: Mutex::new(FakeState {
                questions_per_upload: 1,
                next_question_id: 1,
                next_user_id: 1000,
                ..FakeState::default()
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Accept `credential` at `/auth/google` and sign in as `user`.
    pub fn register_credential(&self, credential: &str, user: User) {
        let mut state = self.lock();
        state.credentials.insert(credential.to_string(), user.id());
        state.users.insert(user.id(), user);
    }

    /// Treat `token` as a live session for `user`, as if issued earlier.
    pub fn register_session(&self, token: &str, user: User) {
        let mut state = self.lock();
        state.sessions.insert(token.to_string(), user.id());
        state.users.insert(user.id(), user);
    }

    /// Expire every issued session token.
    pub fn revoke_sessions(&self) {
        self.lock().sessions.clear();
    }

    pub fn add_user(&self, user: User) {
        self.lock().users.insert(user.id(), user);
    }

    pub fn add_question(&self, question: WrongQuestion) {
        let mut state = self.lock();
        state.next_question_id = state.next_question_id.max(question.id.value() + 1);
        state.questions.insert(question.id, question);
    }

    pub fn set_usage(&self, usage: SystemUsage) {
        self.lock().usage = usage;
    }

    pub fn set_questions_per_upload(&self, count: u32) {
        self.lock().questions_per_upload = count;
    }

    /// Answer `/auth/google` without the user, as older backends do.
    pub fn omit_login_user(&self, omit: bool) {
        self.lock().omit_login_user = omit;
    }

    /// Make the next call to `endpoint` fail with `status`.
    pub fn fail_next(&self, endpoint: Endpoint, status: StatusCode, detail: Option<&str>) {
        self.lock()
            .failures
            .insert(endpoint, (status, detail.map(str::to_string)));
    }

    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock().calls.clone()
    }

    #[must_use]
    pub fn call_count(&self, endpoint: Endpoint) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|call| call.endpoint == endpoint)
            .count()
    }

    #[must_use]
    pub fn last_call(&self) -> Option<RecordedCall> {
        self.lock().calls.last().cloned()
    }

    #[must_use]
    pub fn question(&self, id: QuestionId) -> Option<WrongQuestion> {
        self.lock().questions.get(&id).cloned()
    }

    #[must_use]
    pub fn user(&self, id: UserId) -> Option<User> {
        self.lock().users.get(&id).cloned()
    }

    /// Build a question stamped with the fake's clock.
    #[must_use]
    pub fn question_fixture(
        &self,
        id: i64,
        subject: &str,
        grade: Option<&str>,
        status: QuestionStatus,
        text: &str,
    ) -> WrongQuestion {
        WrongQuestion {
            id: QuestionId::new(id),
            subject: subject.to_string(),
            question_text: text.to_string(),
            grade: grade.and_then(|raw| Grade::parse(raw).ok()),
            image_url: Some(format!("/uploads/{id}.jpg")),
            image_snippet_url: None,
            explanation: Some(format!("Worked solution for question {id}.")),
            status,
            created_at: self.now,
            updated_at: None,
        }
    }

    /// Record the call, apply any injected failure, then resolve the session user.
    fn begin(state: &mut FakeState, endpoint: Endpoint) -> Result<Option<User>, ApiError> {
        state.calls.push(RecordedCall {
            endpoint,
            authenticated: state.bearer.is_some(),
        });
        if let Some((status, detail)) = state.failures.remove(&endpoint) {
            return Err(ApiError::from_status(status, detail));
        }
        let user = state
            .bearer
            .as_ref()
            .and_then(|token| state.sessions.get(token))
            .and_then(|id| state.users.get(id))
            .cloned();
        Ok(user)
    }

    fn authed(state: &mut FakeState, endpoint: Endpoint) -> Result<User, ApiError> {
        Self::begin(state, endpoint)?
            .ok_or_else(|| ApiError::from_status(StatusCode::UNAUTHORIZED, None))
    }

    fn admin(state: &mut FakeState, endpoint: Endpoint) -> Result<User, ApiError> {
        let user = Self::authed(state, endpoint)?;
        if !user.is_admin() {
            return Err(ApiError::from_status(
                StatusCode::FORBIDDEN,
                Some("Admin access required".into()),
            ));
        }
        Ok(user)
    }

    fn missing_question() -> ApiError {
        ApiError::from_status(StatusCode::NOT_FOUND, Some("Question not found".into()))
    }
}

fn matches_filter(question: &WrongQuestion, filter: &QuestionFilter) -> bool {
    let date = question.created_at.date_naive();
    filter
        .subject
        .as_deref()
        .is_none_or(|subject| subject.trim().is_empty() || question.subject == subject)
        && filter
            .grade
            .as_ref()
            .is_none_or(|grade| question.grade.as_ref() == Some(grade))
        && filter.status.is_none_or(|status| question.status == status)
        && filter.start_date.is_none_or(|start| date >= start)
        && filter.end_date.is_none_or(|end| date <= end)
}

#[async_trait]
impl ExamApi for InMemoryExamApi {
    fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn set_bearer_token(&self, token: Option<String>) {
        self.lock().bearer = token;
    }

    fn has_bearer_token(&self) -> bool {
        self.lock().bearer.is_some()
    }

    async fn login_with_google(&self, credential: &str) -> Result<LoginResponse, ApiError> {
        let mut state = self.lock();
        Self::begin(&mut state, Endpoint::Login)?;
        let user_id = state.credentials.get(credential).copied().ok_or_else(|| {
            ApiError::from_status(
                StatusCode::UNAUTHORIZED,
                Some("Invalid Google token".into()),
            )
        })?;
        let user = state
            .users
            .get(&user_id)
            .cloned()
            .ok_or_else(|| ApiError::from_status(StatusCode::UNAUTHORIZED, None))?;
        let access_token = format!("session-{}-{}", user_id, state.sessions.len() + 1);
        state.sessions.insert(access_token.clone(), user_id);
        Ok(LoginResponse {
            access_token,
            token_type: Some("bearer".into()),
            user: (!state.omit_login_user).then_some(user),
        })
    }

    async fn current_user(&self) -> Result<User, ApiError> {
        let mut state = self.lock();
        Self::authed(&mut state, Endpoint::CurrentUser)
    }

    async fn update_grade(&self, grade: &Grade) -> Result<User, ApiError> {
        let mut state = self.lock();
        let user = Self::authed(&mut state, Endpoint::UpdateGrade)?;
        let updated = user.with_grade(Some(grade.clone()));
        state.users.insert(updated.id(), updated.clone());
        Ok(updated)
    }

    async fn upload_question_image(
        &self,
        upload: &ValidatedUpload,
    ) -> Result<UploadReceipt, ApiError> {
        let mut state = self.lock();
        Self::authed(&mut state, Endpoint::Upload)?;
        state.uploads += 1;
        let upload_id = i64::from(state.uploads);
        for idx in 0..state.questions_per_upload {
            let id = state.next_question_id;
            state.next_question_id += 1;
            let mut question = self.question_fixture(
                id,
                upload.subject(),
                upload.grade().map(Grade::as_str),
                QuestionStatus::Pending,
                &format!("Extracted question {} from {}", idx + 1, upload.file().file_name),
            );
            question.image_url = Some(format!("/uploads/{upload_id}.jpg"));
            state.questions.insert(question.id, question);
        }
        Ok(UploadReceipt {
            message: "Image processed".into(),
            questions_count: state.questions_per_upload,
            upload_id,
        })
    }

    async fn list_wrong_questions(
        &self,
        filter: &QuestionFilter,
    ) -> Result<Vec<WrongQuestion>, ApiError> {
        let mut state = self.lock();
        Self::authed(&mut state, Endpoint::ListQuestions)?;
        let mut found: Vec<_> = state
            .questions
            .values()
            .filter(|question| matches_filter(question, filter))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(found)
    }

    async fn get_question(&self, id: QuestionId) -> Result<WrongQuestion, ApiError> {
        let mut state = self.lock();
        Self::authed(&mut state, Endpoint::GetQuestion)?;
        state
            .questions
            .get(&id)
            .cloned()
            .ok_or_else(Self::missing_question)
    }

    async fn update_question_status(
        &self,
        id: QuestionId,
        status: QuestionStatus,
    ) -> Result<WrongQuestion, ApiError> {
        let mut state = self.lock();
        Self::authed(&mut state, Endpoint::UpdateStatus)?;
        let now = self.now;
        let question = state
            .questions
            .get_mut(&id)
            .ok_or_else(Self::missing_question)?;
        question.status = status;
        question.updated_at = Some(now);
        Ok(question.clone())
    }

    async fn delete_question(&self, id: QuestionId) -> Result<MessageResponse, ApiError> {
        let mut state = self.lock();
        Self::authed(&mut state, Endpoint::DeleteQuestion)?;
        state
            .questions
            .remove(&id)
            .ok_or_else(Self::missing_question)?;
        Ok(MessageResponse {
            message: "Question deleted successfully".into(),
        })
    }

    async fn regenerate_explanation(&self, id: QuestionId) -> Result<WrongQuestion, ApiError> {
        let mut state = self.lock();
        Self::authed(&mut state, Endpoint::Regenerate)?;
        let now = self.now;
        let question = state
            .questions
            .get_mut(&id)
            .ok_or_else(Self::missing_question)?;
        question.explanation = Some(format!("Regenerated explanation for question {id}."));
        question.updated_at = Some(now);
        Ok(question.clone())
    }

    async fn similar_questions(&self, id: QuestionId) -> Result<Vec<WrongQuestion>, ApiError> {
        let mut state = self.lock();
        Self::authed(&mut state, Endpoint::Similar)?;
        let subject = state
            .questions
            .get(&id)
            .map(|question| question.subject.clone())
            .ok_or_else(Self::missing_question)?;
        Ok(state
            .questions
            .values()
            .filter(|question| question.id != id && question.subject == subject)
            .cloned()
            .collect())
    }

    async fn search_questions(
        &self,
        query: &str,
        limit: Option<u32>,
    ) -> Result<Vec<WrongQuestion>, ApiError> {
        let mut state = self.lock();
        Self::authed(&mut state, Endpoint::Search)?;
        let needle = query.to_lowercase();
        let limit = limit.map_or(usize::MAX, |limit| limit as usize);
        Ok(state
            .questions
            .values()
            .filter(|question| question.question_text.to_lowercase().contains(&needle))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn student_stats(&self) -> Result<StudentStats, ApiError> {
        let mut state = self.lock();
        Self::authed(&mut state, Endpoint::StudentStats)?;
        let count = |status: QuestionStatus| {
            let total = state
                .questions
                .values()
                .filter(|question| question.status == status)
                .count();
            u32::try_from(total).unwrap_or(u32::MAX)
        };
        Ok(StudentStats {
            total_questions: u32::try_from(state.questions.len()).unwrap_or(u32::MAX),
            pending_questions: count(QuestionStatus::Pending),
            reviewing_questions: count(QuestionStatus::Reviewing),
            understood_questions: count(QuestionStatus::Understood),
            total_uploads: state.uploads,
        })
    }

    async fn subject_stats(&self) -> Result<Vec<SubjectStats>, ApiError> {
        let mut state = self.lock();
        Self::authed(&mut state, Endpoint::SubjectStats)?;
        let mut by_subject: BTreeMap<String, SubjectStats> = BTreeMap::new();
        for question in state.questions.values() {
            let row = by_subject
                .entry(question.subject.clone())
                .or_insert_with(|| SubjectStats {
                    subject: question.subject.clone(),
                    total_questions: 0,
                    pending: 0,
                    reviewing: 0,
                    understood: 0,
                });
            row.total_questions += 1;
            match question.status {
                QuestionStatus::Pending => row.pending += 1,
                QuestionStatus::Reviewing => row.reviewing += 1,
                QuestionStatus::Understood => row.understood += 1,
            }
        }
        Ok(by_subject.into_values().collect())
    }

    async fn own_token_usage(&self) -> Result<TokenUsage, ApiError> {
        let mut state = self.lock();
        let user = Self::authed(&mut state, Endpoint::OwnUsage)?;
        let row = state.usage.row_for(user.id());
        Ok(TokenUsage {
            user_id: user.id(),
            user_email: user.email().to_string(),
            total_tokens_used: row.map_or(0, |row| row.total_tokens_used),
            prompt_tokens_used: row.map_or(0, |row| row.prompt_tokens_used),
            completion_tokens_used: row.map_or(0, |row| row.completion_tokens_used),
            last_token_update: row.and_then(|row| row.last_token_update.clone()),
        })
    }

    async fn all_token_usage(&self) -> Result<SystemUsage, ApiError> {
        let mut state = self.lock();
        Self::admin(&mut state, Endpoint::AllUsage)?;
        Ok(state.usage.clone())
    }

    async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        let mut state = self.lock();
        Self::admin(&mut state, Endpoint::ListUsers)?;
        Ok(state.users.values().cloned().collect())
    }

    async fn create_user(&self, user: &NewUser) -> Result<User, ApiError> {
        let mut state = self.lock();
        Self::admin(&mut state, Endpoint::CreateUser)?;
        if state.users.values().any(|existing| existing.email() == user.email()) {
            return Err(ApiError::from_status(
                StatusCode::BAD_REQUEST,
                Some("User with this email already exists".into()),
            ));
        }
        let id = UserId::new(state.next_user_id);
        state.next_user_id += 1;
        let created = User::new(id, user.name(), user.email()).with_grade(user.grade().cloned());
        state.users.insert(id, created.clone());
        Ok(created)
    }

    async fn delete_user(&self, id: UserId) -> Result<MessageResponse, ApiError> {
        let mut state = self.lock();
        let admin = Self::admin(&mut state, Endpoint::DeleteUser)?;
        if admin.id() == id {
            return Err(ApiError::from_status(
                StatusCode::BAD_REQUEST,
                Some("Cannot delete your own account".into()),
            ));
        }
        state.users.remove(&id).ok_or_else(|| {
            ApiError::from_status(StatusCode::NOT_FOUND, Some("User not found".into()))
        })?;
        Ok(MessageResponse {
            message: "User deleted successfully".into(),
        })
    }
}
