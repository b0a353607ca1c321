//! Backend REST contract and its implementations.

use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use review_core::model::{
    Grade, NewUser, QuestionFilter, QuestionId, QuestionStatus, StudentStats, SubjectStats,
    SystemUsage, TokenUsage, UploadReceipt, User, UserId, ValidatedUpload, WrongQuestion,
};

use crate::error::ApiError;

mod fake;
mod http;

pub use fake::{Endpoint, InMemoryExamApi, RecordedCall};
pub use http::HttpExamApi;

/// Body of `POST /auth/google`.
#[derive(Clone, Debug, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

/// Plain acknowledgement returned by delete endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

/// Every backend call the client makes.
///
/// Implementations attach the current bearer token to each request.
#[async_trait]
pub trait ExamApi: Send + Sync {
    /// Base url that relative media paths are resolved against.
    fn base_url(&self) -> &Url;

    /// Replace the bearer token sent with subsequent requests.
    fn set_bearer_token(&self, token: Option<String>);

    fn has_bearer_token(&self) -> bool;

    async fn login_with_google(&self, credential: &str) -> Result<LoginResponse, ApiError>;

    async fn current_user(&self) -> Result<User, ApiError>;

    async fn update_grade(&self, grade: &Grade) -> Result<User, ApiError>;

    async fn upload_question_image(
        &self,
        upload: &ValidatedUpload,
    ) -> Result<UploadReceipt, ApiError>;

    async fn list_wrong_questions(
        &self,
        filter: &QuestionFilter,
    ) -> Result<Vec<WrongQuestion>, ApiError>;

    async fn get_question(&self, id: QuestionId) -> Result<WrongQuestion, ApiError>;

    async fn update_question_status(
        &self,
        id: QuestionId,
        status: QuestionStatus,
    ) -> Result<WrongQuestion, ApiError>;

    async fn delete_question(&self, id: QuestionId) -> Result<MessageResponse, ApiError>;

    async fn regenerate_explanation(&self, id: QuestionId) -> Result<WrongQuestion, ApiError>;

    async fn similar_questions(&self, id: QuestionId) -> Result<Vec<WrongQuestion>, ApiError>;

    async fn search_questions(
        &self,
        query: &str,
        limit: Option<u32>,
    ) -> Result<Vec<WrongQuestion>, ApiError>;

    async fn student_stats(&self) -> Result<StudentStats, ApiError>;

    async fn subject_stats(&self) -> Result<Vec<SubjectStats>, ApiError>;

    async fn own_token_usage(&self) -> Result<TokenUsage, ApiError>;

    async fn all_token_usage(&self) -> Result<SystemUsage, ApiError>;

    async fn list_users(&self) -> Result<Vec<User>, ApiError>;

    async fn create_user(&self, user: &NewUser) -> Result<User, ApiError>;

    async fn delete_user(&self, id: UserId) -> Result<MessageResponse, ApiError>;
}
