use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use url::Url;

use review_core::model::{
    Grade, NewUser, QuestionFilter, QuestionId, QuestionStatus, StudentStats, SubjectStats,
    SystemUsage, TokenUsage, UploadReceipt, User, UserId, ValidatedUpload, WrongQuestion,
};

use super::{ExamApi, LoginResponse, MessageResponse};
use crate::config::ClientConfig;
use crate::error::ApiError;

/// `ExamApi` over HTTP with a process-wide bearer token.
pub struct HttpExamApi {
    client: Client,
    base_url: Url,
    token: RwLock<Option<String>>,
}

impl HttpExamApi {
    /// Build a client with the configured base url and request timeout.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` if the TLS backend cannot be initialized.
    pub fn new(config: &ClientConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.http_timeout).build()?;
        Ok(Self::with_client(client, config.api_base_url.clone()))
    }

    #[must_use]
    pub fn with_client(client: Client, base_url: Url) -> Self {
        Self {
            client,
            base_url,
            token: RwLock::new(None),
        }
    }

    fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Start a request to `path` (relative to the base url) with auth attached.
    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let url = self.base_url.join(path.trim_start_matches('/'))?;
        let token = self.token();
        tracing::debug!(%method, path, authenticated = token.is_some(), "api request");
        let builder = self.client.request(method, url);
        Ok(match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    fn list_request(&self, filter: &QuestionFilter) -> Result<RequestBuilder, ApiError> {
        Ok(self
            .request(Method::GET, "questions/wrong")?
            .query(&filter.query_pairs()))
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = builder.send().await?;
        let response = check_status(response).await?;
        response
            .json::<T>()
            .await
            .map_err(|err| ApiError::Decode(err.to_string()))
    }
}

async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let detail = parse_detail(&body);
    tracing::warn!(status = status.as_u16(), detail = detail.as_deref(), "api request failed");
    Err(ApiError::from_status(status, detail))
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: Value,
}

/// Pull a human-readable `detail` out of an error body.
///
/// Validation errors carry a list of `{msg}` objects; the first message wins.
fn parse_detail(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match parsed.detail {
        Value::String(text) => Some(text),
        Value::Array(items) => items
            .iter()
            .find_map(|item| item.get("msg").and_then(Value::as_str))
            .map(str::to_string),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn upload_form(upload: &ValidatedUpload) -> Result<Form, ApiError> {
    let file = upload.file();
    let part = Part::bytes(file.bytes.clone())
        .file_name(file.file_name.clone())
        .mime_str(&file.mime_type)?;
    Ok(Form::new()
        .part("file", part)
        .text("subject", upload.subject().to_string())
        .text(
            "grade",
            upload.grade().map(Grade::as_str).unwrap_or_default().to_string(),
        ))
}

#[async_trait]
impl ExamApi for HttpExamApi {
    fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn set_bearer_token(&self, token: Option<String>) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = token;
    }

    fn has_bearer_token(&self) -> bool {
        self.token().is_some()
    }

    async fn login_with_google(&self, credential: &str) -> Result<LoginResponse, ApiError> {
        let builder = self
            .request(Method::POST, "auth/google")?
            .json(&json!({ "token": credential }));
        self.send(builder).await
    }

    async fn current_user(&self) -> Result<User, ApiError> {
        self.send(self.request(Method::GET, "auth/me")?).await
    }

    async fn update_grade(&self, grade: &Grade) -> Result<User, ApiError> {
        let builder = self
            .request(Method::PUT, "auth/grade")?
            .json(&json!({ "grade": grade }));
        self.send(builder).await
    }

    async fn upload_question_image(
        &self,
        upload: &ValidatedUpload,
    ) -> Result<UploadReceipt, ApiError> {
        let builder = self
            .request(Method::POST, "questions/upload")?
            .multipart(upload_form(upload)?);
        self.send(builder).await
    }

    async fn list_wrong_questions(
        &self,
        filter: &QuestionFilter,
    ) -> Result<Vec<WrongQuestion>, ApiError> {
        self.send(self.list_request(filter)?).await
    }

    async fn get_question(&self, id: QuestionId) -> Result<WrongQuestion, ApiError> {
        self.send(self.request(Method::GET, &format!("questions/{id}"))?)
            .await
    }

    async fn update_question_status(
        &self,
        id: QuestionId,
        status: QuestionStatus,
    ) -> Result<WrongQuestion, ApiError> {
        let builder = self
            .request(Method::PUT, &format!("questions/{id}/status"))?
            .json(&json!({ "status": status }));
        self.send(builder).await
    }

    async fn delete_question(&self, id: QuestionId) -> Result<MessageResponse, ApiError> {
        self.send(self.request(Method::DELETE, &format!("questions/{id}"))?)
            .await
    }

    async fn regenerate_explanation(&self, id: QuestionId) -> Result<WrongQuestion, ApiError> {
        self.send(self.request(Method::POST, &format!("questions/{id}/regenerate"))?)
            .await
    }

    async fn similar_questions(&self, id: QuestionId) -> Result<Vec<WrongQuestion>, ApiError> {
        self.send(self.request(Method::POST, &format!("questions/{id}/similar"))?)
            .await
    }

    async fn search_questions(
        &self,
        query: &str,
        limit: Option<u32>,
    ) -> Result<Vec<WrongQuestion>, ApiError> {
        let body = match limit {
            Some(limit) => json!({ "query": query, "limit": limit }),
            None => json!({ "query": query }),
        };
        let builder = self
            .request(Method::POST, "questions/search")?
            .json(&body);
        self.send(builder).await
    }

    async fn student_stats(&self) -> Result<StudentStats, ApiError> {
        self.send(self.request(Method::GET, "stats/")?).await
    }

    async fn subject_stats(&self) -> Result<Vec<SubjectStats>, ApiError> {
        self.send(self.request(Method::GET, "stats/by-subject")?)
            .await
    }

    async fn own_token_usage(&self) -> Result<TokenUsage, ApiError> {
        self.send(self.request(Method::GET, "usage/tokens")?).await
    }

    async fn all_token_usage(&self) -> Result<SystemUsage, ApiError> {
        self.send(self.request(Method::GET, "usage/tokens/all")?)
            .await
    }

    async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        self.send(self.request(Method::GET, "users/")?).await
    }

    async fn create_user(&self, user: &NewUser) -> Result<User, ApiError> {
        let builder = self.request(Method::POST, "users/")?.json(user);
        self.send(builder).await
    }

    async fn delete_user(&self, id: UserId) -> Result<MessageResponse, ApiError> {
        self.send(self.request(Method::DELETE, &format!("users/{id}"))?)
            .await
    }
}
