use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use review_core::model::{
    Grade, NewUser, QuestionFilter, QuestionId, QuestionStatus, StudentStats, SubjectStats,
    SystemUsage, TokenUsage, UploadDraft, UploadFile, UploadReceipt, User, UserId,
    ValidatedUpload, WrongQuestion,
};
use review_core::time::fixed_now;
use services::{
    ApiError, ExamApi, InMemoryExamApi, ListSource, LoginResponse, MessageResponse,
    QuestionService, QuestionServiceError, ReviewBoard, UploadService,
};

fn signed_in_backend() -> Arc<InMemoryExamApi> {
    let api = Arc::new(InMemoryExamApi::new(
        Url::parse("http://backend.test/").expect("base url"),
        fixed_now(),
    ));
    let user = User::new(UserId::new(5), "Noor", "noor@example.com")
        .with_grade(Some(Grade::parse("sec2").expect("grade")));
    api.register_session("tok", user);
    api.set_bearer_token(Some("tok".into()));
    api
}

#[tokio::test]
async fn uploaded_questions_show_up_for_review() {
    let api = signed_in_backend();
    api.set_questions_per_upload(2);
    let uploads = UploadService::new(Arc::clone(&api) as Arc<dyn ExamApi>);
    let questions = QuestionService::new(Arc::clone(&api) as Arc<dyn ExamApi>);

    let receipt = uploads
        .upload(
            UploadDraft {
                file: Some(UploadFile::new("worksheet.jpg", vec![1, 2, 3])),
                subject: "Mathematics".into(),
                grade: Some(Grade::parse("sec2").expect("grade")),
            },
            |_| {},
        )
        .await
        .expect("upload");
    assert_eq!(receipt.questions_count, 2);

    let mut board = ReviewBoard::default();
    let filter = QuestionFilter::review_default(Some(Grade::parse("sec2").expect("grade")));
    board.replace_list(
        ListSource::Filtered,
        questions.list(&filter).await.expect("list"),
    );
    assert_eq!(board.questions.len(), 2);
    assert!(board.questions.iter().all(|q| q.subject == "Mathematics"));

    let first = board.questions[0].clone();
    board.open(first.clone());
    let updated = questions
        .update_status(first.id, QuestionStatus::Understood)
        .await
        .expect("update status");
    board.apply_update(&updated);

    // Pending-only listing no longer includes it once refreshed.
    board.replace_list(
        ListSource::Filtered,
        questions.list(&filter).await.expect("relist"),
    );
    assert_eq!(board.questions.len(), 1);
    assert_eq!(
        board.selected.as_ref().map(|q| q.status),
        Some(QuestionStatus::Understood)
    );

    assert_eq!(
        updated.resolved_image_url(api.base_url()).as_deref(),
        Some("http://backend.test/uploads/1.jpg")
    );
}

/// Delays listings for one subject so responses come back out of order.
struct SlowSubject {
    inner: Arc<InMemoryExamApi>,
    slow_subject: &'static str,
}

#[async_trait]
impl ExamApi for SlowSubject {
    fn base_url(&self) -> &Url {
        self.inner.base_url()
    }

    fn set_bearer_token(&self, token: Option<String>) {
        self.inner.set_bearer_token(token);
    }

    fn has_bearer_token(&self) -> bool {
        self.inner.has_bearer_token()
    }

    async fn login_with_google(&self, credential: &str) -> Result<LoginResponse, ApiError> {
        self.inner.login_with_google(credential).await
    }

    async fn current_user(&self) -> Result<User, ApiError> {
        self.inner.current_user().await
    }

    async fn update_grade(&self, grade: &Grade) -> Result<User, ApiError> {
        self.inner.update_grade(grade).await
    }

    async fn upload_question_image(
        &self,
        upload: &ValidatedUpload,
    ) -> Result<UploadReceipt, ApiError> {
        self.inner.upload_question_image(upload).await
    }

    async fn list_wrong_questions(
        &self,
        filter: &QuestionFilter,
    ) -> Result<Vec<WrongQuestion>, ApiError> {
        if filter.subject.as_deref() == Some(self.slow_subject) {
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        self.inner.list_wrong_questions(filter).await
    }

    async fn get_question(&self, id: QuestionId) -> Result<WrongQuestion, ApiError> {
        self.inner.get_question(id).await
    }

    async fn update_question_status(
        &self,
        id: QuestionId,
        status: QuestionStatus,
    ) -> Result<WrongQuestion, ApiError> {
        self.inner.update_question_status(id, status).await
    }

    async fn delete_question(&self, id: QuestionId) -> Result<MessageResponse, ApiError> {
        self.inner.delete_question(id).await
    }

    async fn regenerate_explanation(&self, id: QuestionId) -> Result<WrongQuestion, ApiError> {
        self.inner.regenerate_explanation(id).await
    }

    async fn similar_questions(&self, id: QuestionId) -> Result<Vec<WrongQuestion>, ApiError> {
        self.inner.similar_questions(id).await
    }

    async fn search_questions(
        &self,
        query: &str,
        limit: Option<u32>,
    ) -> Result<Vec<WrongQuestion>, ApiError> {
        self.inner.search_questions(query, limit).await
    }

    async fn student_stats(&self) -> Result<StudentStats, ApiError> {
        self.inner.student_stats().await
    }

    async fn subject_stats(&self) -> Result<Vec<SubjectStats>, ApiError> {
        self.inner.subject_stats().await
    }

    async fn own_token_usage(&self) -> Result<TokenUsage, ApiError> {
        self.inner.own_token_usage().await
    }

    async fn all_token_usage(&self) -> Result<SystemUsage, ApiError> {
        self.inner.all_token_usage().await
    }

    async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        self.inner.list_users().await
    }

    async fn create_user(&self, user: &NewUser) -> Result<User, ApiError> {
        self.inner.create_user(user).await
    }

    async fn delete_user(&self, id: UserId) -> Result<MessageResponse, ApiError> {
        self.inner.delete_user(id).await
    }
}

#[tokio::test]
async fn superseded_listing_is_dropped() {
    let inner = signed_in_backend();
    inner.add_question(inner.question_fixture(
        1,
        "Physics",
        None,
        QuestionStatus::Pending,
        "Slow answer",
    ));
    inner.add_question(inner.question_fixture(
        2,
        "Chemistry",
        None,
        QuestionStatus::Pending,
        "Fast answer",
    ));
    let api: Arc<dyn ExamApi> = Arc::new(SlowSubject {
        inner,
        slow_subject: "Physics",
    });
    let questions = Arc::new(QuestionService::new(api));

    let physics = QuestionFilter {
        subject: Some("Physics".into()),
        ..QuestionFilter::default()
    };
    let chemistry = QuestionFilter {
        subject: Some("Chemistry".into()),
        ..QuestionFilter::default()
    };

    let slow = {
        let questions = Arc::clone(&questions);
        tokio::spawn(async move { questions.list(&physics).await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;
    let fast = questions.list(&chemistry).await.expect("latest listing");

    assert_eq!(fast.len(), 1);
    assert_eq!(fast[0].subject, "Chemistry");
    let stale = slow.await.expect("join");
    assert!(matches!(stale, Err(QuestionServiceError::Stale)));
}
