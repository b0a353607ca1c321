use std::sync::Arc;

use review_core::model::{UploadDraft, UploadReceipt, UploadStage};

use crate::api::ExamApi;
use crate::error::UploadServiceError;

/// Sends question photos to the backend for extraction.
#[derive(Clone)]
pub struct UploadService {
    api: Arc<dyn ExamApi>,
}

impl UploadService {
    #[must_use]
    pub fn new(api: Arc<dyn ExamApi>) -> Self {
        Self { api }
    }

    /// Validate `draft` and upload it, reporting each stage to `on_stage`.
    ///
    /// The stages are cosmetic: the backend does all the work inside one
    /// request, so `Analyzing` is reported once the body has been handed off
    /// and `Extracting` once the response arrives.
    ///
    /// # Errors
    ///
    /// Returns `UploadServiceError::Invalid` before any request is made when the
    /// draft fails validation, or `Api` when the backend rejects the upload.
    pub async fn upload<F>(
        &self,
        draft: UploadDraft,
        mut on_stage: F,
    ) -> Result<UploadReceipt, UploadServiceError>
    where
        F: FnMut(UploadStage) + Send,
    {
        let upload = draft.validate()?;
        tracing::info!(
            subject = upload.subject(),
            bytes = upload.file().size(),
            "uploading question image"
        );

        on_stage(UploadStage::Uploading);
        on_stage(UploadStage::Analyzing);
        let receipt = match self.api.upload_question_image(&upload).await {
            Ok(receipt) => receipt,
            Err(err) => {
                tracing::warn!(error = %err, "upload failed");
                return Err(err.into());
            }
        };
        on_stage(UploadStage::Extracting);
        on_stage(UploadStage::Done);

        tracing::info!(
            upload_id = receipt.upload_id,
            questions = receipt.questions_count,
            "upload processed"
        );
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Endpoint, InMemoryExamApi};
    use reqwest::StatusCode;
    use review_core::model::{MAX_UPLOAD_BYTES, UploadError, UploadFile, User, UserId};
    use review_core::time::fixed_now;
    use url::Url;

    fn setup() -> (Arc<InMemoryExamApi>, UploadService) {
        let api = Arc::new(InMemoryExamApi::new(
            Url::parse("http://backend.test/").unwrap(),
            fixed_now(),
        ));
        api.register_session("tok", User::new(UserId::new(2), "Ana", "ana@example.com"));
        api.set_bearer_token(Some("tok".into()));
        let service = UploadService::new(Arc::clone(&api) as Arc<dyn ExamApi>);
        (api, service)
    }

    fn draft(name: &str, bytes: usize, subject: &str) -> UploadDraft {
        UploadDraft {
            file: Some(UploadFile::new(name, vec![0; bytes])),
            subject: subject.into(),
            grade: None,
        }
    }

    #[tokio::test]
    async fn success_walks_every_stage() {
        let (api, service) = setup();
        api.set_questions_per_upload(3);
        let mut stages = Vec::new();

        let receipt = service
            .upload(draft("page.png", 1024, "Mathematics"), |stage| stages.push(stage))
            .await
            .unwrap();

        assert_eq!(receipt.questions_count, 3);
        assert_eq!(
            receipt.success_message(),
            "Successfully extracted 3 wrong question(s)!"
        );
        assert_eq!(
            stages,
            vec![
                UploadStage::Uploading,
                UploadStage::Analyzing,
                UploadStage::Extracting,
                UploadStage::Done
            ]
        );
    }

    #[tokio::test]
    async fn oversized_file_is_rejected_before_sending() {
        let (api, service) = setup();
        let err = service
            .upload(draft("big.jpg", MAX_UPLOAD_BYTES, "Mathematics"), |_| {})
            .await
            .unwrap_err();
        assert!(matches!(err, UploadServiceError::Invalid(UploadError::TooLarge)));
        assert_eq!(err.user_message(), "File size must be less than 10MB");
        assert_eq!(api.call_count(Endpoint::Upload), 0);
    }

    #[tokio::test]
    async fn backend_failure_stops_before_extracting() {
        let (api, service) = setup();
        api.fail_next(
            Endpoint::Upload,
            StatusCode::INTERNAL_SERVER_ERROR,
            Some("Vision model unavailable"),
        );
        let mut stages = Vec::new();
        let err = service
            .upload(draft("page.jpg", 10, "Physics"), |stage| stages.push(stage))
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "Vision model unavailable");
        assert_eq!(stages, vec![UploadStage::Uploading, UploadStage::Analyzing]);
    }
}
