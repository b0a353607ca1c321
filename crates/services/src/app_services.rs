use std::sync::Arc;

use storage::repository::Storage;

use crate::admin_users_service::AdminUsersService;
use crate::api::{ExamApi, HttpExamApi};
use crate::auth_service::AuthService;
use crate::config::ClientConfig;
use crate::error::AppServicesError;
use crate::grade_service::GradeService;
use crate::preferences_service::PreferencesService;
use crate::progress_service::ProgressService;
use crate::question_service::QuestionService;
use crate::session_store::SessionStore;
use crate::upload_service::UploadService;
use crate::usage_service::UsageService;

/// Assembles app-facing services around one API client and one session store.
#[derive(Clone)]
pub struct AppServices {
    config: ClientConfig,
    api: Arc<dyn ExamApi>,
    session: Arc<SessionStore>,
    auth: Arc<AuthService>,
    grades: Arc<GradeService>,
    questions: Arc<QuestionService>,
    uploads: Arc<UploadService>,
    progress: Arc<ProgressService>,
    usage: Arc<UsageService>,
    admin_users: Arc<AdminUsersService>,
    preferences: Arc<PreferencesService>,
}

impl AppServices {
    /// Wire services over an existing storage and API implementation.
    #[must_use]
    pub fn new(config: ClientConfig, storage: &Storage, api: Arc<dyn ExamApi>) -> Self {
        let session = Arc::new(SessionStore::new());
        let auth = Arc::new(AuthService::new(
            Arc::clone(&api),
            Arc::clone(&storage.client_state),
            Arc::clone(&session),
        ));
        let grades = Arc::new(GradeService::new(Arc::clone(&api), Arc::clone(&session)));
        let questions = Arc::new(QuestionService::new(Arc::clone(&api)));
        let uploads = Arc::new(UploadService::new(Arc::clone(&api)));
        let progress = Arc::new(ProgressService::new(Arc::clone(&api)));
        let usage = Arc::new(UsageService::new(Arc::clone(&api)));
        let admin_users = Arc::new(AdminUsersService::new(Arc::clone(&api)));
        let preferences = Arc::new(PreferencesService::new(Arc::clone(&storage.client_state)));

        Self {
            config,
            api,
            session,
            auth,
            grades,
            questions,
            uploads,
            progress,
            usage,
            admin_users,
            preferences,
        }
    }

    /// Build services backed by `SQLite` client state and the HTTP backend.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization or HTTP client setup fails.
    pub async fn new_sqlite(config: ClientConfig) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(&config.database_url).await?;
        let api: Arc<dyn ExamApi> = Arc::new(HttpExamApi::new(&config)?);
        tracing::info!(
            api = %config.api_base_url,
            db = %config.database_url,
            "services ready"
        );
        Ok(Self::new(config, &storage, api))
    }

    /// Build services over in-memory client state.
    #[must_use]
    pub fn in_memory(config: ClientConfig, api: Arc<dyn ExamApi>) -> Self {
        Self::new(config, &Storage::in_memory(), api)
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    #[must_use]
    pub fn api(&self) -> Arc<dyn ExamApi> {
        Arc::clone(&self.api)
    }

    #[must_use]
    pub fn session(&self) -> Arc<SessionStore> {
        Arc::clone(&self.session)
    }

    #[must_use]
    pub fn auth(&self) -> Arc<AuthService> {
        Arc::clone(&self.auth)
    }

    #[must_use]
    pub fn grades(&self) -> Arc<GradeService> {
        Arc::clone(&self.grades)
    }

    #[must_use]
    pub fn questions(&self) -> Arc<QuestionService> {
        Arc::clone(&self.questions)
    }

    #[must_use]
    pub fn uploads(&self) -> Arc<UploadService> {
        Arc::clone(&self.uploads)
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn usage(&self) -> Arc<UsageService> {
        Arc::clone(&self.usage)
    }

    #[must_use]
    pub fn admin_users(&self) -> Arc<AdminUsersService> {
        Arc::clone(&self.admin_users)
    }

    #[must_use]
    pub fn preferences(&self) -> Arc<PreferencesService> {
        Arc::clone(&self.preferences)
    }
}
