use std::sync::Arc;

use review_core::model::ClientPreferences;
use services::{
    AdminUsersService, AppServices, AuthService, GradeService, PreferencesService,
    ProgressService, QuestionService, SessionStore, UploadService, UsageService,
};
use url::Url;

use crate::platform::{LinkOpener, SystemBrowser};

pub trait UiApp: Send + Sync {
    fn services(&self) -> AppServices;

    /// Preferences read from client state before the window opened.
    fn initial_preferences(&self) -> ClientPreferences;

    fn link_opener(&self) -> Arc<dyn LinkOpener> {
        Arc::new(SystemBrowser)
    }
}

/// Google sign-in settings shown on the login screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GoogleSignIn {
    pub client_id: String,
    pub redirect_uri: String,
}

#[derive(Clone)]
pub struct AppContext {
    api_base_url: Url,
    google_sign_in: Option<GoogleSignIn>,
    initial_preferences: ClientPreferences,
    link_opener: Arc<dyn LinkOpener>,

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

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        let services = app.services();
        let config = services.config();
        let google_sign_in = config
            .google_client_id
            .clone()
            .map(|client_id| GoogleSignIn {
                client_id,
                redirect_uri: config.google_redirect_uri.clone(),
            });

        Self {
            api_base_url: services.api().base_url().clone(),
            google_sign_in,
            initial_preferences: app.initial_preferences(),
            link_opener: app.link_opener(),
            session: services.session(),
            auth: services.auth(),
            grades: services.grades(),
            questions: services.questions(),
            uploads: services.uploads(),
            progress: services.progress(),
            usage: services.usage(),
            admin_users: services.admin_users(),
            preferences: services.preferences(),
        }
    }

    /// Base url that relative image paths resolve against.
    #[must_use]
    pub fn api_base_url(&self) -> &Url {
        &self.api_base_url
    }

    #[must_use]
    pub fn google_sign_in(&self) -> Option<&GoogleSignIn> {
        self.google_sign_in.as_ref()
    }

    #[must_use]
    pub fn initial_preferences(&self) -> ClientPreferences {
        self.initial_preferences
    }

    pub fn open_url(&self, url: &str) {
        self.link_opener.open_url(url);
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

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
