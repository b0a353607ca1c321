#![forbid(unsafe_code)]

pub mod admin_users_service;
pub mod api;
pub mod app_services;
pub mod auth_service;
pub mod config;
pub mod error;
pub mod google_sign_in;
pub mod grade_service;
pub mod preferences_service;
pub mod progress_service;
pub mod question_service;
pub mod sequencer;
pub mod session_store;
pub mod upload_service;
pub mod usage_service;

pub use admin_users_service::{AdminAction, AdminUsersService};
pub use api::{Endpoint, ExamApi, HttpExamApi, InMemoryExamApi, LoginResponse, MessageResponse};
pub use app_services::AppServices;
pub use auth_service::AuthService;
pub use config::ClientConfig;
pub use error::{
    AdminError, ApiError, AppServicesError, AuthError, ConfigError, GradeError,
    PreferencesServiceError, QuestionServiceError, UploadServiceError,
};
pub use grade_service::GradeService;
pub use preferences_service::PreferencesService;
pub use progress_service::{ProgressReport, ProgressService};
pub use question_service::{ListSource, QuestionService, ReviewBoard};
pub use sequencer::{RequestSequencer, Ticket};
pub use session_store::{AuthState, SessionSnapshot, SessionStore};
pub use upload_service::UploadService;
pub use usage_service::{UsageReport, UsageService};
