mod filter;
pub mod grade;
mod ids;
mod preferences;
mod question;
mod stats;
mod subject;
mod upload;
mod usage;
mod user;

pub use filter::QuestionFilter;
pub use grade::{
    GRADE_OPTIONS, Grade, GradeCategory, GradeOption, GradeParseError, format_grade, options_in,
};
pub use ids::{ParseIdError, QuestionId, UserId};
pub use preferences::{ClientPreferences, DashboardTab, PreferencesError};
pub use question::{QuestionStatus, StatusParseError, WrongQuestion, resolve_media_url};
pub use stats::{Achievement, StudentStats, SubjectStats, percentage};
pub use subject::{SUBJECTS, is_known_subject};
pub use upload::{
    MAX_UPLOAD_BYTES, UploadDraft, UploadError, UploadFile, UploadReceipt, UploadStage,
    ValidatedUpload, check_file, check_picked, mime_from_file_name,
};
pub use usage::{SystemUsage, TokenUsage, UserUsage, format_tokens};
pub use user::{ManagedUser, NewUser, NewUserDraft, NewUserError, User};
