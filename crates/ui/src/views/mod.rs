pub mod components;
mod grade_selection;
mod home;
mod login;
mod progress;
mod review;
mod settings;
mod state;
mod upload;
mod usage;
mod users;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use grade_selection::{ChangeGradeView, GradeSelectionView};
pub use home::HomeView;
pub use login::LoginView;
pub use progress::ProgressView;
pub use review::ReviewView;
pub use settings::SettingsView;
pub use state::{SaveState, ViewError, ViewState, view_state_from_resource};
pub use upload::UploadView;
pub use usage::UsageView;
pub use users::UsersView;
