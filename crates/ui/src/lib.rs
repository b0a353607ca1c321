pub mod app;
pub mod context;
pub mod platform;
pub mod routes;
pub mod session;
pub mod views;
pub mod vm;

pub use app::App;
pub use context::{AppContext, GoogleSignIn, UiApp, build_app_context};
pub use platform::{LinkOpener, SystemBrowser};
