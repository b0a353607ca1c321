use dioxus::prelude::*;
use dioxus_router::Router;

use crate::context::AppContext;
use crate::routes::Route;
use crate::session::{use_session, use_session_signal};
use crate::views::{GradeSelectionView, LoginView};

#[component]
pub fn App() -> Element {
    let ctx = use_context::<AppContext>();
    let session = use_session_signal(ctx.session());
    let preferences = use_signal(|| ctx.initial_preferences());
    use_context_provider(|| session);
    use_context_provider(|| preferences);

    let root_class = if preferences.read().dark_mode {
        "app-root dark"
    } else {
        "app-root"
    };

    rsx! {
        document::Stylesheet { href: asset!("/assets/style.css") }

        document::Title { "Exam Review" }

        div { class: "{root_class}",
            ErrorBoundary {
                handle_error: |errors: ErrorContext| rsx! {
                    div { class: "fatal",
                        h1 { "Something went wrong" }
                        pre { "{errors:?}" }
                    }
                },
                AuthGate {}
            }
        }
    }
}

/// Login until signed in, then the grade gate, then the dashboard.
#[component]
pub fn AuthGate() -> Element {
    let session = use_session();
    let snapshot = session.read().clone();

    match snapshot.user() {
        None => rsx! { LoginView {} },
        Some(user) if user.needs_grade() => rsx! { GradeSelectionView {} },
        Some(_) => rsx! { Router::<Route> {} },
    }
}
