use dioxus::prelude::*;
use dioxus_router::{Outlet, Routable, use_navigator, use_route};
use review_core::model::{DashboardTab, format_grade};

use crate::context::AppContext;
use crate::session::{signed_in_user, use_preferences, use_session};
use crate::views::components::GradeSelect;
use crate::views::{
    ChangeGradeView, HomeView, ProgressView, ReviewView, SettingsView, UploadView, UsageView,
    UsersView,
};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(DashboardShell)]
        #[route("/", HomeView)] Home {},
        #[route("/upload", UploadView)] Upload {},
        #[route("/review", ReviewView)] Review {},
        #[route("/progress", ProgressView)] Progress {},
        #[route("/usage", UsageView)] Usage {},
        #[route("/users", UsersView)] Users {},
        #[route("/settings", SettingsView)] Settings {},
        #[route("/grade", ChangeGradeView)] ChangeGrade {},
}

impl Route {
    #[must_use]
    pub fn for_tab(tab: DashboardTab) -> Self {
        match tab {
            DashboardTab::Upload => Route::Upload {},
            DashboardTab::Review => Route::Review {},
            DashboardTab::Progress => Route::Progress {},
            DashboardTab::Usage => Route::Usage {},
            DashboardTab::Users => Route::Users {},
            DashboardTab::Settings => Route::Settings {},
        }
    }

    #[must_use]
    pub fn tab(&self) -> Option<DashboardTab> {
        match self {
            Route::Upload {} => Some(DashboardTab::Upload),
            Route::Review {} => Some(DashboardTab::Review),
            Route::Progress {} => Some(DashboardTab::Progress),
            Route::Usage {} => Some(DashboardTab::Usage),
            Route::Users {} => Some(DashboardTab::Users),
            Route::Settings {} | Route::ChangeGrade {} => Some(DashboardTab::Settings),
            Route::Home {} => None,
        }
    }
}

#[component]
fn DashboardShell() -> Element {
    rsx! {
        div { class: "app",
            Sidebar {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn Sidebar() -> Element {
    let ctx = use_context::<AppContext>();
    let session = use_session();
    let mut preferences = use_preferences();
    let navigator = use_navigator();
    let route = use_route::<Route>();
    let mut grade_error = use_signal(|| None::<String>);
    let mut grade_saving = use_signal(|| false);

    let on_select_tab = {
        let prefs_service = ctx.preferences();
        use_callback(move |tab: DashboardTab| {
            preferences.write().active_tab = tab;
            navigator.push(Route::for_tab(tab));
            let prefs_service = prefs_service.clone();
            spawn(async move {
                if let Err(err) = prefs_service.save_tab(tab).await {
                    tracing::warn!(error = %err, "could not persist active tab");
                }
            });
        })
    };

    let on_grade_change = {
        let grades = ctx.grades();
        use_callback(move |raw: String| {
            let grades = grades.clone();
            spawn(async move {
                grade_saving.set(true);
                match grades.select_raw(Some(&raw)).await {
                    Ok(_) => grade_error.set(None),
                    Err(err) => grade_error.set(Some(err.user_message())),
                }
                grade_saving.set(false);
            });
        })
    };

    let on_toggle_dark = {
        let prefs_service = ctx.preferences();
        use_callback(move |()| {
            let next = !preferences.read().dark_mode;
            preferences.write().dark_mode = next;
            let prefs_service = prefs_service.clone();
            spawn(async move {
                if let Err(err) = prefs_service.save_dark_mode(next).await {
                    tracing::warn!(error = %err, "could not persist dark mode");
                }
            });
        })
    };

    let on_logout = {
        let auth = ctx.auth();
        use_callback(move |()| {
            let auth = auth.clone();
            spawn(async move {
                if let Err(err) = auth.logout().await {
                    tracing::warn!(error = %err, "logout left stored state behind");
                }
            });
        })
    };

    let Some(user) = signed_in_user(session) else {
        return rsx! {};
    };
    let is_admin = user.is_admin();
    let active_tab = route.tab();
    let current_grade = user
        .grade()
        .map(|grade| grade.as_str().to_string())
        .unwrap_or_default();
    let grade_label = format_grade(user.grade());
    let dark_mode = preferences.read().dark_mode;
    let theme_label = if dark_mode { "Light mode" } else { "Dark mode" };

    rsx! {
        nav { class: "sidebar",
            h1 { "Exam Review" }
            div { class: "sidebar-user",
                p { class: "sidebar-user-name", "{user.name()}" }
                p { class: "sidebar-user-email", "{user.email()}" }
                span { class: "grade-badge", "{grade_label}" }
            }
            label { class: "sidebar-grade",
                span { "Grade" }
                GradeSelect {
                    value: current_grade,
                    disabled: grade_saving(),
                    onchange: move |raw| on_grade_change.call(raw),
                }
            }
            if let Some(message) = grade_error() {
                p { class: "error", "{message}" }
            }
            ul { class: "sidebar-tabs",
                for tab in DashboardTab::visible_to(is_admin) {
                    li { key: "{tab.as_str()}",
                        button {
                            class: tab_class(active_tab == Some(tab)),
                            r#type: "button",
                            onclick: move |_| on_select_tab.call(tab),
                            "{tab.label()}"
                        }
                    }
                }
            }
            div { class: "sidebar-footer",
                button {
                    class: "btn btn-secondary",
                    r#type: "button",
                    onclick: move |_| on_toggle_dark.call(()),
                    "{theme_label}"
                }
                button {
                    class: "btn btn-secondary",
                    r#type: "button",
                    onclick: move |_| on_logout.call(()),
                    "Logout"
                }
            }
        }
    }
}

fn tab_class(active: bool) -> &'static str {
    if active { "tab active" } else { "tab" }
}
