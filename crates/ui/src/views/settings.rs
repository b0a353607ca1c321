use dioxus::prelude::*;
use dioxus_router::use_navigator;
use review_core::model::format_grade;

use crate::context::AppContext;
use crate::routes::Route;
use crate::session::{signed_in_user, use_preferences, use_session};
use crate::views::{SaveState, ViewError};
use crate::views::components::{ErrorBanner, GradeSelect};

/// Profile (read-only apart from the grade) and appearance.
#[component]
pub fn SettingsView() -> Element {
    let ctx = use_context::<AppContext>();
    let session = use_session();
    let mut preferences = use_preferences();
    let navigator = use_navigator();
    let mut grade_state = use_signal(|| SaveState::Idle);

    let on_grade_change = {
        let grades = ctx.grades();
        use_callback(move |raw: String| {
            let grades = grades.clone();
            grade_state.set(SaveState::Saving);
            spawn(async move {
                match grades.select_raw(Some(&raw)).await {
                    Ok(_) => grade_state.set(SaveState::Saved),
                    Err(err) => {
                        grade_state.set(SaveState::Error(ViewError::new(err.user_message())));
                    }
                }
            });
        })
    };

    let on_dark_mode = {
        let prefs_service = ctx.preferences();
        use_callback(move |enabled: bool| {
            preferences.write().dark_mode = enabled;
            let prefs_service = prefs_service.clone();
            spawn(async move {
                if let Err(err) = prefs_service.save_dark_mode(enabled).await {
                    tracing::warn!(error = %err, "could not persist dark mode");
                }
            });
        })
    };

    let Some(user) = signed_in_user(session) else {
        return rsx! {};
    };
    let grade_value = user
        .grade()
        .map(|grade| grade.as_str().to_string())
        .unwrap_or_default();
    let grade_label = format_grade(user.grade());
    let saving = grade_state.read().is_busy();
    let saved = *grade_state.read() == SaveState::Saved;
    let grade_error = grade_state.read().error().map(str::to_string);
    let dark_mode = preferences.read().dark_mode;

    rsx! {
        div { class: "page settings-page",
            h2 { "Settings" }

            section { class: "settings-section",
                h3 { "Profile" }
                dl {
                    dt { "Name" }
                    dd { "{user.name()}" }
                    dt { "Email" }
                    dd { "{user.email()}" }
                    dt { "Current grade" }
                    dd { "{grade_label}" }
                }
            }

            section { class: "settings-section",
                h3 { "Grade level" }
                GradeSelect {
                    value: grade_value,
                    disabled: saving,
                    placeholder: "Select your grade".to_string(),
                    onchange: move |raw| on_grade_change.call(raw),
                }
                if saved {
                    p { class: "success-banner", "Grade updated." }
                }
                if let Some(message) = grade_error {
                    ErrorBanner { message }
                }
                button {
                    class: "btn btn-link",
                    r#type: "button",
                    onclick: move |_| {
                        navigator.push(Route::ChangeGrade {});
                    },
                    "Open the full grade picker"
                }
            }

            section { class: "settings-section",
                h3 { "Appearance" }
                label { class: "toggle",
                    input {
                        r#type: "checkbox",
                        checked: dark_mode,
                        onchange: move |evt| on_dark_mode.call(evt.checked()),
                    }
                    span { "Dark mode" }
                }
            }
        }
    }
}
