use dioxus::prelude::*;
use dioxus_router::use_navigator;
use review_core::model::{GradeCategory, options_in};

use crate::context::AppContext;
use crate::routes::Route;
use crate::session::{signed_in_user, use_session};
use crate::views::components::ErrorBanner;
use crate::views::{SaveState, ViewError};

/// Grade picker shown before the dashboard when the user has no grade.
///
/// `on_skip` renders "Skip for now"; it is only offered when the user already
/// has a grade to fall back on.
#[component]
pub fn GradeSelectionView(
    on_skip: Option<EventHandler<()>>,
    on_saved: Option<EventHandler<()>>,
) -> Element {
    let ctx = use_context::<AppContext>();
    let session = use_session();
    let user = signed_in_user(session);
    let initial = user
        .as_ref()
        .and_then(|user| user.grade())
        .map(|grade| grade.as_str().to_string())
        .unwrap_or_default();
    let mut selected = use_signal(move || initial);
    let mut save_state = use_signal(|| SaveState::Idle);

    let on_submit = {
        let grades = ctx.grades();
        use_callback(move |()| {
            let raw = selected();
            let grades = grades.clone();
            spawn(async move {
                save_state.set(SaveState::Saving);
                match grades.select_raw(Some(&raw)).await {
                    Ok(_) => {
                        save_state.set(SaveState::Saved);
                        if let Some(on_saved) = on_saved {
                            on_saved.call(());
                        }
                    }
                    Err(err) => {
                        save_state.set(SaveState::Error(ViewError::new(err.user_message())));
                    }
                }
            });
        })
    };

    let has_grade = user.as_ref().is_some_and(|user| user.grade().is_some());
    let first_name = user
        .as_ref()
        .map(|user| user.first_name().to_string())
        .unwrap_or_default();
    let busy = save_state.read().is_busy();
    let error = save_state.read().error().map(str::to_string);

    rsx! {
        div { class: "grade-page",
            div { class: "grade-card",
                h1 { "Welcome, {first_name}!" }
                p { "Select your grade level so we can tailor your questions." }

                for category in GradeCategory::ALL {
                    fieldset { key: "{category.label()}", class: "grade-group",
                        legend { "{category.label()}" }
                        div { class: "grade-options",
                            for choice in options_in(category) {
                                button {
                                    key: "{choice.value}",
                                    class: if selected() == choice.value { "grade-option selected" } else { "grade-option" },
                                    r#type: "button",
                                    disabled: busy,
                                    onclick: move |_| selected.set(choice.value.to_string()),
                                    "{choice.short_label}"
                                }
                            }
                        }
                    }
                }

                if let Some(message) = error {
                    ErrorBanner { message }
                }

                div { class: "grade-actions",
                    button {
                        class: "btn btn-primary",
                        r#type: "button",
                        disabled: busy,
                        onclick: move |_| on_submit.call(()),
                        if busy { "Saving..." } else { "Continue" }
                    }
                    if has_grade {
                        if let Some(on_skip) = on_skip {
                            button {
                                class: "btn btn-secondary",
                                r#type: "button",
                                disabled: busy,
                                onclick: move |_| on_skip.call(()),
                                "Skip for now"
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Grade picker reached from Settings; returns there when done.
#[component]
pub fn ChangeGradeView() -> Element {
    let navigator = use_navigator();
    rsx! {
        GradeSelectionView {
            on_skip: move |()| {
                navigator.push(Route::Settings {});
            },
            on_saved: move |()| {
                navigator.push(Route::Settings {});
            },
        }
    }
}
