use dioxus::prelude::*;
use review_core::model::{Grade, GradeCategory, QuestionStatus, options_in};

/// Grade dropdown grouped by category.
///
/// A value outside the catalog is kept as an extra option so saving the
/// form never silently drops it.
#[component]
pub fn GradeSelect(
    value: String,
    #[props(default)] disabled: bool,
    placeholder: Option<String>,
    onchange: EventHandler<String>,
) -> Element {
    let unknown = Grade::parse(&value)
        .ok()
        .filter(|grade| !grade.is_recognized());

    rsx! {
        select {
            class: "grade-select",
            value: "{value}",
            disabled,
            onchange: move |evt| onchange.call(evt.value()),
            if let Some(placeholder) = placeholder {
                option { value: "", selected: value.is_empty(), "{placeholder}" }
            }
            for category in GradeCategory::ALL {
                optgroup { key: "{category.label()}", label: "{category.label()}",
                    for choice in options_in(category) {
                        option {
                            key: "{choice.value}",
                            value: "{choice.value}",
                            selected: choice.value == value,
                            "{choice.label}"
                        }
                    }
                }
            }
            if let Some(grade) = unknown {
                option { value: "{grade}", selected: true, "{grade.label()}" }
            }
        }
    }
}

#[component]
pub fn StatusBadge(status: QuestionStatus) -> Element {
    rsx! {
        span { class: "status-badge status-{status.as_str()}", "{status.label()}" }
    }
}

#[component]
pub fn ErrorBanner(message: String) -> Element {
    rsx! {
        div { class: "error-banner", role: "alert", "{message}" }
    }
}

/// Inline yes/no confirmation used before destructive actions.
#[component]
pub fn ConfirmBar(
    message: String,
    confirm_label: String,
    #[props(default)] busy: bool,
    on_confirm: EventHandler<()>,
    on_cancel: EventHandler<()>,
) -> Element {
    rsx! {
        div { class: "confirm-bar",
            span { "{message}" }
            button {
                class: "btn btn-danger",
                r#type: "button",
                disabled: busy,
                onclick: move |_| on_confirm.call(()),
                "{confirm_label}"
            }
            button {
                class: "btn btn-secondary",
                r#type: "button",
                disabled: busy,
                onclick: move |_| on_cancel.call(()),
                "Cancel"
            }
        }
    }
}
