use dioxus::prelude::*;
use review_core::model::{
    Grade, QuestionFilter, QuestionId, QuestionStatus, SUBJECTS, WrongQuestion,
};
use review_core::time::parse_date_input;
use services::{QuestionServiceError, ReviewBoard};

use crate::context::AppContext;
use crate::session::{signed_in_user, use_session};
use crate::views::components::{ConfirmBar, ErrorBanner, GradeSelect, StatusBadge};
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{QuestionDetailVm, list_heading, map_question_detail, map_question_rows};

const LOAD_FAILED: &str = "Failed to load questions. Please try again.";

fn action_message(err: &QuestionServiceError, fallback: &str) -> String {
    match err {
        QuestionServiceError::Api(api) => api.user_message(fallback),
        _ => fallback.to_string(),
    }
}

#[component]
pub fn ReviewView() -> Element {
    let ctx = use_context::<AppContext>();
    let session = use_session();
    let api_base = ctx.api_base_url().clone();
    let user_grade = signed_in_user(session).and_then(|user| user.grade().cloned());

    let mut filter = use_signal(move || QuestionFilter::review_default(user_grade));
    let mut query_input = use_signal(String::new);
    let mut query = use_signal(String::new);
    let mut board = use_signal(ReviewBoard::default);
    let mut action_error = use_signal(|| None::<String>);

    // The grade filter follows the session user.
    use_effect(move || {
        let grade = session.read().user().and_then(|user| user.grade().cloned());
        if filter.peek().grade != grade {
            filter.write().grade = grade;
        }
    });

    let questions = ctx.questions();
    let listing = use_resource(move || {
        let questions = questions.clone();
        let filter = filter();
        let query = query();
        let _revision = session.read().revision;
        async move {
            match questions.search_or_list(&query, &filter).await {
                Ok((source, items)) => {
                    board.write().replace_list(source, items);
                    Ok(())
                }
                Err(QuestionServiceError::Stale) => Ok(()),
                Err(err) => Err(ViewError::new(action_message(&err, LOAD_FAILED))),
            }
        }
    });

    let on_status = {
        let questions = ctx.questions();
        use_callback(move |(id, status): (QuestionId, QuestionStatus)| {
            let questions = questions.clone();
            board.write().updating = true;
            spawn(async move {
                match questions.update_status(id, status).await {
                    Ok(updated) => {
                        board.write().apply_update(&updated);
                        action_error.set(None);
                    }
                    Err(err) => action_error.set(Some(action_message(
                        &err,
                        "Failed to update status. Please try again.",
                    ))),
                }
                board.write().updating = false;
            });
        })
    };

    let on_regenerate = {
        let questions = ctx.questions();
        use_callback(move |id: QuestionId| {
            let questions = questions.clone();
            board.write().updating = true;
            spawn(async move {
                match questions.regenerate_explanation(id).await {
                    Ok(updated) => {
                        board.write().apply_update(&updated);
                        action_error.set(None);
                    }
                    Err(err) => action_error.set(Some(action_message(
                        &err,
                        "Failed to regenerate explanation. Please try again.",
                    ))),
                }
                board.write().updating = false;
            });
        })
    };

    let on_similar = {
        let questions = ctx.questions();
        use_callback(move |id: QuestionId| {
            let questions = questions.clone();
            board.write().updating = true;
            spawn(async move {
                match questions.similar(id).await {
                    Ok(similar) => {
                        board.write().set_similar(id, similar);
                        action_error.set(None);
                    }
                    Err(err) => action_error.set(Some(action_message(
                        &err,
                        "Failed to find similar questions. Please try again.",
                    ))),
                }
                board.write().updating = false;
            });
        })
    };

    let on_delete = {
        let questions = ctx.questions();
        use_callback(move |id: QuestionId| {
            let questions = questions.clone();
            board.write().updating = true;
            spawn(async move {
                match questions.delete(id).await {
                    Ok(()) => {
                        board.write().remove(id);
                        action_error.set(None);
                    }
                    Err(err) => {
                        board.write().cancel_delete();
                        action_error.set(Some(action_message(
                            &err,
                            "Failed to delete question. Please try again.",
                        )));
                    }
                }
                board.write().updating = false;
            });
        })
    };

    let on_open = use_callback(move |question: WrongQuestion| {
        action_error.set(None);
        board.write().open(question);
    });

    let current = filter.read().clone();
    let subject_value = current.subject.clone().unwrap_or_default();
    let grade_value = current
        .grade
        .as_ref()
        .map(|grade| grade.as_str().to_string())
        .unwrap_or_default();
    let status_value = current.status.map(|status| status.as_str()).unwrap_or_default();
    let start_value = current
        .start_date
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_default();
    let end_value = current
        .end_date
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_default();

    let snapshot = board.read().clone();
    let rows = map_question_rows(&snapshot.questions, &api_base);
    let heading = list_heading(snapshot.source, rows.len());
    let detail = snapshot
        .selected
        .as_ref()
        .map(|question| map_question_detail(question, &api_base));
    let similar_rows = map_question_rows(&snapshot.similar, &api_base);
    let list_state = view_state_from_resource(&listing);

    rsx! {
        div { class: "page review-page",
            h2 { "Review questions" }

            form {
                class: "search-bar",
                onsubmit: move |evt| {
                    evt.prevent_default();
                    query.set(query_input());
                },
                input {
                    r#type: "search",
                    placeholder: "Search questions by meaning...",
                    value: "{query_input}",
                    oninput: move |evt| query_input.set(evt.value()),
                }
                button { class: "btn btn-primary", r#type: "submit", "Search" }
                if !query.read().is_empty() {
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| {
                            query_input.set(String::new());
                            query.set(String::new());
                        },
                        "Clear search"
                    }
                }
            }

            div { class: "filters",
                select {
                    value: "{subject_value}",
                    onchange: move |evt| {
                        let value = evt.value();
                        filter.write().subject = (!value.is_empty()).then_some(value);
                    },
                    option { value: "", selected: subject_value.is_empty(), "All subjects" }
                    for name in SUBJECTS {
                        option { key: "{name}", value: "{name}", selected: subject_value == name, "{name}" }
                    }
                }
                GradeSelect {
                    value: grade_value,
                    placeholder: "All grades".to_string(),
                    onchange: move |raw: String| filter.write().grade = Grade::parse(&raw).ok(),
                }
                select {
                    value: "{status_value}",
                    onchange: move |evt| filter.write().status = evt.value().parse().ok(),
                    option { value: "", selected: status_value.is_empty(), "All statuses" }
                    for status in QuestionStatus::ALL {
                        option {
                            key: "{status.as_str()}",
                            value: "{status.as_str()}",
                            selected: status_value == status.as_str(),
                            "{status.label()}"
                        }
                    }
                }
                label { class: "date-field",
                    span { "From" }
                    input {
                        r#type: "date",
                        value: "{start_value}",
                        onchange: move |evt| filter.write().start_date = parse_date_input(&evt.value()),
                    }
                }
                label { class: "date-field",
                    span { "To" }
                    input {
                        r#type: "date",
                        value: "{end_value}",
                        onchange: move |evt| filter.write().end_date = parse_date_input(&evt.value()),
                    }
                }
                button {
                    class: "btn btn-secondary",
                    r#type: "button",
                    onclick: move |_| filter.write().clear_keeping_grade(),
                    "Clear filters"
                }
            }

            if let Some(message) = action_error() {
                ErrorBanner { message }
            }

            div { class: "review-layout",
                section { class: "question-list",
                    h3 { "{heading}" }
                    match list_state {
                        ViewState::Error(err) => rsx! {
                            ErrorBanner { message: err.message().to_string() }
                        },
                        ViewState::Loading if rows.is_empty() => rsx! {
                            p { class: "muted", "Loading questions..." }
                        },
                        _ if rows.is_empty() => rsx! {
                            p { class: "empty", "No questions found. Upload a paper to get started." }
                        },
                        _ => rsx! {
                            ul {
                                for row in rows {
                                    li {
                                        key: "{row.id}",
                                        class: if snapshot.selected_id() == Some(row.id) { "question-row selected" } else { "question-row" },
                                        onclick: {
                                            let question = snapshot.questions.iter().find(|q| q.id == row.id).cloned();
                                            move |_| {
                                                if let Some(question) = question.clone() {
                                                    on_open.call(question);
                                                }
                                            }
                                        },
                                        if let Some(src) = row.image_url.clone() {
                                            img { class: "question-thumb", src: "{src}", alt: "Question image" }
                                        }
                                        div { class: "question-row-body",
                                            div { class: "question-row-meta",
                                                span { class: "subject", "{row.subject}" }
                                                span { class: "grade-badge", "{row.grade_label}" }
                                                StatusBadge { status: row.status }
                                            }
                                            p { "{row.preview}" }
                                            span { class: "muted", "{row.created_label}" }
                                        }
                                    }
                                }
                            }
                        },
                    }
                }

                if let Some(detail) = detail {
                    QuestionDetail {
                        detail,
                        updating: snapshot.updating,
                        confirming_delete: snapshot.pending_delete.is_some()
                            && snapshot.pending_delete == snapshot.selected_id(),
                        on_close: move |()| board.write().close(),
                        on_status: move |change| on_status.call(change),
                        on_regenerate: move |id| on_regenerate.call(id),
                        on_similar: move |id| on_similar.call(id),
                        on_request_delete: move |id| board.write().request_delete(id),
                        on_cancel_delete: move |()| board.write().cancel_delete(),
                        on_confirm_delete: move |id| on_delete.call(id),
                    }
                }
            }

            if !similar_rows.is_empty() {
                section { class: "similar-list",
                    h3 { "Similar questions" }
                    ul {
                        for row in similar_rows {
                            li {
                                key: "similar-{row.id}",
                                class: "question-row",
                                onclick: {
                                    let question = snapshot.similar.iter().find(|q| q.id == row.id).cloned();
                                    move |_| {
                                        if let Some(question) = question.clone() {
                                            on_open.call(question);
                                        }
                                    }
                                },
                                span { class: "subject", "{row.subject}" }
                                StatusBadge { status: row.status }
                                p { "{row.preview}" }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn QuestionDetail(
    detail: QuestionDetailVm,
    updating: bool,
    confirming_delete: bool,
    on_close: EventHandler<()>,
    on_status: EventHandler<(QuestionId, QuestionStatus)>,
    on_regenerate: EventHandler<QuestionId>,
    on_similar: EventHandler<QuestionId>,
    on_request_delete: EventHandler<QuestionId>,
    on_cancel_delete: EventHandler<()>,
    on_confirm_delete: EventHandler<QuestionId>,
) -> Element {
    let id = detail.id;

    rsx! {
        aside { class: "question-detail",
            header {
                h3 { "{detail.subject}" }
                span { class: "grade-badge", "{detail.grade_label}" }
                StatusBadge { status: detail.status }
                button {
                    class: "btn btn-secondary",
                    r#type: "button",
                    onclick: move |_| on_close.call(()),
                    "Close"
                }
            }
            p { class: "muted", "Added {detail.created_label}" }
            if let Some(updated) = detail.updated_label.clone() {
                p { class: "muted", "Updated {updated}" }
            }

            if let Some(src) = detail.image_url.clone() {
                img { class: "question-image", src: "{src}", alt: "Question image" }
            }
            section {
                h4 { "Question" }
                p { class: "question-text", "{detail.question_text}" }
            }
            section {
                h4 { "Explanation" }
                if let Some(html) = detail.explanation_html.clone() {
                    div { class: "explanation", dangerous_inner_html: "{html}" }
                } else {
                    p { class: "muted", "No explanation yet." }
                }
            }

            div { class: "status-actions",
                for status in QuestionStatus::ALL {
                    button {
                        key: "{status.as_str()}",
                        class: "btn status-{status.as_str()}",
                        r#type: "button",
                        disabled: updating || status == detail.status,
                        onclick: move |_| on_status.call((id, status)),
                        "Mark {status.label()}"
                    }
                }
            }

            div { class: "detail-actions",
                button {
                    class: "btn btn-secondary",
                    r#type: "button",
                    disabled: updating,
                    onclick: move |_| on_regenerate.call(id),
                    "Regenerate explanation"
                }
                button {
                    class: "btn btn-secondary",
                    r#type: "button",
                    disabled: updating,
                    onclick: move |_| on_similar.call(id),
                    "Find similar"
                }
                button {
                    class: "btn btn-danger",
                    r#type: "button",
                    disabled: updating || confirming_delete,
                    onclick: move |_| on_request_delete.call(id),
                    "Delete"
                }
            }

            if confirming_delete {
                ConfirmBar {
                    message: "Delete this question? This cannot be undone.".to_string(),
                    confirm_label: "Delete".to_string(),
                    busy: updating,
                    on_confirm: move |()| on_confirm_delete.call(id),
                    on_cancel: move |()| on_cancel_delete.call(()),
                }
            }
        }
    }
}
