use dioxus::prelude::*;
use review_core::model::{
    SUBJECTS, Grade, UploadDraft, UploadFile, UploadStage, check_file, check_picked,
};

use crate::context::AppContext;
use crate::session::{signed_in_user, use_session};
use crate::views::components::{ErrorBanner, GradeSelect};
use crate::vm::format_file_size;

const IMAGE_EXTENSIONS: [&str; 7] = ["png", "jpg", "jpeg", "gif", "webp", "bmp", "heic"];

#[component]
pub fn UploadView() -> Element {
    let ctx = use_context::<AppContext>();
    let session = use_session();
    let user_grade = signed_in_user(session)
        .and_then(|user| user.grade().map(|grade| grade.as_str().to_string()))
        .unwrap_or_default();

    let mut file = use_signal(|| None::<UploadFile>);
    let mut subject = use_signal(String::new);
    let mut grade = use_signal(move || user_grade);
    let mut stage = use_signal(|| None::<UploadStage>);
    let mut error = use_signal(|| None::<String>);
    let mut success = use_signal(|| None::<String>);

    // Follow grade changes made elsewhere, e.g. the sidebar.
    use_effect(move || {
        let current = session
            .read()
            .user()
            .and_then(|user| user.grade().map(|grade| grade.as_str().to_string()))
            .unwrap_or_default();
        if *grade.peek() != current {
            grade.set(current);
        }
    });

    let on_pick = use_callback(move |()| {
        spawn(async move {
            let Some(handle) = rfd::AsyncFileDialog::new()
                .add_filter("Images", &IMAGE_EXTENSIONS[..])
                .pick_file()
                .await
            else {
                return;
            };
            let name = handle.file_name();
            // Reject oversized files from metadata so they are never buffered.
            if let Ok(meta) = tokio::fs::metadata(handle.path()).await {
                if let Err(err) = check_picked(&name, meta.len()) {
                    file.set(None);
                    error.set(Some(err.to_string()));
                    return;
                }
            }
            let picked = UploadFile::new(name, handle.read().await);
            match check_file(&picked.mime_type, picked.size()) {
                Ok(()) => {
                    error.set(None);
                    success.set(None);
                    file.set(Some(picked));
                }
                Err(err) => {
                    file.set(None);
                    error.set(Some(err.to_string()));
                }
            }
        });
    });

    let on_submit = {
        let uploads = ctx.uploads();
        use_callback(move |()| {
            let draft = UploadDraft {
                file: file(),
                subject: subject(),
                grade: Grade::parse(&grade()).ok(),
            };
            let uploads = uploads.clone();
            error.set(None);
            success.set(None);
            stage.set(Some(UploadStage::Uploading));
            spawn(async move {
                let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
                let upload = uploads.upload(draft, move |next| {
                    let _ = tx.send(next);
                });
                let progress = async {
                    while let Some(next) = rx.recv().await {
                        stage.set(Some(next));
                    }
                };
                let (result, ()) = tokio::join!(upload, progress);

                stage.set(None);
                match result {
                    Ok(receipt) => {
                        success.set(Some(receipt.success_message()));
                        file.set(None);
                        subject.set(String::new());
                    }
                    Err(err) => error.set(Some(err.user_message())),
                }
            });
        })
    };

    let busy = stage.read().is_some();
    let picked = file.read().clone();

    rsx! {
        div { class: "page upload-page",
            h2 { "Upload exam paper" }
            p { class: "muted",
                "Upload a photo of a marked paper and the wrong answers are extracted for review."
            }

            div { class: "upload-drop",
                if let Some(picked) = picked {
                    div { class: "upload-file",
                        span { class: "upload-file-name", "{picked.file_name}" }
                        span { class: "muted", "{format_file_size(picked.size())}" }
                        button {
                            class: "btn btn-secondary",
                            r#type: "button",
                            disabled: busy,
                            onclick: move |_| file.set(None),
                            "Remove"
                        }
                    }
                } else {
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        disabled: busy,
                        onclick: move |_| on_pick.call(()),
                        "Choose image..."
                    }
                    p { class: "muted", "PNG, JPG or GIF up to 10MB" }
                }
            }

            div { class: "form-row",
                label {
                    span { "Subject" }
                    select {
                        class: "subject-select",
                        value: "{subject}",
                        disabled: busy,
                        onchange: move |evt| subject.set(evt.value()),
                        option { value: "", selected: subject.read().is_empty(), "Select a subject" }
                        for name in SUBJECTS {
                            option { key: "{name}", value: "{name}", selected: *subject.read() == name, "{name}" }
                        }
                    }
                }
                label {
                    span { "Grade" }
                    GradeSelect {
                        value: grade(),
                        disabled: busy,
                        placeholder: "No grade".to_string(),
                        onchange: move |raw| grade.set(raw),
                    }
                }
            }

            if let Some(current) = stage() {
                div { class: "upload-progress",
                    div { class: "progress-track",
                        div { class: "progress-fill", style: "width: {current.percent()}%" }
                    }
                    p { class: "muted", "{current.label()}" }
                }
            }

            if let Some(message) = error() {
                ErrorBanner { message }
            }
            if let Some(message) = success() {
                div { class: "success-banner", role: "status", "{message}" }
            }

            button {
                class: "btn btn-primary",
                r#type: "button",
                disabled: busy,
                onclick: move |_| on_submit.call(()),
                if busy { "Processing..." } else { "Upload and extract" }
            }
        }
    }
}
