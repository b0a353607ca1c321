use dioxus::prelude::*;
use services::google_sign_in::sign_in_url;

use crate::context::AppContext;
use crate::session::use_session;
use crate::views::components::ErrorBanner;

#[component]
pub fn LoginView() -> Element {
    let ctx = use_context::<AppContext>();
    let session = use_session();
    let mut credential = use_signal(String::new);

    let sign_in_link = ctx.google_sign_in().and_then(|google| {
        sign_in_url(&google.client_id, &google.redirect_uri)
            .map(|url| url.to_string())
            .ok()
    });

    let on_submit = {
        let auth = ctx.auth();
        use_callback(move |()| {
            let raw = credential();
            let auth = auth.clone();
            spawn(async move {
                // Failures are published through the session store.
                if auth.login_with_google(&raw).await.is_ok() {
                    credential.set(String::new());
                }
            });
        })
    };

    let snapshot = session.read().clone();
    let busy = snapshot.is_authenticating();
    let submit_label = if busy { "Signing in..." } else { "Sign in" };

    rsx! {
        div { class: "login-page",
            div { class: "login-card",
                h1 { "Exam Review" }
                p { class: "login-tagline", "Turn marked exam papers into a personal review list." }

                if let Some(link) = sign_in_link {
                    ol { class: "login-steps",
                        li {
                            button {
                                class: "btn btn-secondary",
                                r#type: "button",
                                onclick: move |_| ctx.open_url(&link),
                                "Sign in with Google"
                            }
                            " opens your browser."
                        }
                        li { "Paste the address you are redirected to (or the ID token) below." }
                    }
                } else {
                    p { class: "login-hint",
                        "Paste a Google ID token below. Set REVIEW_GOOGLE_CLIENT_ID to get a sign-in link."
                    }
                }

                form {
                    class: "login-form",
                    onsubmit: move |evt| {
                        evt.prevent_default();
                        on_submit.call(());
                    },
                    textarea {
                        class: "login-credential",
                        placeholder: "http://localhost/#id_token=...",
                        rows: "3",
                        value: "{credential}",
                        disabled: busy,
                        oninput: move |evt| credential.set(evt.value()),
                    }
                    button {
                        class: "btn btn-primary",
                        r#type: "submit",
                        disabled: busy,
                        "{submit_label}"
                    }
                }

                if let Some(message) = snapshot.last_error.clone() {
                    ErrorBanner { message }
                }
            }
        }
    }
}
