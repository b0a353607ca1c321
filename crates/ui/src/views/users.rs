use dioxus::prelude::*;
use review_core::model::{ManagedUser, NewUserDraft, UserId, format_grade};
use services::AdminAction;

use crate::context::AppContext;
use crate::session::{signed_in_user, use_session};
use crate::views::components::{ConfirmBar, ErrorBanner, GradeSelect};
use crate::views::{SaveState, ViewError, ViewState, view_state_from_resource};
use crate::vm::format_date;

/// Admin account management: list, add and delete users.
#[component]
pub fn UsersView() -> Element {
    let ctx = use_context::<AppContext>();
    let session = use_session();
    let me = signed_in_user(session).map(|user| user.id());

    let mut email = use_signal(String::new);
    let mut name = use_signal(String::new);
    let mut grade = use_signal(String::new);
    let mut add_state = use_signal(|| SaveState::Idle);
    let mut pending_delete = use_signal(|| None::<UserId>);
    let mut delete_state = use_signal(|| SaveState::Idle);

    let admin_users = ctx.admin_users();
    let mut users = use_resource(move || {
        let admin_users = admin_users.clone();
        async move {
            admin_users
                .list()
                .await
                .map_err(|err| ViewError::new(err.user_message(AdminAction::Load)))
        }
    });

    let on_add = {
        let admin_users = ctx.admin_users();
        use_callback(move |()| {
            let draft = NewUserDraft {
                email: email(),
                name: name(),
                grade: grade(),
            };
            let admin_users = admin_users.clone();
            add_state.set(SaveState::Saving);
            spawn(async move {
                match admin_users.add(draft).await {
                    Ok(_) => {
                        email.set(String::new());
                        name.set(String::new());
                        grade.set(String::new());
                        add_state.set(SaveState::Saved);
                        users.restart();
                    }
                    Err(err) => {
                        add_state.set(SaveState::Error(ViewError::new(
                            err.user_message(AdminAction::Add),
                        )));
                    }
                }
            });
        })
    };

    let on_delete = {
        let admin_users = ctx.admin_users();
        use_callback(move |id: UserId| {
            let admin_users = admin_users.clone();
            delete_state.set(SaveState::Saving);
            spawn(async move {
                match admin_users.delete(id).await {
                    Ok(()) => {
                        delete_state.set(SaveState::Saved);
                        users.restart();
                    }
                    Err(err) => {
                        delete_state.set(SaveState::Error(ViewError::new(
                            err.user_message(AdminAction::Delete),
                        )));
                    }
                }
                pending_delete.set(None);
            });
        })
    };

    let adding = add_state.read().is_busy();
    let add_error = add_state.read().error().map(str::to_string);
    let added = *add_state.read() == SaveState::Saved;
    let deleting = delete_state.read().is_busy();
    let delete_error = delete_state.read().error().map(str::to_string);

    rsx! {
        div { class: "page users-page",
            h2 { "Users" }

            form {
                class: "add-user",
                onsubmit: move |evt| {
                    evt.prevent_default();
                    on_add.call(());
                },
                h3 { "Add user" }
                input {
                    r#type: "email",
                    placeholder: "Email",
                    value: "{email}",
                    disabled: adding,
                    oninput: move |evt| email.set(evt.value()),
                }
                input {
                    placeholder: "Name",
                    value: "{name}",
                    disabled: adding,
                    oninput: move |evt| name.set(evt.value()),
                }
                GradeSelect {
                    value: grade(),
                    disabled: adding,
                    placeholder: "No grade".to_string(),
                    onchange: move |raw| grade.set(raw),
                }
                button {
                    class: "btn btn-primary",
                    r#type: "submit",
                    disabled: adding,
                    if adding { "Adding..." } else { "Add user" }
                }
                if let Some(message) = add_error {
                    ErrorBanner { message }
                }
                if added {
                    p { class: "success-banner", "User added." }
                }
            }

            if let Some(message) = delete_error {
                ErrorBanner { message }
            }
            if let Some(id) = pending_delete() {
                ConfirmBar {
                    message: "Delete this user and all their questions?".to_string(),
                    confirm_label: "Delete user".to_string(),
                    busy: deleting,
                    on_confirm: move |()| on_delete.call(id),
                    on_cancel: move |()| pending_delete.set(None),
                }
            }

            match view_state_from_resource(&users) {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { class: "muted", "Loading users..." }
                },
                ViewState::Error(err) => rsx! {
                    ErrorBanner { message: err.message().to_string() }
                },
                ViewState::Ready(list) => rsx! {
                    UserTable {
                        users: list,
                        me,
                        busy: deleting,
                        on_delete: move |id| {
                            delete_state.set(SaveState::Idle);
                            pending_delete.set(Some(id));
                        },
                    }
                },
            }
        }
    }
}

#[component]
fn UserTable(
    users: Vec<ManagedUser>,
    #[props(!optional)] me: Option<UserId>,
    busy: bool,
    on_delete: EventHandler<UserId>,
) -> Element {
    if users.is_empty() {
        return rsx! {
            p { class: "empty", "No users yet." }
        };
    }

    rsx! {
        table { class: "users-table",
            thead {
                tr {
                    th { "Name" }
                    th { "Email" }
                    th { "Grade" }
                    th { "Role" }
                    th { "Joined" }
                    th {}
                }
            }
            tbody {
                for user in users {
                    tr { key: "{user.id()}",
                        td { "{user.name()}" }
                        td { "{user.email()}" }
                        td { "{format_grade(user.grade())}" }
                        td { if user.is_admin() { "Admin" } else { "Student" } }
                        td { "{user.created_at().map(format_date).unwrap_or_default()}" }
                        td {
                            if Some(user.id()) != me {
                                button {
                                    class: "btn btn-danger",
                                    r#type: "button",
                                    disabled: busy,
                                    onclick: {
                                        let id = user.id();
                                        move |_| on_delete.call(id)
                                    },
                                    "Delete"
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
