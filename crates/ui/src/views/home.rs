use dioxus::prelude::*;
use dioxus_router::use_navigator;

use crate::routes::Route;
use crate::session::{signed_in_user, use_preferences, use_session};

/// Index route: forwards to the last active tab the user may see.
#[component]
pub fn HomeView() -> Element {
    let session = use_session();
    let preferences = use_preferences();
    let navigator = use_navigator();

    let is_admin = signed_in_user(session).is_some_and(|user| user.is_admin());
    let tab = preferences.read().active_tab.resolve(is_admin);

    use_effect(move || {
        navigator.replace(Route::for_tab(tab));
    });

    rsx! {
        div { class: "page",
            p { class: "muted", "Loading {tab.label()}..." }
        }
    }
}
