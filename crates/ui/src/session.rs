use std::sync::Arc;

use dioxus::prelude::*;
use review_core::model::{ClientPreferences, User};
use services::{SessionSnapshot, SessionStore};

/// Mirror the session store into a signal for the lifetime of the calling scope.
///
/// Every grade change, sign-in or sign-out bumps the store revision and the
/// new snapshot lands here, so readers re-render without a reload.
pub fn use_session_signal(store: Arc<SessionStore>) -> Signal<SessionSnapshot> {
    let mut snapshot = use_signal(|| store.snapshot());
    use_hook(move || {
        let mut updates = store.subscribe();
        spawn(async move {
            while updates.changed().await.is_ok() {
                let next = updates.borrow_and_update().clone();
                snapshot.set(next);
            }
        });
    });
    snapshot
}

/// Session snapshot provided by `App`.
#[must_use]
pub fn use_session() -> Signal<SessionSnapshot> {
    use_context::<Signal<SessionSnapshot>>()
}

/// Dashboard preferences provided by `App`.
#[must_use]
pub fn use_preferences() -> Signal<ClientPreferences> {
    use_context::<Signal<ClientPreferences>>()
}

/// Signed-in user, subscribing the caller to session changes.
#[must_use]
pub fn signed_in_user(session: Signal<SessionSnapshot>) -> Option<User> {
    session.read().user().cloned()
}
